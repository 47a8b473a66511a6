use clap::Args;
use eyre::Result;
use kcd::{server::SearchResponse, Catalog, DatasetSource};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// A Korean disease name, or the start of a code
    pub query: String,

    /// The maximum number of results, at most 50
    #[clap(short = 'l', long = "limit")]
    pub limit: Option<i64>,

    /// Print the results as the JSON body the HTTP endpoint returns
    #[clap(long = "json")]
    pub json: bool,
}

pub fn run(source: DatasetSource, args: SearchArgs) -> Result<()> {
    let catalog = Catalog::new(source);

    let start_time = std::time::Instant::now();
    let items = catalog.search(&args.query, args.limit)?;
    let duration = start_time.elapsed();

    if args.json {
        let response = SearchResponse { items, error: None };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No results found");
        return Ok(());
    }

    println!("Found {} in {}ms", items.len(), duration.as_millis());
    for item in items {
        if item.name_en.is_empty() {
            println!("  {} - {}", item.code, item.name_ko);
        } else {
            println!("  {} - {} ({})", item.code, item.name_ko, item.name_en);
        }
    }

    Ok(())
}
