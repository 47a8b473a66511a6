use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use kcd::{export::write_json, Catalog, DatasetSource};
use tracing::info;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[clap(
        long,
        short,
        help = "The JSON file to write. Defaults to standard output"
    )]
    pub output: Option<PathBuf>,

    #[clap(long, help = "Indent the JSON output")]
    pub pretty: bool,
}

pub fn run(source: DatasetSource, args: ExportArgs) -> Result<()> {
    let catalog = Catalog::open(source)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    let count = write_json(catalog.records()?, &mut writer, args.pretty)?;
    writeln!(writer)?;
    writer.flush()?;

    info!(count, output = ?args.output, "Exported KCD codes");
    Ok(())
}
