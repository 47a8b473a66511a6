use eyre::Result;
use itertools::Itertools;
use kcd::{Catalog, DatasetSource};

pub fn run(source: DatasetSource) -> Result<()> {
    let catalog = Catalog::open(source)?;

    catalog
        .records()?
        .counts_by(|r| r.code.chars().next().unwrap_or_default().to_ascii_uppercase())
        .into_iter()
        .sorted_by(|(achapter, _), (bchapter, _)| achapter.cmp(bchapter))
        .for_each(|(chapter, count)| println!("{chapter} - {count}"));

    Ok(())
}
