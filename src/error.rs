use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The backing file could not be found or read.
    #[error("KCD dataset not available at {}: {source}", path.display())]
    DatasetUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but could not be parsed.
    #[error("KCD dataset at {} is malformed: {source}", path.display())]
    DatasetMalformed {
        path: PathBuf,
        #[source]
        source: MalformedDataset,
    },

    #[error("Unknown text encoding label {0:?}")]
    UnknownEncoding(String),
}

#[derive(Error, Debug)]
pub enum MalformedDataset {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("header has no {column:?} column")]
    MissingColumn { column: String },
}
