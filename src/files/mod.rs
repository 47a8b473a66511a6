use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::error::{CatalogError, MalformedDataset};

pub mod schema;

pub use schema::DatasetSchema;

/// The file name of the disease code master published by HIRA.
pub const DEFAULT_DATASET_FILE: &str = "건강보험심사평가원-상병마스터-20250930.csv";
pub const DEFAULT_DATA_DIR: &str = "local_data";

/// One row of the disease code master.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseCode {
    pub code: SmolStr,
    pub name_ko: String,
    /// Empty when the row has no English name.
    pub name_en: String,
}

/// Where the disease code master lives and how to read it.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    pub path: PathBuf,
    /// The master is distributed in CP949, which `encoding_rs` decodes as its EUC-KR encoding.
    pub encoding: &'static Encoding,
    pub schema: DatasetSchema,
}

impl DatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: encoding_rs::EUC_KR,
            schema: DatasetSchema::default(),
        }
    }

    /// The default file name inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(DEFAULT_DATASET_FILE))
    }

    /// Use the encoding with the given WHATWG label, e.g. `euc-kr` or `windows-949`.
    pub fn with_encoding_label(mut self, label: &str) -> Result<Self, CatalogError> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| CatalogError::UnknownEncoding(label.to_string()))?;
        Ok(self)
    }

    pub fn with_schema(mut self, schema: DatasetSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Read, decode and parse the file. Rows without a code or a Korean name are dropped.
    pub fn read_records(&self) -> Result<Vec<DiseaseCode>, CatalogError> {
        let bytes = std::fs::read(&self.path).map_err(|source| CatalogError::DatasetUnavailable {
            path: self.path.clone(),
            source,
        })?;

        self.parse(&bytes)
            .map_err(|source| CatalogError::DatasetMalformed {
                path: self.path.clone(),
                source,
            })
    }

    fn parse(&self, bytes: &[u8]) -> Result<Vec<DiseaseCode>, MalformedDataset> {
        // A byte order mark, if present, overrides the configured encoding.
        // Invalid sequences become U+FFFD; the rest of the file is still usable.
        let (text, used_encoding, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            warn!(
                path = %self.path.display(),
                encoding = used_encoding.name(),
                "KCD dataset contains invalid byte sequences"
            );
        }

        // Distributions of the master have rows with missing trailing fields.
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let columns = self.schema.resolve(reader.headers()?)?;

        let mut records = Vec::new();
        let mut dropped = 0;
        for line in reader.records() {
            let line = line?;
            let code = line.get(columns.code).unwrap_or_default();
            let name_ko = line.get(columns.name_ko).unwrap_or_default();
            let name_en = columns
                .name_en
                .and_then(|idx| line.get(idx))
                .unwrap_or_default();

            if code.is_empty() || name_ko.is_empty() {
                dropped += 1;
                continue;
            }

            records.push(DiseaseCode {
                code: SmolStr::from(code),
                name_ko: name_ko.to_string(),
                name_en: name_en.to_string(),
            });
        }

        debug!(kept = records.len(), dropped, "Parsed KCD rows");
        Ok(records)
    }
}
