use csv::StringRecord;

use crate::error::MalformedDataset;

/// Header names of the columns read from the disease code master file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    pub code_column: String,
    pub name_ko_column: String,
    /// Optional. When the header lacks it, every record gets an empty English name.
    pub name_en_column: String,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            code_column: "상병기호".to_string(),
            name_ko_column: "한글명".to_string(),
            name_en_column: "영문명".to_string(),
        }
    }
}

/// Positions of the schema's columns within a particular header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndexes {
    pub code: usize,
    pub name_ko: usize,
    pub name_en: Option<usize>,
}

impl DatasetSchema {
    pub fn resolve(&self, header: &StringRecord) -> Result<ColumnIndexes, MalformedDataset> {
        let find = |name: &str| header.iter().position(|c| c == name);
        let required = |name: &str| {
            find(name).ok_or_else(|| MalformedDataset::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(ColumnIndexes {
            code: required(&self.code_column)?,
            name_ko: required(&self.name_ko_column)?,
            name_en: find(&self.name_en_column),
        })
    }
}
