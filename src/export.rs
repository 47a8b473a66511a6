use std::io::Write;

use serde::Serialize;

use crate::files::DiseaseCode;

/// A record in the `{ code, ko, en }` form used by the bundled JSON lookup table.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ExportedCode<'a> {
    pub code: &'a str,
    pub ko: &'a str,
    pub en: &'a str,
}

impl<'a> From<&'a DiseaseCode> for ExportedCode<'a> {
    fn from(record: &'a DiseaseCode) -> Self {
        Self {
            code: &record.code,
            ko: &record.name_ko,
            en: &record.name_en,
        }
    }
}

/// Write `records` as a JSON array of [ExportedCode], returning how many were written.
pub fn write_json<'a, W: Write>(
    records: impl Iterator<Item = &'a DiseaseCode>,
    writer: W,
    pretty: bool,
) -> serde_json::Result<usize> {
    let exported = records.map(ExportedCode::from).collect::<Vec<_>>();
    if pretty {
        serde_json::to_writer_pretty(writer, &exported)?;
    } else {
        serde_json::to_writer(writer, &exported)?;
    }

    Ok(exported.len())
}
