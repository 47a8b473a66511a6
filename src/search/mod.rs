use std::time::Instant;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::files::{DatasetSource, DiseaseCode};

pub mod normalize;

use normalize::{normalize_code, normalize_indexed_name, normalize_query};

/// Number of results returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: usize = 20;
/// Upper bound on the number of results, whatever the caller asks for.
pub const MAX_LIMIT: usize = 50;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub code: SmolStr,
    pub name_ko: String,
    pub name_en: String,
}

impl From<&DiseaseCode> for SearchResult {
    fn from(record: &DiseaseCode) -> Self {
        Self {
            code: record.code.clone(),
            name_ko: record.name_ko.clone(),
            name_en: record.name_en.clone(),
        }
    }
}

/// A record along with the forms it is matched in.
struct IndexedCode {
    record: DiseaseCode,
    normalized_name: String,
    upper_code: String,
}

impl IndexedCode {
    fn new(record: DiseaseCode) -> Self {
        Self {
            normalized_name: normalize_indexed_name(&record.name_ko),
            upper_code: record.code.to_uppercase(),
            record,
        }
    }

    fn matches(&self, name_query: &str, code_query: &str) -> bool {
        self.normalized_name.contains(name_query) || self.upper_code.starts_with(code_query)
    }
}

/// The disease code master, loaded at most once and never refreshed.
///
/// Construct one per process and share it with whatever serves lookups. A restart is
/// the only way to pick up a changed file.
pub struct Catalog {
    source: DatasetSource,
    entries: OnceCell<Vec<IndexedCode>>,
}

impl Catalog {
    /// Create a catalog that loads `source` on first use.
    pub fn new(source: DatasetSource) -> Catalog {
        Catalog {
            source,
            entries: OnceCell::new(),
        }
    }

    /// Create a catalog and load it immediately.
    pub fn open(source: DatasetSource) -> Result<Catalog, CatalogError> {
        let catalog = Catalog::new(source);
        catalog.entries()?;
        Ok(catalog)
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    /// All admitted records, in file order.
    pub fn records(&self) -> Result<impl Iterator<Item = &DiseaseCode> + '_, CatalogError> {
        Ok(self.entries()?.iter().map(|e| &e.record))
    }

    /// Find records whose normalized Korean name contains the normalized query, or whose
    /// code starts with the query. Matches are returned in file order, at most `limit` of
    /// them (see [clamp_limit]).
    ///
    /// A blank query returns nothing without loading the dataset.
    pub fn search(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let limit = clamp_limit(limit);
        let entries = self.entries()?;

        let name_query = normalize_query(query);
        let code_query = normalize_code(query);

        let results = entries
            .iter()
            .filter(|e| e.matches(&name_query, &code_query))
            .take(limit)
            .map(|e| SearchResult::from(&e.record))
            .collect::<Vec<_>>();

        debug!(
            query,
            %name_query,
            %code_query,
            limit,
            found = results.len(),
            "KCD search"
        );

        Ok(results)
    }

    fn entries(&self) -> Result<&[IndexedCode], CatalogError> {
        // Concurrent first callers block here until a single load finishes.
        self.entries
            .get_or_try_init(|| self.load())
            .map(Vec::as_slice)
    }

    fn load(&self) -> Result<Vec<IndexedCode>, CatalogError> {
        let start_time = Instant::now();
        let entries = self
            .source
            .read_records()?
            .into_iter()
            .map(IndexedCode::new)
            .collect::<Vec<_>>();

        info!(
            path = %self.source.path.display(),
            records = entries.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Loaded KCD dataset"
        );

        Ok(entries)
    }
}

/// The effective result cap: [DEFAULT_LIMIT] when absent, otherwise clamped into
/// `0..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> usize {
    limit
        .unwrap_or(DEFAULT_LIMIT as i64)
        .clamp(0, MAX_LIMIT as i64) as usize
}

/// Parse a raw `limit` parameter from its leading integer: an optional sign followed by
/// digits, ignoring whatever comes after them. Values beyond `i64` saturate. Without any
/// leading digits the limit counts as absent.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'));

    let mut value = None;
    for digit in digits {
        let magnitude = value.unwrap_or(0i64);
        value = Some(if negative {
            magnitude.saturating_mul(10).saturating_sub(digit)
        } else {
            magnitude.saturating_mul(10).saturating_add(digit)
        });
    }

    value
}

#[cfg(test)]
mod test {
    use std::fmt::Write;

    use super::*;
    use crate::files::test::write_euc_kr;

    const HEADER: &str = "상병기호,한글명,영문명\n";

    fn catalog_with(dir: &tempfile::TempDir, rows: &str) -> Catalog {
        let path = dir.path().join("kcd.csv");
        write_euc_kr(&path, &format!("{HEADER}{rows}"));
        Catalog::new(DatasetSource::new(path))
    }

    fn codes(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn empty_query_does_not_load() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(DatasetSource::in_dir(dir.path()));

        for limit in [None, Some(-1), Some(0), Some(20), Some(500)] {
            assert!(catalog.search("", limit).unwrap().is_empty());
            assert!(catalog.search(" \t ", limit).unwrap().is_empty());
        }
        assert!(!catalog.is_loaded());
    }

    #[test]
    fn limits() {
        let dir = tempfile::tempdir().unwrap();
        let mut rows = String::new();
        for i in 0..60 {
            writeln!(rows, "A{i:03},질환{i},Disease {i}").unwrap();
        }
        let catalog = catalog_with(&dir, &rows);

        let count = |limit| catalog.search("A", limit).unwrap().len();
        assert_eq!(count(None), 20);
        assert_eq!(count(Some(5)), 5);
        assert_eq!(count(Some(50)), 50);
        assert_eq!(count(Some(51)), 50);
        assert_eq!(count(Some(i64::MAX)), 50);
        assert_eq!(count(Some(0)), 0);
        assert_eq!(count(Some(-7)), 0);

        // Fewer matches than the limit.
        assert_eq!(catalog.search("A05", None).unwrap().len(), 10);
        assert_eq!(catalog.search("A05", Some(3)).unwrap().len(), 3);
    }

    #[test]
    fn code_prefix_match() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog_with(&dir, "A000,콜레라,Cholera\nB000,대상포진,Zoster\n");

        assert_eq!(codes(&catalog.search("a0", None).unwrap()), vec!["A000"]);
        assert_eq!(codes(&catalog.search(" A 0 ", None).unwrap()), vec!["A000"]);
        assert!(catalog.search("0a0", None).unwrap().is_empty());
        assert!(catalog.search("000", None).unwrap().is_empty());
    }

    #[test]
    fn name_match_after_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog_with(
            &dir,
            "M480,척추협착,Spinal stenosis\nM170,무릎관절증,Gonarthrosis\n",
        );

        let results = catalog.search("척추관협착증", None).unwrap();
        assert_eq!(
            results,
            vec![SearchResult {
                code: "M480".into(),
                name_ko: "척추협착".to_string(),
                name_en: "Spinal stenosis".to_string(),
            }]
        );

        // Suffix stripped from both sides.
        assert_eq!(codes(&catalog.search("무릎 관절증", None).unwrap()), vec!["M170"]);
        assert_eq!(codes(&catalog.search("관절", None).unwrap()), vec!["M170"]);
    }

    #[test]
    fn english_names_are_not_searched() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog_with(&dir, "M170,무릎관절증,Gonarthrosis\n");
        assert!(catalog.search("gonarthrosis", None).unwrap().is_empty());
    }

    #[test]
    fn preserves_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog_with(
            &dir,
            "M4806,요추 협착,Lumbar stenosis\nM4802,경추협착,Cervical stenosis\nM480,척추협착,Spinal stenosis\n",
        );

        let all = catalog.search("협착", None).unwrap();
        assert_eq!(codes(&all), vec!["M4806", "M4802", "M480"]);

        let first_two = catalog.search("협착", Some(2)).unwrap();
        assert_eq!(codes(&first_two), vec!["M4806", "M4802"]);
    }

    #[test]
    fn loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog_with(&dir, "A000,콜레라,Cholera\n");

        assert_eq!(catalog.search("콜레라", None).unwrap().len(), 1);
        assert!(catalog.is_loaded());

        write_euc_kr(
            &catalog.source().path,
            &format!("{HEADER}A000,콜레라,Cholera\nA001,엘토르콜레라,Cholera eltor\n"),
        );
        assert_eq!(catalog.search("콜레라", None).unwrap().len(), 1);

        std::fs::remove_file(&catalog.source().path).unwrap();
        assert_eq!(catalog.search("콜레라", None).unwrap().len(), 1);
    }

    #[test]
    fn load_errors_are_not_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(DatasetSource::in_dir(dir.path()));

        let err = catalog.search("콜레라", None).unwrap_err();
        assert!(matches!(err, CatalogError::DatasetUnavailable { .. }));
        assert!(!catalog.is_loaded());

        // Limit coercion never hides the load failure.
        assert!(catalog.search("콜레라", Some(0)).is_err());
    }

    #[test]
    fn open_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Catalog::open(DatasetSource::in_dir(dir.path())).is_err());
    }

    #[test]
    fn limit_parsing() {
        assert_eq!(parse_limit(None), None);
        assert_eq!(parse_limit(Some("7")), Some(7));
        assert_eq!(parse_limit(Some(" -3 ")), Some(-3));
        assert_eq!(parse_limit(Some("ten")), None);
        assert_eq!(parse_limit(Some("")), None);
        assert_eq!(parse_limit(Some("-")), None);
        assert_eq!(parse_limit(Some("3.5")), Some(3));
        assert_eq!(parse_limit(Some("10abc")), Some(10));
        assert_eq!(parse_limit(Some("+4")), Some(4));
        assert_eq!(parse_limit(Some("99999999999999999999")), Some(i64::MAX));
        assert_eq!(parse_limit(Some("-99999999999999999999")), Some(i64::MIN));

        assert_eq!(clamp_limit(parse_limit(Some("ten"))), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(parse_limit(Some("80"))), MAX_LIMIT);
        assert_eq!(clamp_limit(parse_limit(Some("99999999999999999999"))), 50);
        assert_eq!(clamp_limit(parse_limit(Some("-99999999999999999999"))), 0);
        assert_eq!(clamp_limit(parse_limit(Some("3.5"))), 3);
        assert_eq!(clamp_limit(parse_limit(Some("10abc"))), 10);
    }
}
