// 🔌 Gift Sources - Best-effort contract for upstream collaborators
//
// A source either yields records or yields nothing. Network and parse
// failures become `SourceOutcome::Empty`; they never abort an estimate.

use crate::gift::RawGiftRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

// ============================================================================
// SOURCE OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Records(Vec<RawGiftRecord>),
    Empty,
}

impl SourceOutcome {
    /// Fold a fallible fetch into an outcome, logging the failure
    pub fn from_result(source: &str, result: Result<Vec<RawGiftRecord>>) -> Self {
        match result {
            Ok(records) if records.is_empty() => SourceOutcome::Empty,
            Ok(records) => SourceOutcome::Records(records),
            Err(e) => {
                warn!(source, error = %e, "source failed, treating as empty");
                SourceOutcome::Empty
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SourceOutcome::Records(records) => records.is_empty(),
            SourceOutcome::Empty => true,
        }
    }

    pub fn into_records(self) -> Vec<RawGiftRecord> {
        match self {
            SourceOutcome::Records(records) => records,
            SourceOutcome::Empty => Vec::new(),
        }
    }
}

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// GiftSource - one upstream public-record source
pub trait GiftSource: Send + Sync {
    /// Name for logs and reports
    fn name(&self) -> &str;

    /// Records this source knows about for the given donor
    fn fetch(&self, donor: &str) -> SourceOutcome;
}

/// In-memory source, for records fetched elsewhere
pub struct StaticSource {
    name: String,
    records: Vec<RawGiftRecord>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<RawGiftRecord>) -> Self {
        StaticSource {
            name: name.into(),
            records,
        }
    }
}

impl GiftSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, _donor: &str) -> SourceOutcome {
        if self.records.is_empty() {
            SourceOutcome::Empty
        } else {
            SourceOutcome::Records(self.records.clone())
        }
    }
}

/// Records read from a CSV or JSON file on each fetch
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        FileSource { name, path }
    }
}

impl GiftSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, _donor: &str) -> SourceOutcome {
        SourceOutcome::from_result(&self.name, load_records(&self.path))
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// Load records from a CSV file with a header row naming the fields.
/// Rows that fail to deserialize are logged and skipped.
pub fn load_records_csv(csv_path: &Path) -> Result<Vec<RawGiftRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let mut records = Vec::new();
    for (line, result) in rdr.deserialize::<RawGiftRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(path = ?csv_path, row = line + 1, error = %e, "skipping malformed gift record");
            }
        }
    }

    Ok(records)
}

/// Load records from a JSON array. Elements that don't match the record
/// shape are logged and skipped; a file that isn't an array is an error.
pub fn load_records_json(json_path: &Path) -> Result<Vec<RawGiftRecord>> {
    let content = fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read records file: {:?}", json_path))?;

    let values: Vec<serde_json::Value> =
        serde_json::from_str(&content).context("Failed to parse gift records JSON")?;

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawGiftRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(path = ?json_path, index, error = %e, "skipping malformed gift record");
            }
        }
    }

    Ok(records)
}

/// Pick the loader by extension (.json, anything else is CSV)
pub fn load_records(path: &Path) -> Result<Vec<RawGiftRecord>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_records_json(path),
        _ => load_records_csv(path),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gift::{GiftCategory, SourceConfidence};
    use std::io::Write;

    #[test]
    fn test_load_csv_with_missing_fields() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "category,recipient,amount,year,is_pledge,source_url,confidence").unwrap();
        writeln!(file, "FOUNDATIONS,Stanford University,100000000,2023,false,https://x.org,HIGH").unwrap();
        writeln!(file, "DAF_ESTIMATE,,,,,,").unwrap();

        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, GiftCategory::FoundationGrant);
        assert_eq!(records[0].amount, Some(100_000_000.0));
        assert_eq!(records[0].is_pledge, Some(false));
        assert_eq!(records[0].confidence, Some(SourceConfidence::High));
        assert_eq!(records[1].category, GiftCategory::DafEstimate);
        assert_eq!(records[1].amount, None);
        assert_eq!(records[1].year, None);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{ "category": "DIRECT_GIFTS", "recipient": "Stanford Univ", "amount": 1.5 }}]"#
        )
        .unwrap();

        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, GiftCategory::DirectGift);
        assert_eq!(records[0].year, None);
        assert!(records[0].source_url.is_empty());
    }

    #[test]
    fn test_load_csv_skips_malformed_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "category,recipient,amount,year,is_pledge,source_url,confidence").unwrap();
        writeln!(file, "FOUNDATIONS,Stanford University,100000000,2023,false,,").unwrap();
        writeln!(file, "DIRECT_GIFTS,Yale,undisclosed,2023,false,,").unwrap();
        writeln!(file, "DAF,Johns Hopkins,5000000,2022,false,,").unwrap();

        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].recipient.as_deref(), Some("Stanford University"));
        assert_eq!(records[1].category, GiftCategory::DafEstimate);
        assert_eq!(records[1].amount, Some(5_000_000.0));
    }

    #[test]
    fn test_load_json_skips_malformed_elements() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{ "category": "DIRECT_GIFTS", "recipient": "Stanford Univ", "amount": 1.5 }},
                {{ "category": "DIRECT_GIFTS", "recipient": "Yale", "amount": "lots" }},
                {{ "recipient": "No Category" }},
                {{ "category": "FOUNDATIONS", "recipient": "MIT", "amount": 2.0, "year": 2021 }}
            ]"#
        )
        .unwrap();

        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, GiftCategory::DirectGift);
        assert_eq!(records[1].category, GiftCategory::FoundationGrant);
        assert_eq!(records[1].year, Some(2021));
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "category": "DAF" }}"#).unwrap();

        assert!(load_records(file.path()).is_err());
    }

    #[test]
    fn test_file_source_keeps_good_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "category,recipient,amount,year,is_pledge,source_url,confidence").unwrap();
        writeln!(file, "DIRECT_GIFTS,Yale,not-a-number,2023,false,,").unwrap();
        writeln!(file, "DIRECT_GIFTS,Brown University,250000,2023,false,,MEDIUM").unwrap();

        let outcome = FileSource::new(file.path()).fetch("Anyone");

        let records = outcome.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].confidence, Some(SourceConfidence::Medium));
    }

    #[test]
    fn test_file_source_swallows_errors() {
        let source = FileSource::new("/nonexistent/gifts.csv");

        assert_eq!(source.name(), "gifts.csv");
        assert_eq!(source.fetch("Anyone"), SourceOutcome::Empty);
    }

    #[test]
    fn test_static_source() {
        let record = RawGiftRecord::new(GiftCategory::DirectGift, "Yale", 1.0, 2020);
        let full = StaticSource::new("press", vec![record.clone()]);
        let empty = StaticSource::new("wiki", Vec::new());

        assert_eq!(full.fetch("x").into_records(), vec![record]);
        assert!(empty.fetch("x").is_empty());
        assert!(empty.fetch("x").into_records().is_empty());
    }

    #[test]
    fn test_from_result() {
        let failed = SourceOutcome::from_result("edgar", Err(anyhow::anyhow!("timeout")));
        assert_eq!(failed, SourceOutcome::Empty);

        let none = SourceOutcome::from_result("edgar", Ok(Vec::new()));
        assert_eq!(none, SourceOutcome::Empty);
    }
}
