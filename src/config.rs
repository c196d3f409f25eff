// ⚙️ Estimator Configuration - every tunable constant in one place
// Loaded once from JSON, then passed by reference into the engines.

use crate::gift::RecordDefaults;
use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Benchmark annual giving rate, in percent of net worth
    #[serde(default = "default_expected_rate_pct")]
    pub expected_rate_pct: f64,

    /// Width of the dedup amount bucket, in dollars
    #[serde(default = "default_bucket_width")]
    pub bucket_width: f64,

    /// Characters of the normalized recipient kept in the dedup key
    #[serde(default = "default_name_key_length")]
    pub name_key_length: usize,

    /// Similarity above which a recipient is the donor's own foundation
    #[serde(default = "default_self_dealing_threshold")]
    pub self_dealing_threshold: f64,

    /// Year assumed for records that don't carry one
    #[serde(default = "default_year")]
    pub default_year: i32,

    /// Pledge status assumed when a source can't tell
    #[serde(default = "default_pledge")]
    pub pledge_default: bool,
}

fn default_expected_rate_pct() -> f64 {
    10.0
}

fn default_bucket_width() -> f64 {
    10_000_000.0
}

fn default_name_key_length() -> usize {
    20
}

fn default_self_dealing_threshold() -> f64 {
    crate::matching::SELF_DEALING_THRESHOLD
}

fn default_year() -> i32 {
    Utc::now().year()
}

// Unconfirmed money is not counted as out the door
fn default_pledge() -> bool {
    true
}

impl EstimatorConfig {
    pub fn new() -> Self {
        EstimatorConfig {
            expected_rate_pct: default_expected_rate_pct(),
            bucket_width: default_bucket_width(),
            name_key_length: default_name_key_length(),
            self_dealing_threshold: default_self_dealing_threshold(),
            default_year: default_year(),
            pledge_default: default_pledge(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse estimator config JSON")
    }

    /// Load configuration, falling back to defaults on any error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = ?path.as_ref(), error = %e, "using default estimator config");
                Self::new()
            }
        }
    }

    pub fn record_defaults(&self) -> RecordDefaults {
        RecordDefaults {
            year: self.default_year,
            is_pledge: self.pledge_default,
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
