// 💰 Estimation Pipeline - sources → dedup → split → aggregate → score
// Stateless: every call builds fresh outputs from its arguments.

use crate::aggregation::CategoryBreakdown;
use crate::config::EstimatorConfig;
use crate::deduplication::{DedupStats, DeduplicationEngine};
use crate::gift::{RawGiftRecord, UnifiedGift};
use crate::scoring::{giving_rate_pct, ScoreBreakdown, ScoreCalculator, ScroogeInputs};
use crate::sources::GiftSource;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// DONOR PROFILE
// ============================================================================

/// Caller-supplied facts about one individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub name: String,

    /// Net worth in dollars
    pub net_worth: f64,

    #[serde(default)]
    pub years_of_wealth: i32,

    #[serde(default)]
    pub is_pledge_signer: bool,

    /// Free-text red flags, only counted
    #[serde(default)]
    pub red_flags: Vec<String>,

    /// Foundations the donor controls
    #[serde(default)]
    pub foundation_names: Vec<String>,

    /// Records supplied inline with the profile
    #[serde(default)]
    pub records: Vec<RawGiftRecord>,
}

impl DonorProfile {
    pub fn new(name: impl Into<String>, net_worth: f64) -> Self {
        DonorProfile {
            name: name.into(),
            net_worth,
            years_of_wealth: 0,
            is_pledge_signer: false,
            red_flags: Vec::new(),
            foundation_names: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read profile file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse donor profile JSON")
    }

    pub fn red_flag_count(&self) -> u32 {
        u32::try_from(self.red_flags.len()).unwrap_or(u32::MAX)
    }
}

// ============================================================================
// GIVING ESTIMATE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GivingEstimate {
    pub run_id: String,
    pub estimated_at: DateTime<Utc>,
    pub donor: String,
    pub net_worth: f64,

    pub gifts: Vec<UnifiedGift>,
    pub stats: DedupStats,
    pub categories: CategoryBreakdown,

    /// Disbursed total after dedup; pledges excluded
    pub observable_giving: f64,
    pub giving_rate_pct: f64,

    pub inputs: ScroogeInputs,
    pub score: ScoreBreakdown,

    /// Sources that returned nothing
    pub empty_sources: Vec<String>,
}

impl GivingEstimate {
    pub fn summary(&self) -> String {
        format!(
            "{}: observable giving ${:.0} of ${:.0} net worth ({:.2}%) | {}",
            self.donor,
            self.observable_giving,
            self.net_worth,
            self.giving_rate_pct,
            self.score.summary()
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize estimate")
    }
}

// ============================================================================
// ESTIMATION ENGINE
// ============================================================================

pub struct EstimationEngine {
    pub dedup: DeduplicationEngine,
    pub scorer: ScoreCalculator,
}

impl EstimationEngine {
    pub fn new() -> Self {
        Self::from_config(&EstimatorConfig::new())
    }

    pub fn from_config(config: &EstimatorConfig) -> Self {
        EstimationEngine {
            dedup: DeduplicationEngine::from_config(config),
            scorer: ScoreCalculator::from_config(config),
        }
    }

    /// Estimate from the profile's inline records plus every source
    pub fn estimate(&self, profile: &DonorProfile, sources: &[Box<dyn GiftSource>]) -> GivingEstimate {
        let mut records = profile.records.clone();
        let mut empty_sources = Vec::new();

        for source in sources {
            let outcome = source.fetch(&profile.name);
            if outcome.is_empty() {
                warn!(source = source.name(), donor = %profile.name, "source returned no records");
                empty_sources.push(source.name().to_string());
                continue;
            }
            records.extend(outcome.into_records());
        }

        self.estimate_records(profile, &records, empty_sources)
    }

    fn estimate_records(
        &self,
        profile: &DonorProfile,
        records: &[RawGiftRecord],
        empty_sources: Vec<String>,
    ) -> GivingEstimate {
        let result = self.dedup.deduplicate(records, &profile.foundation_names);
        let categories = CategoryBreakdown::compute(records, &result.gifts);

        let observable_giving = result.stats.total_disbursed;
        let rate = giving_rate_pct(observable_giving, profile.net_worth);

        let inputs = ScroogeInputs {
            giving_rate_pct: rate,
            years_held_wealth: profile.years_of_wealth,
            is_pledge_signer: profile.is_pledge_signer,
            red_flag_count: profile.red_flag_count(),
        };
        let score = self.scorer.breakdown(&inputs);

        info!(
            donor = %profile.name,
            gifts = result.gifts.len(),
            observable_giving,
            giving_rate_pct = rate,
            score = score.score,
            "estimate complete"
        );

        GivingEstimate {
            run_id: uuid::Uuid::new_v4().to_string(),
            estimated_at: Utc::now(),
            donor: profile.name.clone(),
            net_worth: profile.net_worth,
            gifts: result.gifts,
            stats: result.stats,
            categories,
            observable_giving,
            giving_rate_pct: rate,
            inputs,
            score,
            empty_sources,
        }
    }
}

impl Default for EstimationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gift::GiftCategory;
    use crate::sources::StaticSource;

    fn create_test_profile() -> DonorProfile {
        let mut profile = DonorProfile::new("Test Donor", 1_000_000_000.0);
        profile.years_of_wealth = 12;
        profile.foundation_names = vec!["Test Donor Foundation".to_string()];
        profile
    }

    #[test]
    fn test_estimate_counts_only_disbursed_unique_gifts() {
        let profile = create_test_profile();
        let sources: Vec<Box<dyn GiftSource>> = vec![
            Box::new(StaticSource::new(
                "990pf",
                vec![RawGiftRecord::new(GiftCategory::FoundationGrant, "Stanford University", 20_000_000.0, 2023)
                    .with_pledge(false)],
            )),
            Box::new(StaticSource::new(
                "press",
                vec![
                    RawGiftRecord::new(GiftCategory::DirectGift, "Stanford Univ", 20_000_000.0, 2023).with_pledge(false),
                    RawGiftRecord::new(GiftCategory::DirectGift, "Climate Fund", 300_000_000.0, 2023).with_pledge(true),
                ],
            )),
            Box::new(StaticSource::new(
                "form4",
                vec![RawGiftRecord::new(GiftCategory::SecuritiesTransfer, "Test Donor Foundation", 90_000_000.0, 2023)
                    .with_pledge(false)],
            )),
            Box::new(StaticSource::new("wiki", Vec::new())),
        ];

        let estimate = EstimationEngine::new().estimate(&profile, &sources);

        assert_eq!(estimate.stats.original_count, 4);
        assert_eq!(estimate.stats.foundation_transfers_removed, 1);
        assert_eq!(estimate.stats.duplicates_removed, 1);
        assert_eq!(estimate.observable_giving, 20_000_000.0);
        assert_eq!(estimate.giving_rate_pct, 2.0);
        assert_eq!(estimate.empty_sources, vec!["wiki".to_string()]);
        assert_eq!(estimate.categories.after[&GiftCategory::FoundationGrant], 20_000_000.0);
        assert!(!estimate.categories.after.contains_key(&GiftCategory::SecuritiesTransfer));

        // gap 0.8 → 32, tenure 9/17 → 10.59
        assert_eq!(estimate.score.score, 42.6);
        assert!(estimate.summary().contains("Test Donor"));
    }

    #[test]
    fn test_estimate_benchmark_met() {
        let mut profile = create_test_profile();
        profile.red_flags = vec!["dark money".to_string(); 3];
        profile.records = vec![
            RawGiftRecord::new(GiftCategory::FoundationGrant, "Gavi", 150_000_000.0, 2022).with_pledge(false),
        ];

        let estimate = EstimationEngine::new().estimate(&profile, &[]);

        assert_eq!(estimate.inputs.red_flag_count, 3);
        assert_eq!(estimate.giving_rate_pct, 15.0);
        assert!(estimate.score.override_applied);
        assert_eq!(estimate.score.score, 0.0);
    }

    #[test]
    fn test_estimate_to_json() {
        let estimate = EstimationEngine::new().estimate(&create_test_profile(), &[]);
        let json = estimate.to_json().unwrap();

        assert!(json.contains("\"run_id\""));
        assert!(json.contains("\"observable_giving\": 0.0"));
        assert!(json.contains("\"total_disbursed\": 0.0"));
        assert!(json.contains("\"total_pledged\": 0.0"));
        assert!(!json.contains("-0.0"));
    }

    #[test]
    fn test_profile_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{ "name": "A", "net_worth": 10.0, "records": [{ "category": "DAF", "amount": 2.0 }] }"#,
        )
        .unwrap();

        let profile = DonorProfile::from_file(file.path()).unwrap();

        assert_eq!(profile.name, "A");
        assert_eq!(profile.records.len(), 1);
        assert_eq!(profile.records[0].category, GiftCategory::DafEstimate);
        assert!(!profile.is_pledge_signer);
        assert!(DonorProfile::from_file("/nonexistent/profile.json").is_err());
    }
}
