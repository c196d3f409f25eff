// 📊 Aggregation - Pledge/disbursement split and per-category totals

use crate::gift::{GiftCategory, RawGiftRecord, UnifiedGift};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// PLEDGE SPLIT
// ============================================================================

/// Deduplicated gifts partitioned by "is the money actually out the door"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PledgeSplit {
    pub pledged: Vec<UnifiedGift>,
    pub disbursed: Vec<UnifiedGift>,
}

impl PledgeSplit {
    pub fn total_pledged(&self) -> f64 {
        self.pledged.iter().fold(0.0, |acc, g| acc + g.amount)
    }

    pub fn total_disbursed(&self) -> f64 {
        self.disbursed.iter().fold(0.0, |acc, g| acc + g.amount)
    }
}

pub fn split_pledges(gifts: &[UnifiedGift]) -> PledgeSplit {
    let (pledged, disbursed): (Vec<UnifiedGift>, Vec<UnifiedGift>) =
        gifts.iter().cloned().partition(|g| g.is_pledge);
    PledgeSplit { pledged, disbursed }
}

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

/// Sum amounts per category. Categories with no gifts are absent.
pub fn aggregate_by_category(gifts: &[UnifiedGift]) -> BTreeMap<GiftCategory, f64> {
    let mut totals = BTreeMap::new();
    for gift in gifts {
        *totals.entry(gift.category).or_insert(0.0) += gift.amount;
    }
    totals
}

/// Same sums over raw records, before any deduplication
pub fn aggregate_raw_by_category(records: &[RawGiftRecord]) -> BTreeMap<GiftCategory, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.category).or_insert(0.0) += record.amount_or_default();
    }
    totals
}

/// Per-category totals before and after deduplication
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub before: BTreeMap<GiftCategory, f64>,
    pub after: BTreeMap<GiftCategory, f64>,
}

impl CategoryBreakdown {
    pub fn compute(raw: &[RawGiftRecord], deduped: &[UnifiedGift]) -> Self {
        CategoryBreakdown {
            before: aggregate_raw_by_category(raw),
            after: aggregate_by_category(deduped),
        }
    }

    /// Money dropped from each category by self-dealing and duplicate removal
    pub fn removed(&self) -> BTreeMap<GiftCategory, f64> {
        self.before
            .iter()
            .map(|(category, before)| {
                let after = self.after.get(category).copied().unwrap_or(0.0);
                (*category, (before - after).max(0.0))
            })
            .collect()
    }

    pub fn total_before(&self) -> f64 {
        self.before.values().fold(0.0, |acc, v| acc + v)
    }

    pub fn total_after(&self) -> f64 {
        self.after.values().fold(0.0, |acc, v| acc + v)
    }

    pub fn summary(&self) -> String {
        let lines: Vec<String> = self
            .before
            .iter()
            .map(|(category, before)| {
                format!(
                    "{:<24} ${:>16.0} → ${:>16.0}",
                    category.label(),
                    before,
                    self.after.get(category).copied().unwrap_or(0.0)
                )
            })
            .collect();
        lines.join("\n")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorConfig;

    fn create_test_gift(category: GiftCategory, amount: f64, is_pledge: bool) -> UnifiedGift {
        RawGiftRecord::new(category, "Test Recipient", amount, 2023)
            .with_pledge(is_pledge)
            .resolve(&EstimatorConfig::new().record_defaults())
    }

    #[test]
    fn test_split_pledges() {
        let gifts = vec![
            create_test_gift(GiftCategory::DirectGift, 100.0, true),
            create_test_gift(GiftCategory::DirectGift, 40.0, false),
            create_test_gift(GiftCategory::FoundationGrant, 60.0, false),
        ];

        let split = split_pledges(&gifts);

        assert_eq!(split.pledged.len(), 1);
        assert_eq!(split.disbursed.len(), 2);
        assert_eq!(split.total_pledged(), 100.0);
        assert_eq!(split.total_disbursed(), 100.0);
    }

    #[test]
    fn test_aggregate_by_category() {
        let gifts = vec![
            create_test_gift(GiftCategory::DirectGift, 10.0, false),
            create_test_gift(GiftCategory::DirectGift, 5.0, true),
            create_test_gift(GiftCategory::DafEstimate, 7.0, false),
        ];

        let totals = aggregate_by_category(&gifts);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&GiftCategory::DirectGift], 15.0);
        assert_eq!(totals[&GiftCategory::DafEstimate], 7.0);
        assert!(!totals.contains_key(&GiftCategory::FoundationGrant));
    }

    #[test]
    fn test_empty_totals_are_positive_zero() {
        let split = split_pledges(&[]);
        let breakdown = CategoryBreakdown::compute(&[], &[]);

        for total in [
            split.total_pledged(),
            split.total_disbursed(),
            breakdown.total_before(),
            breakdown.total_after(),
        ] {
            assert_eq!(total, 0.0);
            assert!(total.is_sign_positive());
        }
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_by_category(&[]).is_empty());
        assert!(aggregate_raw_by_category(&[]).is_empty());
    }

    #[test]
    fn test_category_breakdown_removed() {
        let raw = vec![
            RawGiftRecord::new(GiftCategory::FoundationGrant, "Yale", 50.0, 2023),
            RawGiftRecord::new(GiftCategory::DirectGift, "Yale University", 50.0, 2023),
        ];
        let defaults = EstimatorConfig::new().record_defaults();
        let deduped = vec![raw[0].resolve(&defaults)];

        let breakdown = CategoryBreakdown::compute(&raw, &deduped);

        assert_eq!(breakdown.total_before(), 100.0);
        assert_eq!(breakdown.total_after(), 50.0);
        assert_eq!(breakdown.removed()[&GiftCategory::DirectGift], 50.0);
        assert_eq!(breakdown.removed()[&GiftCategory::FoundationGrant], 0.0);
        assert!(breakdown.summary().contains("DIRECT_GIFT"));
    }
}
