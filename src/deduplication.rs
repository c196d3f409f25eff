// 🔍 Deduplication Engine - Remove double-counted gifts across sources
// Filter self-dealing → group by coarse key → keep the highest-priority source

use crate::aggregation::split_pledges;
use crate::config::EstimatorConfig;
use crate::gift::{RawGiftRecord, RecordDefaults, UnifiedGift};
use crate::matching::{is_self_gift_at, normalize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

// ============================================================================
// DEDUP KEY
// ============================================================================

/// Coarse grouping key: records sharing one are treated as the same gift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
    /// Normalized recipient, truncated
    pub name: String,
    pub year: i32,
    /// floor(amount / bucket width)
    pub bucket: i64,
}

/// Build a key with the standard 20-character name and $10M bucket
pub fn dedup_key(recipient: &str, year: i32, amount: f64) -> DedupKey {
    DeduplicationEngine::new().key(recipient, year, amount)
}

// ============================================================================
// DEDUP STATS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupStats {
    pub original_count: usize,

    /// Gifts that landed at the donor's own foundation
    pub foundation_transfers_removed: usize,

    /// Lower-priority members of duplicate groups
    pub duplicates_removed: usize,

    pub final_count: usize,
    pub pledges_count: usize,
    pub disbursed_count: usize,
    pub total_pledged: f64,
    pub total_disbursed: f64,

    /// duplicates_removed / original_count * 100
    pub dedup_percentage: f64,
}

impl DedupStats {
    pub fn summary(&self) -> String {
        format!(
            "{} records → {} gifts ({} foundation transfers, {} duplicates, {:.1}% dedup) | pledged ${:.0}, disbursed ${:.0}",
            self.original_count,
            self.final_count,
            self.foundation_transfers_removed,
            self.duplicates_removed,
            self.dedup_percentage,
            self.total_pledged,
            self.total_disbursed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupResult {
    pub gifts: Vec<UnifiedGift>,
    pub stats: DedupStats,
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine {
    /// Characters of the normalized name kept in the key (default: 20)
    pub name_key_length: usize,

    /// Amount bucket width in dollars (default: $10M)
    pub bucket_width: f64,

    /// Self-dealing similarity threshold (default: 0.70)
    pub self_dealing_threshold: f64,

    /// Fallbacks for missing year / pledge status
    pub defaults: RecordDefaults,
}

impl DeduplicationEngine {
    /// Create engine with default thresholds
    pub fn new() -> Self {
        Self::from_config(&EstimatorConfig::new())
    }

    pub fn from_config(config: &EstimatorConfig) -> Self {
        DeduplicationEngine {
            name_key_length: config.name_key_length,
            bucket_width: config.bucket_width,
            self_dealing_threshold: config.self_dealing_threshold,
            defaults: config.record_defaults(),
        }
    }

    /// Grouping key for one gift
    pub fn key(&self, recipient: &str, year: i32, amount: f64) -> DedupKey {
        let name: String = normalize(recipient).chars().take(self.name_key_length).collect();

        let bucket = if self.bucket_width > 0.0 && amount.is_finite() {
            (amount / self.bucket_width).floor() as i64
        } else {
            0
        };

        DedupKey { name, year, bucket }
    }

    pub fn key_for(&self, gift: &UnifiedGift) -> DedupKey {
        self.key(&gift.recipient, gift.year, gift.amount)
    }

    /// Run the full pipeline over every source's records
    pub fn deduplicate<S: AsRef<str>>(
        &self,
        records: &[RawGiftRecord],
        donor_foundation_names: &[S],
    ) -> DedupResult {
        let original_count = records.len();

        // 1. Filter self-dealing
        let mut candidates = Vec::with_capacity(records.len());
        let mut foundation_transfers_removed = 0;

        for record in records {
            let gift = record.resolve(&self.defaults);
            if is_self_gift_at(&gift.recipient, donor_foundation_names, self.self_dealing_threshold) {
                debug!(
                    recipient = %gift.recipient,
                    amount = gift.amount,
                    category = %gift.category,
                    "dropping transfer to donor's own foundation"
                );
                foundation_transfers_removed += 1;
                continue;
            }
            candidates.push(gift);
        }

        // 2. Group by key, buckets kept in first-seen order
        let mut order: Vec<DedupKey> = Vec::new();
        let mut buckets: HashMap<DedupKey, Vec<UnifiedGift>> = HashMap::new();

        for gift in candidates {
            let key = self.key_for(&gift);
            buckets
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(gift);
        }

        // 3. Resolve each bucket to one winner
        let mut gifts = Vec::with_capacity(order.len());
        let mut duplicates_removed = 0;

        for key in &order {
            let Some(members) = buckets.remove(key) else {
                continue;
            };
            duplicates_removed += members.len().saturating_sub(1);
            if let Some(winner) = self.resolve_group(members) {
                gifts.push(winner);
            }
        }

        // 4. Stats
        let split = split_pledges(&gifts);
        let dedup_percentage = if original_count == 0 {
            0.0
        } else {
            duplicates_removed as f64 / original_count as f64 * 100.0
        };

        let stats = DedupStats {
            original_count,
            foundation_transfers_removed,
            duplicates_removed,
            final_count: gifts.len(),
            pledges_count: split.pledged.len(),
            disbursed_count: split.disbursed.len(),
            total_pledged: split.total_pledged(),
            total_disbursed: split.total_disbursed(),
            dedup_percentage,
        };

        info!(
            original = stats.original_count,
            foundation_transfers = stats.foundation_transfers_removed,
            duplicates = stats.duplicates_removed,
            kept = stats.final_count,
            "deduplication complete"
        );

        DedupResult { gifts, stats }
    }

    /// Keep the highest-priority member; earliest wins ties
    fn resolve_group(&self, members: Vec<UnifiedGift>) -> Option<UnifiedGift> {
        let mut members = members.into_iter();
        let mut winner = members.next()?;

        for challenger in members {
            let (kept, dropped) = if challenger.category.priority() > winner.category.priority() {
                (challenger, winner)
            } else {
                (winner, challenger)
            };

            debug!(
                recipient = %dropped.recipient,
                year = dropped.year,
                dropped = %dropped.category,
                kept = %kept.category,
                "duplicate gift discarded"
            );
            winner = kept;
        }

        Some(winner)
    }
}

impl Default for DeduplicationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Deduplicate with default settings
pub fn deduplicate<S: AsRef<str>>(
    records: &[RawGiftRecord],
    donor_foundation_names: &[S],
) -> (Vec<UnifiedGift>, DedupStats) {
    let result = DeduplicationEngine::new().deduplicate(records, donor_foundation_names);
    (result.gifts, result.stats)
}

// ============================================================================
// TESTS
// ============================================================================
