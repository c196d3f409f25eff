// Scrooge Index - Core Library
// Cross-source gift deduplication and composite generosity-deficit scoring

pub mod gift;          // Raw + unified gift records
pub mod matching;      // Recipient normalizer, similarity, self-dealing filter
pub mod deduplication; // Dedup key builder + priority resolver
pub mod aggregation;   // Pledge split + category totals
pub mod scoring;       // Composite score calculator
pub mod sources;       // Best-effort source contract + file loaders
pub mod config;        // Tunable constants
pub mod estimate;      // End-to-end estimation pipeline

// Re-export commonly used types
pub use gift::{
    GiftCategory, SourceConfidence, RawGiftRecord, UnifiedGift, RecordDefaults,
};
pub use matching::{
    normalize, similarity, is_self_gift, is_self_gift_at,
};
pub use deduplication::{
    DeduplicationEngine, DedupKey, DedupStats, DedupResult,
    dedup_key, deduplicate,
};
pub use aggregation::{
    PledgeSplit, CategoryBreakdown,
    split_pledges, aggregate_by_category, aggregate_raw_by_category,
};
pub use scoring::{
    ScoreCalculator, ScoreBreakdown, ScroogeInputs,
    score, giving_rate_pct,
};
pub use sources::{
    GiftSource, SourceOutcome, StaticSource, FileSource,
    load_records, load_records_csv, load_records_json,
};
pub use config::EstimatorConfig;
pub use estimate::{
    DonorProfile, EstimationEngine, GivingEstimate,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
