// 🎁 Gift Records - Raw source records and their unified form
// Every fetcher hands us RawGiftRecords; the dedup engine hands back UnifiedGifts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recipient used when a source gave us nothing usable
pub const UNKNOWN_RECIPIENT: &str = "Unknown";

// ============================================================================
// GIFT CATEGORY
// ============================================================================

/// GiftCategory - which kind of public record a gift was observed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GiftCategory {
    /// 990-PF grant paid out by a private foundation
    #[serde(alias = "FOUNDATIONS")]
    FoundationGrant,

    /// Press-reported or self-announced gift
    #[serde(alias = "DIRECT_GIFTS")]
    DirectGift,

    /// Insider stock gift (Form 4, code G)
    #[serde(alias = "SECURITIES", alias = "SEC_FORM4")]
    SecuritiesTransfer,

    /// Grant disclosed by a philanthropic LLC
    #[serde(alias = "LLC_GRANTS", alias = "PHILANTHROPIC_LLC")]
    PhilanthropicLlcGrant,

    /// Estimated charitable trust payout
    #[serde(alias = "TRUSTS")]
    TrustPayout,

    /// Donor-advised fund proxy
    #[serde(alias = "DAF", alias = "DAFS")]
    DafEstimate,

    /// Anything a source labelled with a category we don't know
    #[serde(other)]
    Unknown,
}

impl GiftCategory {
    /// Conflict-resolution priority (higher wins a duplicate group)
    ///
    /// Foundation filings are the most reliable record of money actually
    /// deployed. Securities transfers rank low because a stock gift usually
    /// lands in a foundation that reports its own grants later.
    pub fn priority(&self) -> u8 {
        match self {
            GiftCategory::FoundationGrant => 5,
            GiftCategory::PhilanthropicLlcGrant => 4,
            GiftCategory::DirectGift => 3,
            GiftCategory::SecuritiesTransfer => 2,
            GiftCategory::DafEstimate => 1,
            GiftCategory::TrustPayout | GiftCategory::Unknown => 0,
        }
    }

    /// Wire label, as serialized
    pub fn label(&self) -> &'static str {
        match self {
            GiftCategory::FoundationGrant => "FOUNDATION_GRANT",
            GiftCategory::DirectGift => "DIRECT_GIFT",
            GiftCategory::SecuritiesTransfer => "SECURITIES_TRANSFER",
            GiftCategory::PhilanthropicLlcGrant => "PHILANTHROPIC_LLC_GRANT",
            GiftCategory::TrustPayout => "TRUST_PAYOUT",
            GiftCategory::DafEstimate => "DAF_ESTIMATE",
            GiftCategory::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for GiftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SOURCE CONFIDENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceConfidence {
    High,
    Medium,
    #[default]
    Low,
    Zero,
}

// ============================================================================
// RAW GIFT RECORD
// ============================================================================

/// RawGiftRecord - one gift as a source reported it
///
/// Optional fields are the ones sources routinely omit. They are filled in
/// once, by `resolve`, never at individual call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGiftRecord {
    pub category: GiftCategory,

    #[serde(default)]
    pub recipient: Option<String>,

    #[serde(default)]
    pub amount: Option<f64>,

    #[serde(default)]
    pub year: Option<i32>,

    /// true = announced, not confirmed disbursed
    #[serde(default)]
    pub is_pledge: Option<bool>,

    #[serde(default)]
    pub source_url: String,

    #[serde(default)]
    pub confidence: Option<SourceConfidence>,
}

/// Fallbacks applied when a raw record is missing a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordDefaults {
    pub year: i32,
    pub is_pledge: bool,
}

impl RawGiftRecord {
    /// Create a record with the fields every source provides
    pub fn new(category: GiftCategory, recipient: impl Into<String>, amount: f64, year: i32) -> Self {
        RawGiftRecord {
            category,
            recipient: Some(recipient.into()),
            amount: Some(amount),
            year: Some(year),
            is_pledge: None,
            source_url: String::new(),
            confidence: None,
        }
    }

    /// Builder pattern: mark pledge / disbursement status
    pub fn with_pledge(mut self, is_pledge: bool) -> Self {
        self.is_pledge = Some(is_pledge);
        self
    }

    /// Builder pattern: add source URL
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Builder pattern: add source confidence
    pub fn with_confidence(mut self, confidence: SourceConfidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Recipient name, or "Unknown" when missing or blank
    pub fn recipient_or_default(&self) -> &str {
        match self.recipient.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_RECIPIENT,
        }
    }

    /// Amount, coerced to a finite non-negative value
    pub fn amount_or_default(&self) -> f64 {
        match self.amount {
            Some(a) if a.is_finite() && a > 0.0 => a,
            _ => 0.0,
        }
    }

    /// Apply defaulting rules and produce the unified shape
    pub fn resolve(&self, defaults: &RecordDefaults) -> UnifiedGift {
        UnifiedGift {
            category: self.category,
            recipient: self.recipient_or_default().to_string(),
            amount: self.amount_or_default(),
            year: self.year.unwrap_or(defaults.year),
            is_pledge: self.is_pledge.unwrap_or(defaults.is_pledge),
            source_url: self.source_url.clone(),
            confidence: self.confidence.unwrap_or_default(),
        }
    }
}

// ============================================================================
// UNIFIED GIFT
// ============================================================================

/// UnifiedGift - one surviving gift after deduplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedGift {
    pub category: GiftCategory,
    pub recipient: String,
    pub amount: f64,
    pub year: i32,
    pub is_pledge: bool,
    pub source_url: String,
    pub confidence: SourceConfidence,
}

impl From<UnifiedGift> for RawGiftRecord {
    fn from(gift: UnifiedGift) -> Self {
        RawGiftRecord {
            category: gift.category,
            recipient: Some(gift.recipient),
            amount: Some(gift.amount),
            year: Some(gift.year),
            is_pledge: Some(gift.is_pledge),
            source_url: gift.source_url,
            confidence: Some(gift.confidence),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
