// 🔤 Recipient Matching - Normalize organization names and score similarity
// Three-tier ladder: exact > containment > word overlap

use std::collections::HashSet;

/// Similarity above which a recipient counts as the donor's own foundation
pub const SELF_DEALING_THRESHOLD: f64 = 0.7;

/// Score given when one normalized name contains the other
pub const CONTAINMENT_SCORE: f64 = 0.9;

/// Trailing organizational words dropped before comparison
pub const ORG_SUFFIXES: [&str; 16] = [
    "foundation",
    "fdn",
    "fund",
    "trust",
    "university",
    "univ",
    "hospital",
    "hosp",
    "center",
    "centre",
    "ctr",
    "memorial",
    "institute",
    "inst",
    "inc",
    "llc",
];

// ============================================================================
// NORMALIZER
// ============================================================================

/// Canonicalize a free-text organization name for comparison.
///
/// Lowercases, drops punctuation, collapses whitespace, then keeps stripping
/// any trailing `" <suffix>"` until none match. A name that *is* a suffix
/// ("Foundation") is left alone.
pub fn normalize(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut out = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    // Rescan the full list after every strip
    while let Some(shorter) = strip_one_suffix(&out) {
        out = shorter;
    }

    out
}

fn strip_one_suffix(name: &str) -> Option<String> {
    ORG_SUFFIXES.iter().find_map(|suffix| {
        name.strip_suffix(suffix)
            .and_then(|rest| rest.strip_suffix(' '))
            .map(str::to_string)
    })
}

// ============================================================================
// SIMILARITY
// ============================================================================

/// Score two organization names in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a == b {
        return 1.0;
    }

    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SCORE;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }

    words_a.intersection(&words_b).count() as f64 / union as f64
}

// ============================================================================
// SELF-DEALING FILTER
// ============================================================================

/// True if `recipient` looks like one of the donor's own foundations.
pub fn is_self_gift<S: AsRef<str>>(recipient: &str, donor_foundation_names: &[S]) -> bool {
    is_self_gift_at(recipient, donor_foundation_names, SELF_DEALING_THRESHOLD)
}

/// Same as `is_self_gift` with an explicit threshold
pub fn is_self_gift_at<S: AsRef<str>>(
    recipient: &str,
    donor_foundation_names: &[S],
    threshold: f64,
) -> bool {
    if donor_foundation_names.is_empty() {
        return false;
    }

    donor_foundation_names
        .iter()
        .any(|f| similarity(recipient, f.as_ref()) > threshold)
}

// ============================================================================
// TESTS
// ============================================================================
