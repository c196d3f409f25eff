// 🧮 Composite Score - one comparative "generosity deficit" number
//
// raw = giving_gap*40 + years_penalty*20 + pledge_breach*20 + flag_penalty*20
//
// Meeting the benchmark giving rate is a hard pass: the score is forced to 0
// whatever the tenure and red flags are.

use crate::config::EstimatorConfig;
use serde::{Deserialize, Serialize};

/// Benchmark annual giving rate, percent of net worth
pub const EXPECTED_RATE_PCT: f64 = 10.0;

/// Years of wealth before the tenure penalty starts
pub const GRACE_YEARS: i32 = 3;

/// Years of wealth at which the tenure penalty saturates
pub const FULL_PENALTY_YEARS: i32 = 20;

/// Each red flag adds this share of the flag term, saturating at 4
pub const FLAG_STEP: f64 = 0.25;

const GAP_WEIGHT: f64 = 40.0;
const YEARS_WEIGHT: f64 = 20.0;
const PLEDGE_WEIGHT: f64 = 20.0;
const FLAG_WEIGHT: f64 = 20.0;

// ============================================================================
// INPUTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScroogeInputs {
    /// Observable giving / net worth * 100
    pub giving_rate_pct: f64,
    pub years_held_wealth: i32,
    pub is_pledge_signer: bool,
    pub red_flag_count: u32,
}

/// Observable giving as a percentage of net worth.
///
/// Unknown or non-positive net worth yields 0.0.
pub fn giving_rate_pct(observable_giving: f64, net_worth: f64) -> f64 {
    if !net_worth.is_finite() || net_worth <= 0.0 || !observable_giving.is_finite() {
        return 0.0;
    }
    observable_giving.max(0.0) * 100.0 / net_worth
}

// ============================================================================
// SCORE BREAKDOWN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub giving_gap: f64,
    pub years_penalty: f64,
    pub pledge_breach: f64,
    pub flag_penalty: f64,

    /// Weighted sum before the override
    pub raw_score: f64,

    /// Giving met the benchmark, score forced to 0
    pub override_applied: bool,

    /// Final score in [0, 100], one decimal
    pub score: f64,
}

impl ScoreBreakdown {
    pub fn summary(&self) -> String {
        if self.override_applied {
            return format!("Score {:.1} (benchmark met)", self.score);
        }
        format!(
            "Score {:.1} = gap {:.1} + tenure {:.1} + pledge {:.1} + flags {:.1}",
            self.score,
            self.giving_gap * GAP_WEIGHT,
            self.years_penalty * YEARS_WEIGHT,
            self.pledge_breach * PLEDGE_WEIGHT,
            self.flag_penalty * FLAG_WEIGHT
        )
    }
}

// ============================================================================
// SCORE CALCULATOR
// ============================================================================

pub struct ScoreCalculator {
    /// Benchmark giving rate in percent (default: 10.0)
    pub expected_rate_pct: f64,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        ScoreCalculator {
            expected_rate_pct: EXPECTED_RATE_PCT,
        }
    }

    pub fn with_expected_rate(expected_rate_pct: f64) -> Self {
        ScoreCalculator { expected_rate_pct }
    }

    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self::with_expected_rate(config.expected_rate_pct)
    }

    pub fn score(&self, inputs: &ScroogeInputs) -> f64 {
        self.breakdown(inputs).score
    }

    pub fn breakdown(&self, inputs: &ScroogeInputs) -> ScoreBreakdown {
        let expected = self.expected_rate_pct;
        // NaN means nothing observable; infinities keep their sign
        let rate = if inputs.giving_rate_pct.is_nan() {
            0.0
        } else {
            inputs.giving_rate_pct
        };

        // A zero benchmark can't be divided by; treat it as no gap
        let giving_gap = if expected > 0.0 {
            ((expected - rate) / expected).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let years_penalty = if inputs.years_held_wealth < GRACE_YEARS {
            0.0
        } else {
            let ramp = (FULL_PENALTY_YEARS - GRACE_YEARS) as f64;
            ((inputs.years_held_wealth - GRACE_YEARS) as f64 / ramp).clamp(0.0, 1.0)
        };

        let pledge_breach = if inputs.is_pledge_signer && rate < expected {
            1.0
        } else {
            0.0
        };

        let flag_penalty = (inputs.red_flag_count as f64 * FLAG_STEP).clamp(0.0, 1.0);

        let raw_score = giving_gap * GAP_WEIGHT
            + years_penalty * YEARS_WEIGHT
            + pledge_breach * PLEDGE_WEIGHT
            + flag_penalty * FLAG_WEIGHT;

        let override_applied = rate >= expected;
        let score = if override_applied {
            0.0
        } else {
            round1(raw_score.clamp(0.0, 100.0))
        };

        ScoreBreakdown {
            giving_gap,
            years_penalty,
            pledge_breach,
            flag_penalty,
            raw_score,
            override_applied,
            score,
        }
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Score with the standard 10% benchmark
pub fn score(giving_rate_pct: f64, years_held_wealth: i32, is_pledge_signer: bool, red_flag_count: u32) -> f64 {
    ScoreCalculator::new().score(&ScroogeInputs {
        giving_rate_pct,
        years_held_wealth,
        is_pledge_signer,
        red_flag_count,
    })
}

// ============================================================================
// TESTS
// ============================================================================
