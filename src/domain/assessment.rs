use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::decision::{Decision, RiskTier};

/// Probability at or above which a transaction is flagged as fraud.
///
/// Independent of the tier cut points: a MEDIUM result can be flagged.
pub const FRAUD_THRESHOLD: f64 = 0.5;

/// Decimal places of the externally reported probability.
pub const REPORTED_DECIMALS: u32 = 4;

/// Round a probability for reporting.
///
/// Rounds the exact binary value half-to-even, then takes the nearest `f64`
/// to the decimal result.
pub fn round_probability(probability: f64) -> f64 {
    match Decimal::from_f64_retain(probability) {
        Some(exact) => {
            let rounded = exact
                .round_dp_with_strategy(REPORTED_DECIMALS, RoundingStrategy::MidpointNearestEven);
            rounded.mantissa() as f64 / 10f64.powi(rounded.scale() as i32)
        }
        None => probability,
    }
}

/// Numeric outcome of scoring one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Probability rounded to 4 decimal places
    pub probability: f64,

    /// True iff the unrounded probability is >= 0.5
    pub fraud_flag: bool,

    pub risk_tier: RiskTier,
}

impl ScoreResult {
    /// Build from the unrounded model output. Flag and tier are computed
    /// before rounding so display rounding cannot move a boundary.
    pub fn from_probability(raw: f64) -> Self {
        ScoreResult {
            probability: round_probability(raw),
            fraud_flag: raw >= FRAUD_THRESHOLD,
            risk_tier: RiskTier::from_probability(raw),
        }
    }
}

/// Combined pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub score: ScoreResult,
    pub decision: Decision,
}
