use crate::domain::{Decision, RiskTier, TransactionRequest};

/// Amount at or above which the "high transaction amount" reason is added.
pub const HIGH_AMOUNT_THRESHOLD: f64 = 100_000.0;

/// Earliest hour considered normal activity.
pub const EARLIEST_NORMAL_HOUR: i64 = 6;

/// Latest hour considered normal activity.
pub const LATEST_NORMAL_HOUR: i64 = 22;

pub const REASON_HIGH_AMOUNT: &str = "high transaction amount";
pub const REASON_UNUSUAL_TIMING: &str = "unusual transaction timing";

/// Map an unrounded probability to a tier, action and tier reason.
pub fn decide(probability: f64) -> Decision {
    Decision::for_tier(RiskTier::from_probability(probability))
}

/// Append rule-based explainability signals after the tier reason.
///
/// Only `reason_codes` changes; the tier and action are left as the model
/// output determined them.
pub fn explain(decision: &mut Decision, request: &TransactionRequest) {
    if request.amount >= HIGH_AMOUNT_THRESHOLD {
        decision.push_reason(REASON_HIGH_AMOUNT);
    }

    if request.hour < EARLIEST_NORMAL_HOUR || request.hour > LATEST_NORMAL_HOUR {
        decision.push_reason(REASON_UNUSUAL_TIMING);
    }
}

/// `decide` followed by `explain`.
pub fn decide_for(probability: f64, request: &TransactionRequest) -> Decision {
    let mut decision = decide(probability);
    explain(&mut decision, request);
    decision
}
