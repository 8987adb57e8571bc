use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (inclusive) of the MEDIUM tier.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.30;

/// Lower bound (inclusive) of the HIGH tier.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Discrete risk bucket derived from the fraud probability.
///
/// Tiers are ordered by severity from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum RiskTier {
    /// Approve
    Low = 0,
    /// Step-up verification
    Medium = 1,
    /// Block and escalate
    High = 2,
}

impl RiskTier {
    /// Bucket an unrounded probability.
    ///
    /// Boundary values belong to the upper bucket: 0.30 is MEDIUM, 0.70 is HIGH.
    #[inline]
    pub fn from_probability(probability: f64) -> Self {
        if probability < MEDIUM_RISK_THRESHOLD {
            RiskTier::Low
        } else if probability < HIGH_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    /// Recommended action for this tier.
    pub fn action(&self) -> &'static str {
        match self {
            RiskTier::Low => "approve",
            RiskTier::Medium => "step-up verification required",
            RiskTier::High => "block and escalate to investigation",
        }
    }

    /// Tier-level explanation, always the first reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            RiskTier::Low => "no significant anomaly patterns",
            RiskTier::Medium => "moderate anomaly patterns",
            RiskTier::High => "strong fraud indicators",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    /// Parse from string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(RiskTier::Low),
            "MEDIUM" => Some(RiskTier::Medium),
            "HIGH" => Some(RiskTier::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended handling of a scored transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub risk_tier: RiskTier,

    /// Human-readable recommended action
    pub action_label: String,

    /// Tier reason first, then rule-based explainability signals
    pub reason_codes: Vec<String>,
}

impl Decision {
    /// Decision for a tier with only the tier-level reason.
    pub fn for_tier(risk_tier: RiskTier) -> Self {
        Decision {
            risk_tier,
            action_label: risk_tier.action().to_string(),
            reason_codes: vec![risk_tier.reason().to_string()],
        }
    }

    /// Append an explanatory reason after the existing ones.
    pub fn push_reason(&mut self, reason: impl Into<String>) {
        self.reason_codes.push(reason.into());
    }
}
