pub mod assessment;
pub mod decision;
pub mod features;
pub mod transaction;

pub use assessment::{round_probability, Assessment, ScoreResult, FRAUD_THRESHOLD};
pub use decision::{Decision, RiskTier, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use features::{FeatureMode, FeatureVector, FEATURE_COUNT};
pub use transaction::TransactionRequest;
