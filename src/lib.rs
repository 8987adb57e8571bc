pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod model;
pub mod observability;
pub mod scoring;
pub mod storage;

pub use config::Config;
pub use domain::{Assessment, Decision, FeatureMode, RiskTier, ScoreResult, TransactionRequest};
pub use error::ScoringError;
pub use scoring::{FeatureDeriver, ModelScorer, Scorer, ScoringPipeline};
