pub mod decision;
pub mod features;
pub mod pipeline;
pub mod scorer;

#[cfg(test)]
pub(crate) mod test_support;

pub use decision::{decide, decide_for, explain};
pub use features::FeatureDeriver;
pub use pipeline::ScoringPipeline;
pub use scorer::{ModelScorer, ModelStatus, Scorer};
