use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Number of features produced by either derivation mode.
pub const FEATURE_COUNT: usize = 7;

/// Feature order for passthrough mode.
pub const PASSTHROUGH_FEATURES: [&str; FEATURE_COUNT] = [
    "amount",
    "hour",
    "feature_3",
    "feature_4",
    "feature_5",
    "feature_6",
    "feature_7",
];

/// Feature order for engineered mode.
pub const ENGINEERED_FEATURES: [&str; FEATURE_COUNT] =
    ["amount", "hour", "v1", "v2", "v3", "v4", "v5"];

/// How auxiliary features are obtained. Selected once at startup and
/// recorded in the model artifact it pairs with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureMode {
    /// Auxiliary features taken verbatim from the request
    Passthrough,
    /// Auxiliary features synthesized from amount and hour
    #[default]
    Engineered,
}

impl FeatureMode {
    /// Ordered feature names the model must have been trained on.
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            FeatureMode::Passthrough => &PASSTHROUGH_FEATURES,
            FeatureMode::Engineered => &ENGINEERED_FEATURES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureMode::Passthrough => "passthrough",
            FeatureMode::Engineered => "engineered",
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-order numeric input to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(SmallVec<[f64; 8]>);

impl FeatureVector {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        FeatureVector(values.into_iter().collect())
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the first NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|x| !x.is_finite())
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector(SmallVec::from_vec(values))
    }
}
