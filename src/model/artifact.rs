use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::FeatureMode;

/// Artifact layout version understood by this build.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serialized, pre-trained classifier together with the feature contract it
/// was trained against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,

    /// Model identifier (e.g. "fraud_random_forest")
    pub name: String,

    /// Training run version
    pub version: String,

    /// Derivation mode used to build the training features
    pub feature_mode: FeatureMode,

    /// Training-time feature order; its length is the input arity
    pub feature_names: Vec<String>,

    pub classifier: Classifier,
}

impl ModelArtifact {
    /// Number of features the classifier consumes.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Score a feature slice. The caller must check the arity first.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        self.classifier.evaluate(features)
    }
}

/// What the classifier's output means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Calibrated probability of the fraud class
    Probability,
    /// Class label cast to 0.0 or 1.0
    HardLabel,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Probability => write!(f, "probability"),
            OutputKind::HardLabel => write!(f, "hard_label"),
        }
    }
}

/// Supported classifier families.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classifier {
    /// Averaged per-tree class probabilities
    RandomForest { trees: Vec<DecisionTree> },

    /// Sigmoid of a linear score
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },

    /// Uncalibrated margin classifier; only a hard label is available
    LinearSvm {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::RandomForest { .. } => "random_forest",
            Classifier::LogisticRegression { .. } => "logistic_regression",
            Classifier::LinearSvm { .. } => "linear_svm",
        }
    }

    pub fn output_kind(&self) -> OutputKind {
        match self {
            Classifier::RandomForest { .. } | Classifier::LogisticRegression { .. } => {
                OutputKind::Probability
            }
            Classifier::LinearSvm { .. } => OutputKind::HardLabel,
        }
    }

    /// Fraud probability, or the hard label as 0.0/1.0 for label-only models.
    ///
    /// Malformed trees yield NaN rather than panicking.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        match self {
            Classifier::RandomForest { trees } => {
                if trees.is_empty() {
                    return f64::NAN;
                }
                let total: f64 = trees.iter().map(|tree| tree.predict_proba(features)).sum();
                total / trees.len() as f64
            }
            Classifier::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let margin = linear_margin(coefficients, *intercept, features);
                1.0 / (1.0 + (-margin).exp())
            }
            Classifier::LinearSvm {
                coefficients,
                intercept,
            } => {
                if linear_margin(coefficients, *intercept, features) > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

fn linear_margin(coefficients: &[f64], intercept: f64, features: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(features)
        .fold(intercept, |acc, (w, x)| acc + w * x)
}

/// Binary decision tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go left when `x[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class weights `[legit, fraud]`
    Leaf { value: [f64; 2] },
}

impl DecisionTree {
    /// Fraud-class probability of the leaf the sample lands in.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        let mut index = 0;

        // A well-formed tree reaches a leaf in at most `nodes.len()` steps.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).copied().unwrap_or(f64::NAN);
                    index = if x <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => return value[1] / (value[0] + value[1]),
                None => return f64::NAN,
            }
        }

        f64::NAN
    }
}
