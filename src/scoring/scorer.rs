use serde::Serialize;
use std::fmt::Debug;
use tracing::error;

use crate::domain::{FeatureMode, FeatureVector};
use crate::error::ScoringError;
use crate::model::{ModelArtifact, ModelLoader, OutputKind};

/// Readiness snapshot of the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    pub loaded: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_mode: Option<FeatureMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_features: Option<usize>,

    /// Whether scores are probabilities or degraded hard labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelStatus {
    /// Status for a scorer with no usable model.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelStatus {
            loaded: false,
            name: None,
            version: None,
            classifier: None,
            feature_mode: None,
            n_features: None,
            output: None,
            error: Some(reason.into()),
        }
    }
}

/// Turns a feature vector into a fraud probability in [0, 1].
///
/// Implementations are shared across concurrent requests and must not
/// mutate state while scoring.
pub trait Scorer: Send + Sync + Debug {
    /// Score a feature vector.
    ///
    /// Fails with `ModelUnavailable` when no model is loaded and with
    /// `FeatureShapeMismatch` before invoking the model if the vector length
    /// differs from the model's input arity.
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError>;

    /// Report what is loaded, for readiness probes.
    fn status(&self) -> ModelStatus;
}

#[derive(Debug)]
enum ModelState {
    Loaded(ModelArtifact),
    Unavailable(String),
}

/// Scorer backed by the artifact loaded at startup.
///
/// A load failure is kept as state and reported on every scoring attempt.
/// Label-only classifiers return 0.0 or 1.0; `status().output` says so.
#[derive(Debug)]
pub struct ModelScorer {
    state: ModelState,
}

impl ModelScorer {
    /// Wrap a validated artifact.
    pub fn new(artifact: ModelArtifact) -> Self {
        ModelScorer {
            state: ModelState::Loaded(artifact),
        }
    }

    /// Scorer that fails every request with `ModelUnavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelScorer {
            state: ModelState::Unavailable(reason.into()),
        }
    }

    /// Load through the loader, keeping the failure instead of aborting startup.
    pub fn from_loader(loader: &ModelLoader) -> Self {
        match loader.load() {
            Ok(artifact) => ModelScorer::new(artifact),
            Err(e) => {
                error!(
                    path = %loader.path().display(),
                    error = %e,
                    "Failed to load model artifact; scoring requests will fail"
                );
                ModelScorer::unavailable(e.to_string())
            }
        }
    }

    /// Input arity of the loaded model.
    pub fn expected_features(&self) -> Result<usize, ScoringError> {
        match &self.state {
            ModelState::Loaded(artifact) => Ok(artifact.n_features()),
            ModelState::Unavailable(reason) => {
                Err(ScoringError::ModelUnavailable(reason.clone()))
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ModelState::Loaded(_))
    }
}

impl Scorer for ModelScorer {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let artifact = match &self.state {
            ModelState::Loaded(artifact) => artifact,
            ModelState::Unavailable(reason) => {
                return Err(ScoringError::ModelUnavailable(reason.clone()))
            }
        };

        let expected = artifact.n_features();
        if features.len() != expected {
            return Err(ScoringError::FeatureShapeMismatch {
                expected,
                actual: features.len(),
            });
        }

        let probability = artifact.evaluate(features.as_slice());

        // Also rejects NaN.
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::InvalidScore(probability));
        }

        Ok(probability)
    }

    fn status(&self) -> ModelStatus {
        match &self.state {
            ModelState::Loaded(artifact) => ModelStatus {
                loaded: true,
                name: Some(artifact.name.clone()),
                version: Some(artifact.version.clone()),
                classifier: Some(artifact.classifier.kind().to_string()),
                feature_mode: Some(artifact.feature_mode),
                n_features: Some(artifact.n_features()),
                output: Some(artifact.classifier.output_kind()),
                error: None,
            },
            ModelState::Unavailable(reason) => ModelStatus::unavailable(reason.clone()),
        }
    }
}
