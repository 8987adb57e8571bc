use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::FeatureMode;

use super::artifact::{
    Classifier, DecisionTree, ModelArtifact, OutputKind, TreeNode, ARTIFACT_FORMAT_VERSION,
};

/// Errors that can occur while loading a model artifact.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Incompatible artifact: {0}")]
    Incompatible(String),
}

/// Read and validate an artifact. `.yaml`/`.yml` files are parsed as YAML,
/// anything else as JSON.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<ModelArtifact, ModelError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );

    let artifact: ModelArtifact = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    validate_artifact(&artifact)?;

    Ok(artifact)
}

/// Structural checks so evaluation never indexes out of bounds or loops.
pub fn validate_artifact(artifact: &ModelArtifact) -> Result<(), ModelError> {
    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ModelError::Validation(format!(
            "Unsupported format version {} (expected {})",
            artifact.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }

    if artifact.name.is_empty() || artifact.version.is_empty() {
        return Err(ModelError::Validation(
            "Model name and version cannot be empty".to_string(),
        ));
    }

    if artifact.feature_names.is_empty() {
        return Err(ModelError::Validation(
            "Artifact declares no features".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in &artifact.feature_names {
        if !seen.insert(name) {
            return Err(ModelError::Validation(format!(
                "Duplicate feature name: {}",
                name
            )));
        }
    }

    let n_features = artifact.n_features();

    match &artifact.classifier {
        Classifier::RandomForest { trees } => {
            if trees.is_empty() {
                return Err(ModelError::Validation("Forest has no trees".to_string()));
            }
            for (i, tree) in trees.iter().enumerate() {
                validate_tree(tree, n_features)
                    .map_err(|msg| ModelError::Validation(format!("Tree {}: {}", i, msg)))?;
            }
        }
        Classifier::LogisticRegression {
            coefficients,
            intercept,
        }
        | Classifier::LinearSvm {
            coefficients,
            intercept,
        } => {
            if coefficients.len() != n_features {
                return Err(ModelError::Validation(format!(
                    "Classifier has {} coefficients but {} features are declared",
                    coefficients.len(),
                    n_features
                )));
            }
            if !intercept.is_finite() || coefficients.iter().any(|w| !w.is_finite()) {
                return Err(ModelError::Validation(
                    "Linear parameters must be finite".to_string(),
                ));
            }
        }
    }

    Ok(())
}

fn validate_tree(tree: &DecisionTree, n_features: usize) -> Result<(), String> {
    if tree.nodes.is_empty() {
        return Err("no nodes".to_string());
    }

    let len = tree.nodes.len();
    for (index, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(format!(
                        "node {} splits on feature {} of {}",
                        index, feature, n_features
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {} has a non-finite threshold", index));
                }
                // Children must point forward, which rules out cycles.
                for child in [*left, *right] {
                    if child <= index || child >= len {
                        return Err(format!("node {} has invalid child {}", index, child));
                    }
                }
            }
            TreeNode::Leaf { value } => {
                let [legit, fraud] = *value;
                if !legit.is_finite() || !fraud.is_finite() || legit < 0.0 || fraud < 0.0 {
                    return Err(format!("leaf {} has invalid weights", index));
                }
                if legit + fraud <= 0.0 {
                    return Err(format!("leaf {} has zero total weight", index));
                }
            }
        }
    }

    Ok(())
}

/// Check that the artifact was trained on the features this process derives.
pub fn ensure_compatible(artifact: &ModelArtifact, mode: FeatureMode) -> Result<(), ModelError> {
    if artifact.feature_mode != mode {
        return Err(ModelError::Incompatible(format!(
            "model '{}' was trained in {} mode but the service derives {} features",
            artifact.name, artifact.feature_mode, mode
        )));
    }

    let expected = mode.feature_names();
    let matches = artifact.feature_names.len() == expected.len()
        && artifact
            .feature_names
            .iter()
            .zip(expected.iter())
            .all(|(a, b)| a == b);

    if !matches {
        return Err(ModelError::Incompatible(format!(
            "feature order {:?} does not match {} order {:?}",
            artifact.feature_names, mode, expected
        )));
    }

    Ok(())
}

/// Loads the artifact from its fixed path for a given feature mode.
pub struct ModelLoader {
    path: PathBuf,
    mode: FeatureMode,
}

impl ModelLoader {
    /// Create a new model loader.
    pub fn new(path: impl Into<PathBuf>, mode: FeatureMode) -> Self {
        ModelLoader {
            path: path.into(),
            mode,
        }
    }

    /// Load, validate and check compatibility with the configured mode.
    pub fn load(&self) -> Result<ModelArtifact, ModelError> {
        let artifact = load_artifact(&self.path)?;
        ensure_compatible(&artifact, self.mode)?;

        info!(
            path = %self.path.display(),
            model = %artifact.name,
            version = %artifact.version,
            classifier = artifact.classifier.kind(),
            n_features = artifact.n_features(),
            feature_mode = %artifact.feature_mode,
            "Model artifact loaded"
        );

        if artifact.classifier.output_kind() == OutputKind::HardLabel {
            warn!(
                model = %artifact.name,
                classifier = artifact.classifier.kind(),
                "Classifier has no probability estimate; scores degrade to hard labels (0.0 or 1.0)"
            );
        }

        Ok(artifact)
    }

    /// Get the artifact path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> FeatureMode {
        self.mode
    }
}
