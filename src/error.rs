use thiserror::Error;

/// Errors produced while scoring a transaction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Caller-correctable input problem, naming the offending field.
    #[error("invalid `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The model artifact is absent, failed to load or is incompatible.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The derived vector does not match the model's input arity.
    #[error("feature shape mismatch: model expects {expected} features, got {actual}")]
    FeatureShapeMismatch { expected: usize, actual: usize },

    /// The classifier returned something that is not a probability.
    #[error("model produced an invalid score: {0}")]
    InvalidScore(f64),

    /// The audit store could not persist a record. Logged, never returned to callers.
    #[error("audit persistence failed: {0}")]
    PersistenceFailure(String),
}

impl ScoringError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ScoringError::InvalidInput { .. } => "INVALID_INPUT",
            ScoringError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            ScoringError::FeatureShapeMismatch { .. } => "FEATURE_SHAPE_MISMATCH",
            ScoringError::InvalidScore(_) => "INVALID_SCORE",
            ScoringError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// Returns true if the caller can fix the request and retry.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScoringError::InvalidInput { .. })
    }

    /// Name of the offending field, for input errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ScoringError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}
