use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::{Assessment, FeatureMode, RiskTier};
use crate::error::ScoringError;
use crate::scoring::ModelStatus;

/// Response to a prediction request.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub fraud: bool,

    /// Rounded to 4 decimal places
    pub probability: f64,

    pub risk_level: RiskTier,

    pub action: String,

    pub reason_codes: Vec<String>,
}

impl From<Assessment> for PredictResponse {
    fn from(assessment: Assessment) -> Self {
        PredictResponse {
            fraud: assessment.score.fraud_flag,
            probability: assessment.score.probability,
            risk_level: assessment.score.risk_tier,
            action: assessment.decision.action_label,
            reason_codes: assessment.decision.reason_codes,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
    pub model_loaded: bool,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub feature_mode: FeatureMode,
    pub model: ModelStatus,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            code: code.into(),
            field: None,
        }
    }
}

impl From<&ScoringError> for ErrorResponse {
    fn from(error: &ScoringError) -> Self {
        ErrorResponse {
            error: error.to_string(),
            code: error.code().to_string(),
            field: error.field().map(str::to_string),
        }
    }
}

/// HTTP status for a scoring error.
pub fn status_for(error: &ScoringError) -> StatusCode {
    match error {
        ScoringError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ScoringError::FeatureShapeMismatch { .. }
        | ScoringError::InvalidScore(_)
        | ScoringError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ScoringError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, ScoreResult};

    #[test]
    fn test_predict_response_serialization() {
        let score = ScoreResult::from_probability(0.7333333);
        let mut decision = Decision::for_tier(score.risk_tier);
        decision.push_reason("unusual transaction timing");

        let resp = PredictResponse::from(Assessment { score, decision });
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["fraud"], true);
        assert_eq!(json["probability"], 0.7333);
        assert_eq!(json["risk_level"], "HIGH");
        assert_eq!(json["action"], resp.action);
        assert_eq!(json["reason_codes"][1], "unusual transaction timing");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            status_for(&ScoringError::invalid_input("hour", "out of range")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&ScoringError::ModelUnavailable("missing".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&ScoringError::FeatureShapeMismatch {
                expected: 7,
                actual: 6
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ScoringError::InvalidScore(f64::NAN)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_names_field() {
        let body = ErrorResponse::from(&ScoringError::invalid_input("amount", "negative"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["field"], "amount");

        let body = ErrorResponse::new("No model loaded", "NOT_READY");
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("field"));
    }
}
