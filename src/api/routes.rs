use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ScoringError;
use crate::observability::TimingGuard;
use crate::scoring::ScoringPipeline;

use super::request::PredictRequest;
use super::response::{ErrorResponse, HealthResponse, PredictResponse, ReadyResponse};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "fraudscore";

/// Shared application state.
pub struct AppState {
    /// Scoring pipeline shared by all requests
    pub pipeline: Arc<ScoringPipeline>,

    /// Application start time
    pub start_time: Instant,

    /// Application version
    pub version: String,

    /// Latency budget in milliseconds
    pub latency_budget_ms: u64,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(handle_predict))
        .route("/v1/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .route("/metrics", get(handle_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle prediction requests.
async fn handle_predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let metrics = state.pipeline.metrics().clone();
    let _timing = TimingGuard::new(&metrics);

    let request = match payload {
        Ok(Json(req)) => req.into_transaction(),
        Err(rejection) => {
            let error = ScoringError::invalid_input("body", rejection.body_text());
            metrics.record_error(&error);
            warn!(error = %error, "Rejected malformed prediction request");

            let body = ErrorResponse::new(error.to_string(), error.code());
            return (rejection.status(), Json(body)).into_response();
        }
    };

    let result = state.pipeline.score_transaction(&request);

    let elapsed = start.elapsed();
    if elapsed.as_millis() > state.latency_budget_ms as u128 {
        warn!(
            amount = request.amount,
            hour = request.hour,
            latency_ms = elapsed.as_millis(),
            budget_ms = state.latency_budget_ms,
            "Prediction latency exceeded budget"
        );
    }

    match result {
        Ok(assessment) => {
            info!(
                amount = request.amount,
                hour = request.hour,
                probability = assessment.score.probability,
                risk_level = %assessment.score.risk_tier,
                fraud = assessment.score.fraud_flag,
                latency_ms = elapsed.as_millis(),
                "Prediction completed"
            );

            (StatusCode::OK, Json(PredictResponse::from(assessment))).into_response()
        }
        Err(error) => {
            if error.is_client_error() {
                info!(error = %error, "Prediction request rejected");
            } else {
                warn!(error = %error, code = error.code(), "Prediction failed");
            }

            error.into_response()
        }
    }
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: state.version.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        model_loaded: state.pipeline.model_status().loaded,
    })
}

/// Readiness check endpoint.
async fn handle_ready(State(state): State<Arc<AppState>>) -> Response {
    let status = state.pipeline.model_status();

    if !status.loaded {
        let reason = status
            .error
            .unwrap_or_else(|| "No model loaded".to_string());
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(reason, "NOT_READY")),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(ReadyResponse {
            ready: true,
            feature_mode: state.pipeline.feature_mode(),
            model: status,
        }),
    )
        .into_response()
}

/// Metrics endpoint (Prometheus format).
async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = format!(
        r#"# HELP fraudscore_uptime_seconds Application uptime in seconds
# TYPE fraudscore_uptime_seconds counter
fraudscore_uptime_seconds {}

# HELP fraudscore_model_loaded Whether a model is loaded
# TYPE fraudscore_model_loaded gauge
fraudscore_model_loaded {}

{}"#,
        state.start_time.elapsed().as_secs(),
        u8::from(state.pipeline.model_status().loaded),
        state.pipeline.metrics().to_prometheus(),
    );

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        metrics,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureMode;
    use crate::scoring::test_support::{sample_scorer, CollectingSink, FixedScorer};
    use crate::scoring::{FeatureDeriver, Scorer};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app_with(scorer: Arc<dyn Scorer>) -> Router {
        let pipeline = ScoringPipeline::new(FeatureDeriver::new(FeatureMode::Engineered), scorer);
        create_router(Arc::new(AppState {
            pipeline: Arc::new(pipeline),
            start_time: Instant::now(),
            version: "0.1.0-test".to_string(),
            latency_budget_ms: 50,
        }))
    }

    fn test_app() -> Router {
        app_with(Arc::new(sample_scorer()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_predict_endpoint() {
        let response = test_app()
            .oneshot(post_json("/predict", r#"{"amount": 200.0, "hour": 14}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["fraud"], false);
        assert_eq!(body["probability"], 0.0833);
        assert_eq!(body["risk_level"], "LOW");
        assert_eq!(body["reason_codes"][0], "no significant anomaly patterns");
    }

    #[tokio::test]
    async fn test_versioned_predict_alias() {
        let response = test_app()
            .oneshot(post_json("/v1/predict", r#"{"amount": 150000, "hour": 2}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["risk_level"], "MEDIUM");
        let reasons = body["reason_codes"].as_array().unwrap();
        assert!(reasons.contains(&serde_json::json!("high transaction amount")));
        assert!(reasons.contains(&serde_json::json!("unusual transaction timing")));
    }

    #[tokio::test]
    async fn test_invalid_hour_is_unprocessable() {
        let response = test_app()
            .oneshot(post_json("/predict", r#"{"amount": 10.0, "hour": 24}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["code"], "INVALID_INPUT");
        assert_eq!(body["field"], "hour");
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let response = test_app()
            .oneshot(post_json("/predict", r#"{"amount": "#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_missing_field_rejected() {
        let response = test_app()
            .oneshot(post_json("/predict", r#"{"amount": 10.0}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_model_unavailable_is_503() {
        let app = app_with(Arc::new(FixedScorer::failing(
            ScoringError::ModelUnavailable("artifact missing".to_string()),
        )));

        let response = app
            .oneshot(post_json("/predict", r#"{"amount": 10.0, "hour": 10}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["code"], "MODEL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_invalid_score_is_500() {
        let app = app_with(Arc::new(FixedScorer::failing(ScoringError::InvalidScore(
            1.5,
        ))));

        let response = app
            .oneshot(post_json("/predict", r#"{"amount": 10.0, "hour": 10}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_app().oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["model_loaded"], true);
    }

    #[tokio::test]
    async fn test_ready_endpoint() {
        let response = test_app().oneshot(get_request("/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ready"], true);
        assert_eq!(body["feature_mode"], "engineered");
        assert_eq!(body["model"]["name"], "fraud_random_forest");
        assert_eq!(body["model"]["n_features"], 7);
    }

    #[tokio::test]
    async fn test_not_ready_without_model() {
        let app = app_with(Arc::new(FixedScorer::failing(
            ScoringError::ModelUnavailable("artifact missing".to_string()),
        )));

        let response = app.oneshot(get_request("/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["code"], "NOT_READY");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let pipeline = Arc::new(
            ScoringPipeline::new(
                FeatureDeriver::new(FeatureMode::Engineered),
                Arc::new(sample_scorer()),
            )
            .with_audit_sink(Arc::new(CollectingSink::default())),
        );
        let state = Arc::new(AppState {
            pipeline: pipeline.clone(),
            start_time: Instant::now(),
            version: "0.1.0-test".to_string(),
            latency_budget_ms: 50,
        });

        create_router(state.clone())
            .oneshot(post_json("/predict", r#"{"amount": 400000, "hour": 23}"#))
            .await
            .unwrap();

        let response = create_router(state).oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("fraudscore_model_loaded 1"));
        assert!(text.contains("fraudscore_predictions{risk_level=\"HIGH\"} 1"));
        assert!(text.contains("fraudscore_fraud_flagged_total 1"));
    }
}
