use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::domain::{Assessment, RiskTier};
use crate::error::ScoringError;

/// Metrics registry for the application.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Total successful predictions
    pub predictions_total: AtomicU64,

    /// Predictions by risk tier
    pub predictions_low: AtomicU64,
    pub predictions_medium: AtomicU64,
    pub predictions_high: AtomicU64,

    /// Predictions with the fraud flag set
    pub fraud_flagged_total: AtomicU64,

    /// Scoring latency buckets (microseconds)
    pub latency_under_1ms: AtomicU64,
    pub latency_1_5ms: AtomicU64,
    pub latency_5_10ms: AtomicU64,
    pub latency_10_50ms: AtomicU64,
    pub latency_50_100ms: AtomicU64,
    pub latency_over_100ms: AtomicU64,

    /// Failed requests by error kind
    pub errors_invalid_input: AtomicU64,
    pub errors_model_unavailable: AtomicU64,
    pub errors_shape_mismatch: AtomicU64,
    pub errors_invalid_score: AtomicU64,

    /// Audit operations
    pub audit_writes_total: AtomicU64,
    pub audit_write_errors: AtomicU64,
    pub audit_dropped_total: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Record a successful assessment.
    pub fn record_assessment(&self, assessment: &Assessment) {
        self.predictions_total.fetch_add(1, Ordering::Relaxed);

        match assessment.score.risk_tier {
            RiskTier::Low => {
                self.predictions_low.fetch_add(1, Ordering::Relaxed);
            }
            RiskTier::Medium => {
                self.predictions_medium.fetch_add(1, Ordering::Relaxed);
            }
            RiskTier::High => {
                self.predictions_high.fetch_add(1, Ordering::Relaxed);
            }
        }

        if assessment.score.fraud_flag {
            self.fraud_flagged_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a failed request.
    pub fn record_error(&self, error: &ScoringError) {
        let counter = match error {
            ScoringError::InvalidInput { .. } => &self.errors_invalid_input,
            ScoringError::ModelUnavailable(_) => &self.errors_model_unavailable,
            ScoringError::FeatureShapeMismatch { .. } => &self.errors_shape_mismatch,
            ScoringError::InvalidScore(_) => &self.errors_invalid_score,
            ScoringError::PersistenceFailure(_) => &self.audit_write_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record scoring latency.
    pub fn record_latency(&self, start: Instant) {
        let micros = start.elapsed().as_micros() as u64;

        if micros < 1000 {
            self.latency_under_1ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 5000 {
            self.latency_1_5ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 10000 {
            self.latency_5_10ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 50000 {
            self.latency_10_50ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 100000 {
            self.latency_50_100ms.fetch_add(1, Ordering::Relaxed);
        } else {
            self.latency_over_100ms.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record an audit write attempt.
    pub fn record_audit_write(&self, success: bool) {
        self.audit_writes_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.audit_write_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record an audit record dropped before reaching the store.
    pub fn record_audit_dropped(&self) {
        self.audit_dropped_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        format!(
            r#"# HELP fraudscore_predictions_total Total number of successful predictions
# TYPE fraudscore_predictions_total counter
fraudscore_predictions_total {}

# HELP fraudscore_predictions Predictions by risk tier
# TYPE fraudscore_predictions counter
fraudscore_predictions{{risk_level="LOW"}} {}
fraudscore_predictions{{risk_level="MEDIUM"}} {}
fraudscore_predictions{{risk_level="HIGH"}} {}

# HELP fraudscore_fraud_flagged_total Predictions flagged as fraud
# TYPE fraudscore_fraud_flagged_total counter
fraudscore_fraud_flagged_total {}

# HELP fraudscore_scoring_latency_bucket Scoring latency histogram
# TYPE fraudscore_scoring_latency_bucket counter
fraudscore_scoring_latency_bucket{{le="0.001"}} {}
fraudscore_scoring_latency_bucket{{le="0.005"}} {}
fraudscore_scoring_latency_bucket{{le="0.01"}} {}
fraudscore_scoring_latency_bucket{{le="0.05"}} {}
fraudscore_scoring_latency_bucket{{le="0.1"}} {}
fraudscore_scoring_latency_bucket{{le="+Inf"}} {}

# HELP fraudscore_errors_total Failed scoring requests by kind
# TYPE fraudscore_errors_total counter
fraudscore_errors_total{{kind="invalid_input"}} {}
fraudscore_errors_total{{kind="model_unavailable"}} {}
fraudscore_errors_total{{kind="feature_shape_mismatch"}} {}
fraudscore_errors_total{{kind="invalid_score"}} {}

# HELP fraudscore_audit_writes_total Total audit write operations
# TYPE fraudscore_audit_writes_total counter
fraudscore_audit_writes_total {}

# HELP fraudscore_audit_write_errors_total Audit write errors
# TYPE fraudscore_audit_write_errors_total counter
fraudscore_audit_write_errors_total {}

# HELP fraudscore_audit_dropped_total Audit records dropped before reaching the store
# TYPE fraudscore_audit_dropped_total counter
fraudscore_audit_dropped_total {}
"#,
            self.predictions_total.load(Ordering::Relaxed),
            self.predictions_low.load(Ordering::Relaxed),
            self.predictions_medium.load(Ordering::Relaxed),
            self.predictions_high.load(Ordering::Relaxed),
            self.fraud_flagged_total.load(Ordering::Relaxed),
            self.latency_under_1ms.load(Ordering::Relaxed),
            self.latency_1_5ms.load(Ordering::Relaxed),
            self.latency_5_10ms.load(Ordering::Relaxed),
            self.latency_10_50ms.load(Ordering::Relaxed),
            self.latency_50_100ms.load(Ordering::Relaxed),
            self.latency_over_100ms.load(Ordering::Relaxed),
            self.errors_invalid_input.load(Ordering::Relaxed),
            self.errors_model_unavailable.load(Ordering::Relaxed),
            self.errors_shape_mismatch.load(Ordering::Relaxed),
            self.errors_invalid_score.load(Ordering::Relaxed),
            self.audit_writes_total.load(Ordering::Relaxed),
            self.audit_write_errors.load(Ordering::Relaxed),
            self.audit_dropped_total.load(Ordering::Relaxed),
        )
    }
}

/// Guard for timing operations.
pub struct TimingGuard<'a> {
    registry: &'a MetricsRegistry,
    start: Instant,
}

impl<'a> TimingGuard<'a> {
    pub fn new(registry: &'a MetricsRegistry) -> Self {
        TimingGuard {
            registry,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for TimingGuard<'a> {
    fn drop(&mut self) {
        self.registry.record_latency(self.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, ScoreResult};

    fn assessment(probability: f64) -> Assessment {
        let score = ScoreResult::from_probability(probability);
        Assessment {
            decision: Decision::for_tier(score.risk_tier),
            score,
        }
    }

    #[test]
    fn test_record_assessment() {
        let metrics = MetricsRegistry::new();

        metrics.record_assessment(&assessment(0.1));
        metrics.record_assessment(&assessment(0.55));
        metrics.record_assessment(&assessment(0.9));

        assert_eq!(metrics.predictions_total.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.predictions_low.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.predictions_medium.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.predictions_high.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.fraud_flagged_total.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_record_error() {
        let metrics = MetricsRegistry::new();

        metrics.record_error(&ScoringError::invalid_input("hour", "out of range"));
        metrics.record_error(&ScoringError::ModelUnavailable("missing".to_string()));

        assert_eq!(metrics.errors_invalid_input.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.errors_model_unavailable.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.predictions_total.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_timing_guard_records_latency() {
        let metrics = MetricsRegistry::new();

        {
            let _guard = TimingGuard::new(&metrics);
        }

        assert!(metrics.latency_under_1ms.load(Ordering::Relaxed) >= 1);
    }

    #[test]
    fn test_prometheus_format() {
        let metrics = MetricsRegistry::new();
        metrics.record_assessment(&assessment(0.8));
        metrics.record_audit_write(false);

        let output = metrics.to_prometheus();

        assert!(output.contains("fraudscore_predictions_total 1"));
        assert!(output.contains("fraudscore_predictions{risk_level=\"HIGH\"} 1"));
        assert!(output.contains("fraudscore_audit_write_errors_total 1"));
    }
}
