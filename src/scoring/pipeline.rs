use std::sync::Arc;
use tracing::debug;

use crate::domain::{Assessment, FeatureMode, ScoreResult, TransactionRequest};
use crate::error::ScoringError;
use crate::observability::MetricsRegistry;
use crate::storage::{AuditRecord, AuditSink, NoopAuditSink};

use super::decision::decide_for;
use super::features::FeatureDeriver;
use super::scorer::{ModelStatus, Scorer};

/// Request -> assessment orchestration.
///
/// Holds only immutable, shared collaborators, so one instance serves all
/// concurrent requests.
#[derive(Debug)]
pub struct ScoringPipeline {
    deriver: FeatureDeriver,
    scorer: Arc<dyn Scorer>,
    audit: Arc<dyn AuditSink>,
    metrics: Arc<MetricsRegistry>,
}

impl ScoringPipeline {
    /// Pipeline with a no-op audit sink and its own metrics registry.
    pub fn new(deriver: FeatureDeriver, scorer: Arc<dyn Scorer>) -> Self {
        ScoringPipeline {
            deriver,
            scorer,
            audit: Arc::new(NoopAuditSink),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Score one transaction.
    ///
    /// Validation failures return before the scorer is touched. Model errors
    /// abort with no partial result. The audit record is handed off without
    /// waiting, and its persistence cannot affect the returned value.
    pub fn score_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Assessment, ScoringError> {
        let result = self.evaluate(request);

        match &result {
            Ok(assessment) => self.metrics.record_assessment(assessment),
            Err(error) => self.metrics.record_error(error),
        }

        result
    }

    fn evaluate(&self, request: &TransactionRequest) -> Result<Assessment, ScoringError> {
        request.validate()?;

        let features = self.deriver.derive(request);

        // Engineered products of a huge but finite amount can overflow.
        if let Some(index) = features.first_non_finite() {
            return Err(ScoringError::invalid_input(
                "amount",
                format!(
                    "too large to derive a finite `{}` feature",
                    self.deriver.feature_names()[index]
                ),
            ));
        }

        let probability = self.scorer.score(&features)?;

        // Thresholds see the unrounded value; only the report is rounded.
        let score = ScoreResult::from_probability(probability);
        let decision = decide_for(probability, request);

        self.audit.append(AuditRecord::new(request.amount, &score));

        debug!(
            amount = request.amount,
            hour = request.hour,
            probability,
            risk_level = %score.risk_tier,
            fraud = score.fraud_flag,
            "Transaction scored"
        );

        Ok(Assessment { score, decision })
    }

    pub fn model_status(&self) -> ModelStatus {
        self.scorer.status()
    }

    pub fn feature_mode(&self) -> FeatureMode {
        self.deriver.mode()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }
}
