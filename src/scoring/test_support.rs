//! Test doubles shared by unit tests.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{FeatureMode, FeatureVector};
use crate::error::ScoringError;
use crate::model::ModelLoader;
use crate::storage::{AuditRecord, AuditSink};

use super::scorer::{ModelScorer, ModelStatus, Scorer};

/// Scorer returning a fixed outcome and counting calls.
#[derive(Debug)]
pub struct FixedScorer {
    outcome: Result<f64, ScoringError>,
    calls: AtomicUsize,
}

impl FixedScorer {
    pub fn new(probability: f64) -> Self {
        FixedScorer {
            outcome: Ok(probability),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ScoringError) -> Self {
        FixedScorer {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Scorer for FixedScorer {
    fn score(&self, _features: &FeatureVector) -> Result<f64, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn status(&self) -> ModelStatus {
        match &self.outcome {
            Ok(_) => ModelStatus {
                loaded: true,
                name: Some("fixed".to_string()),
                version: Some("test".to_string()),
                classifier: None,
                feature_mode: None,
                n_features: None,
                output: None,
                error: None,
            },
            Err(e) => ModelStatus::unavailable(e.to_string()),
        }
    }
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl CollectingSink {
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }
}

impl AuditSink for CollectingSink {
    fn append(&self, record: AuditRecord) {
        self.records.lock().push(record);
    }
}

/// Scorer over the artifact shipped in `artifacts/`.
pub fn sample_scorer() -> ModelScorer {
    let loader = ModelLoader::new(
        concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts/fraud_model.json"),
        FeatureMode::Engineered,
    );
    let scorer = ModelScorer::from_loader(&loader);
    assert!(scorer.is_loaded(), "sample artifact failed to load");
    scorer
}
