// src/storage/sink.rs
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ScoringError;
use crate::observability::MetricsRegistry;

use super::traits::{AuditRecord, AuditStore};

/// Write-only destination for audit records.
///
/// `append` never blocks and never fails the caller; persistence problems are
/// logged and counted by the implementation.
pub trait AuditSink: Send + Sync + fmt::Debug {
    fn append(&self, record: AuditRecord);
}

/// Sink used when no audit store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn append(&self, _record: AuditRecord) {}
}

/// Sink that hands records to a background writer over a bounded queue.
///
/// A full queue drops the record. The writer stops once every sender has
/// been dropped and the queue is drained.
pub struct BackgroundAuditSink {
    tx: mpsc::Sender<AuditRecord>,
    metrics: Arc<MetricsRegistry>,
}

impl BackgroundAuditSink {
    /// Start the writer task. Returns the sink and the writer's handle.
    pub fn spawn(
        store: Arc<dyn AuditStore>,
        capacity: usize,
        metrics: Arc<MetricsRegistry>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<AuditRecord>(capacity.max(1));
        let writer_metrics = metrics.clone();

        let handle = tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                match store.insert_prediction(&record).await {
                    Ok(id) => {
                        writer_metrics.record_audit_write(true);
                        debug!(record_id = %id, "Audit record persisted");
                    }
                    Err(e) => {
                        writer_metrics.record_audit_write(false);
                        let error = ScoringError::PersistenceFailure(e.to_string());
                        warn!(record_id = %record.id, error = %error, "Failed to persist audit record");
                    }
                }
            }

            debug!("Audit writer stopped");
        });

        (BackgroundAuditSink { tx, metrics }, handle)
    }
}

impl fmt::Debug for BackgroundAuditSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundAuditSink")
            .field("capacity", &self.tx.max_capacity())
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl AuditSink for BackgroundAuditSink {
    fn append(&self, record: AuditRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                self.metrics.record_audit_dropped();
                warn!(record_id = %record.id, "Audit queue full, dropping record");
            }
            Err(TrySendError::Closed(record)) => {
                self.metrics.record_audit_dropped();
                warn!(record_id = %record.id, "Audit writer stopped, dropping record");
            }
        }
    }
}
