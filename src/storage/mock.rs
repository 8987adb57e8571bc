// src/storage/mock.rs
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use super::traits::{AuditRecord, AuditStore};

/// Mock audit store for testing.
#[derive(Debug, Default)]
pub struct MockAuditStore {
    records: Mutex<Vec<AuditRecord>>,
    fail_writes: AtomicBool,
}

impl MockAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every write fails (for testing).
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    /// Toggle write failures (for testing).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Get recorded predictions (for assertions).
    pub fn get_records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl AuditStore for MockAuditStore {
    async fn insert_prediction(&self, record: &AuditRecord) -> anyhow::Result<Uuid> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("audit store unreachable");
        }

        self.records.lock().push(record.clone());
        Ok(record.id)
    }
}
