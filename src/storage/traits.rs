// src/storage/traits.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{RiskTier, ScoreResult};

/// Snapshot of one scoring outcome for the audit log. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub amount: f64,
    /// Reported (rounded) probability
    pub probability: f64,
    pub fraud_flag: bool,
    pub risk_tier: RiskTier,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Create a record stamped with a fresh id and the current time.
    pub fn new(amount: f64, score: &ScoreResult) -> Self {
        AuditRecord {
            id: Uuid::new_v4(),
            amount,
            probability: score.probability,
            fraud_flag: score.fraud_flag,
            risk_tier: score.risk_tier,
            created_at: Utc::now(),
        }
    }
}

/// Durable, append-only store of audit records.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn insert_prediction(&self, record: &AuditRecord) -> anyhow::Result<Uuid>;
}
