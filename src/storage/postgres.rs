// src/storage/postgres.rs
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::{AuditRecord, AuditStore};

/// PostgreSQL implementation of the AuditStore trait.
pub struct PostgresAuditStore {
    pool: PgPool,
}

impl PostgresAuditStore {
    /// Create a new PostgresAuditStore instance with a connection pool.
    pub async fn connect(
        database_url: &str,
        min_connections: u32,
        max_connections: u32,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(min_connections)
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn insert_prediction(&self, record: &AuditRecord) -> anyhow::Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO fraud_predictions (id, amount, probability, fraud, risk_level, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(record.id)
        .bind(record.amount)
        .bind(record.probability)
        .bind(record.fraud_flag)
        .bind(record.risk_tier.as_str())
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
