use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::domain::FeatureMode;
use crate::observability::LogFormat;

/// Fraud scoring service configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "fraudscore")]
#[command(about = "Real-time transaction fraud scoring service")]
pub struct Config {
    /// HTTP server listen address
    #[arg(long, default_value = "0.0.0.0:8000", env = "FRAUDSCORE_LISTEN_ADDR")]
    pub listen_addr: String,

    /// Path to the model artifact (.json, or .yaml/.yml)
    #[arg(
        long,
        default_value = "artifacts/fraud_model.json",
        env = "FRAUDSCORE_MODEL_PATH"
    )]
    pub model_path: PathBuf,

    /// How auxiliary features are obtained; must match the artifact
    #[arg(
        long,
        value_enum,
        default_value_t = FeatureMode::Engineered,
        env = "FRAUDSCORE_FEATURE_MODE"
    )]
    pub feature_mode: FeatureMode,

    /// PostgreSQL URL for the prediction audit trail (optional, audit is disabled if not set)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Minimum pooled database connections
    #[arg(long, default_value = "1", env = "FRAUDSCORE_DB_MIN_CONNECTIONS")]
    pub db_min_connections: u32,

    /// Maximum pooled database connections
    #[arg(long, default_value = "5", env = "FRAUDSCORE_DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,

    /// Apply pending migrations at startup
    #[arg(long, default_value = "true", action = ArgAction::Set, env = "FRAUDSCORE_RUN_MIGRATIONS")]
    pub run_migrations: bool,

    /// Audit records buffered ahead of the database writer
    #[arg(long, default_value = "1024", env = "FRAUDSCORE_AUDIT_QUEUE_CAPACITY")]
    pub audit_queue_capacity: usize,

    /// Latency budget in milliseconds for the predict endpoint
    #[arg(long, default_value = "50", env = "FRAUDSCORE_LATENCY_BUDGET_MS")]
    pub latency_budget_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value_t = LogFormat::Text,
        env = "FRAUDSCORE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Enable graceful shutdown
    #[arg(long, default_value = "true", action = ArgAction::Set, env = "FRAUDSCORE_GRACEFUL_SHUTDOWN")]
    pub graceful_shutdown: bool,

    /// Graceful shutdown timeout in seconds
    #[arg(long, default_value = "10", env = "FRAUDSCORE_SHUTDOWN_TIMEOUT_SECS")]
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Get shutdown timeout as Duration.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Get latency budget as Duration.
    pub fn latency_budget(&self) -> Duration {
        Duration::from_millis(self.latency_budget_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: "0.0.0.0:8000".to_string(),
            model_path: PathBuf::from("artifacts/fraud_model.json"),
            feature_mode: FeatureMode::Engineered,
            database_url: None,
            db_min_connections: 1,
            db_max_connections: 5,
            run_migrations: true,
            audit_queue_capacity: 1024,
            latency_budget_ms: 50,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            graceful_shutdown: true,
            shutdown_timeout_secs: 10,
        }
    }
}
