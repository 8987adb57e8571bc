use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use fraudscore::api::routes::{create_router, AppState};
use fraudscore::config::Config;
use fraudscore::model::ModelLoader;
use fraudscore::observability::{init_tracing, MetricsRegistry};
use fraudscore::scoring::{FeatureDeriver, ModelScorer, ScoringPipeline};
use fraudscore::storage::{AuditSink, BackgroundAuditSink, NoopAuditSink, PostgresAuditStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        feature_mode = %config.feature_mode,
        "Starting fraudscore service"
    );

    // Load the model once; a failure leaves the service up but not ready
    let loader = ModelLoader::new(config.model_path.clone(), config.feature_mode);
    let scorer = ModelScorer::from_loader(&loader);

    let metrics = Arc::new(MetricsRegistry::new());
    let (audit, audit_writer) = start_audit(&config, metrics.clone()).await;

    let pipeline = ScoringPipeline::new(FeatureDeriver::new(config.feature_mode), Arc::new(scorer))
        .with_audit_sink(audit)
        .with_metrics(metrics);

    // Create application state
    let state = Arc::new(AppState {
        pipeline: Arc::new(pipeline),
        start_time: Instant::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        latency_budget_ms: config.latency_budget_ms,
    });

    // Create router
    let app = create_router(state);

    // Parse listen address
    let addr: SocketAddr = config.listen_addr.parse()?;

    info!(
        addr = %addr,
        latency_budget_ms = config.latency_budget().as_millis(),
        "Starting HTTP server"
    );

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown. The router, and with it the last
    // audit queue sender, is dropped when `serve` returns.
    if config.graceful_shutdown {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }

    // Cleanup
    info!("Shutting down...");

    if let Some(writer) = audit_writer {
        match tokio::time::timeout(config.shutdown_timeout(), writer).await {
            Ok(Ok(())) => info!("Audit queue drained"),
            Ok(Err(e)) => error!(error = %e, "Audit writer task failed"),
            Err(_) => warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Audit queue not drained before shutdown timeout"
            ),
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Connect the audit trail, falling back to a no-op sink.
async fn start_audit(
    config: &Config,
    metrics: Arc<MetricsRegistry>,
) -> (Arc<dyn AuditSink>, Option<JoinHandle<()>>) {
    let Some(url) = config.database_url.as_deref() else {
        info!("Audit trail disabled (no database configured)");
        return (Arc::new(NoopAuditSink), None);
    };

    let store = match PostgresAuditStore::connect(
        url,
        config.db_min_connections,
        config.db_max_connections,
    )
    .await
    {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to connect to audit database, continuing without audit trail");
            return (Arc::new(NoopAuditSink), None);
        }
    };

    if config.run_migrations {
        if let Err(e) = store.run_migrations().await {
            error!(error = %e, "Failed to run audit migrations, continuing without audit trail");
            return (Arc::new(NoopAuditSink), None);
        }
    }

    let (sink, writer) =
        BackgroundAuditSink::spawn(Arc::new(store), config.audit_queue_capacity, metrics);
    info!(
        capacity = config.audit_queue_capacity,
        "Audit trail enabled"
    );

    (Arc::new(sink), Some(writer))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
