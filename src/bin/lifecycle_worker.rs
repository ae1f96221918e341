//! Runs the project lifecycle reconciliation job on a fixed interval.
//!
//! Usage:
//!
//! ```text
//! DATABASE_URL=postgres://... lifecycle_worker
//! ```
//!
//! Configuration is read from the environment (a `.env` file is honoured);
//! see [`tessellate::config::WorkerConfig`] for the recognised variables.
//! Log filtering follows `RUST_LOG` and defaults to `tessellate=info`.
//! The worker stops after the in-flight run completes when it receives
//! Ctrl-C.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::sync::Arc;
use tessellate::config::{ConfigError, WorkerConfig};
use tessellate::project::{
    adapters::postgres::PostgresProjectStorage,
    services::{LifecycleStatusEngine, ReconciliationScheduler},
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the worker before the scheduler starts.
#[derive(Debug, Error)]
enum WorkerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build database pool: {0}")]
    Pool(#[source] diesel::r2d2::PoolError),
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessellate=info,lifecycle_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    run().await.map_err(Into::into)
}

async fn run() -> Result<(), WorkerError> {
    let config = WorkerConfig::from_env()?;
    tracing::info!(
        reconcile_interval_secs = config.reconcile_interval.as_secs(),
        pool_size = config.pool_size,
        "loaded worker configuration"
    );

    let pool = Pool::builder()
        .max_size(config.pool_size)
        .build(ConnectionManager::<PgConnection>::new(&config.database_url))
        .map_err(WorkerError::Pool)?;
    tracing::info!("database connection pool created");

    let storage = Arc::new(PostgresProjectStorage::new(pool));
    let engine = LifecycleStatusEngine::new(
        Arc::clone(&storage),
        Arc::clone(&storage),
        storage,
        Arc::new(DefaultClock),
        config.expiration_policy,
    );
    let scheduler = ReconciliationScheduler::new(engine, config.reconcile_interval);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown signal received");
                shutdown.cancel();
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
        }
    });

    scheduler.run(cancel).await;
    Ok(())
}
