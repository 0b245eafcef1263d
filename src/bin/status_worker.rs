//! Runs the task status reclassification jobs against `PostgreSQL`.
//!
//! Usage:
//!
//! ```text
//! status_worker
//! ```
//!
//! Configuration is read from the environment (and a `.env` file when
//! present); see [`dundertasks::config::AppConfig`]. The worker runs both
//! jobs every `STATUS_JOB_INTERVAL_SECS` seconds and exits on Ctrl-C.

use dundertasks::config::AppConfig;
use dundertasks::persistence::build_pool;
use dundertasks::status_job::{StatusReclassifier, StatusScheduler};
use dundertasks::task::adapters::postgres::PostgresTaskRepository;
use dundertasks::telemetry::init_tracing;
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::sync::watch;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // A missing .env file is expected outside development.
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level)?;

    let pool = build_pool(&config.database_url, config.database_pool_size)?;
    let repository = Arc::new(PostgresTaskRepository::new(pool));
    let reclassifier = StatusReclassifier::new(repository, Arc::new(DefaultClock));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = StatusScheduler::new(reclassifier, config.status_job_interval, shutdown_rx);
    let worker = tokio::spawn(scheduler.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal");
    shutdown_tx.send(true)?;
    let ticks = worker.await?;
    tracing::info!(ticks, "status worker stopped");
    Ok(())
}
