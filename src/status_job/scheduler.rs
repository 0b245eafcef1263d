//! Fixed-interval driver for the reclassification jobs.

use super::reclassifier::{StatusJobKind, StatusReclassifier};
use crate::outcome::{FailureCode, Outcome};
use crate::task::ports::TaskRepository;
use mockable::Clock;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Runs both reclassification jobs on every tick until shut down.
pub struct StatusScheduler<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    reclassifier: StatusReclassifier<R, C>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl<R, C> StatusScheduler<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler; sending `true` on the channel stops it.
    #[must_use]
    pub const fn new(
        reclassifier: StatusReclassifier<R, C>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            reclassifier,
            interval,
            shutdown_rx,
        }
    }

    /// Runs until shutdown and returns the number of completed ticks.
    ///
    /// The first tick fires immediately. Dropping the sender also stops the
    /// loop.
    pub async fn run(mut self) -> u64 {
        info!(
            interval_ms = %self.interval.as_millis(),
            "starting status reclassification scheduler"
        );
        let mut timer = tokio::time::interval(self.interval.max(MIN_INTERVAL));
        let mut ticks = 0_u64;

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    debug!(tick = ticks, "running status reclassification");
                    let report = self.reclassifier.run_all().await;
                    log_outcome(StatusJobKind::MarkLate, &report.late);
                    log_outcome(StatusJobKind::MarkDone, &report.done);
                    ticks += 1;
                }

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!(ticks, "status reclassification scheduler shutting down");
                        break;
                    }
                }
            }
        }
        ticks
    }
}

fn log_outcome(kind: StatusJobKind, outcome: &Outcome<u64>) {
    match outcome {
        Ok(updated) => info!(job = %kind, updated, "reclassified tasks"),
        Err(failure) if failure.code() == FailureCode::NotFound => {
            debug!(job = %kind, message = failure.message(), "nothing to reclassify");
        }
        Err(failure) => {
            error!(job = %kind, code = %failure.code(), message = failure.message(), "reclassification failed");
        }
    }
}
