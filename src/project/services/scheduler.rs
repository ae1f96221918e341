//! Fixed-interval driver for the lifecycle status engine.

use super::{
    engine::{LifecycleEngineResult, LifecycleStatusEngine},
    report::ReconciliationReport,
};
use crate::project::ports::{LifecycleStore, ProjectStore, UnitOfWork};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Outcome of a single guarded run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The engine ran to completion and committed.
    Completed(ReconciliationReport),
    /// Another run was still in progress, so this tick did nothing.
    SkippedOverlap,
}

/// Invokes the engine on a fixed interval until cancelled.
///
/// Runs never overlap within one process: a tick that fires while the
/// previous run is still going is skipped. Exclusion across processes is
/// left to the host.
pub struct ReconciliationScheduler<P, L, U, C>
where
    P: ProjectStore,
    L: LifecycleStore,
    U: UnitOfWork,
    C: Clock + Send + Sync,
{
    engine: LifecycleStatusEngine<P, L, U, C>,
    interval: Duration,
    running: Arc<Mutex<()>>,
}

impl<P, L, U, C> Clone for ReconciliationScheduler<P, L, U, C>
where
    P: ProjectStore,
    L: LifecycleStore,
    U: UnitOfWork,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            interval: self.interval,
            running: Arc::clone(&self.running),
        }
    }
}

impl<P, L, U, C> ReconciliationScheduler<P, L, U, C>
where
    P: ProjectStore,
    L: LifecycleStore,
    U: UnitOfWork,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler ticking every `interval`.
    #[must_use]
    pub fn new(engine: LifecycleStatusEngine<P, L, U, C>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            running: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the tick interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs the engine once unless a run is already in progress.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the run fails.
    pub async fn run_once(&self) -> LifecycleEngineResult<RunOutcome> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::debug!("previous lifecycle reconciliation still running, skipping tick");
            return Ok(RunOutcome::SkippedOverlap);
        };
        self.engine.run().await.map(RunOutcome::Completed)
    }

    /// Ticks until `cancel` fires, running the engine on each tick.
    ///
    /// The first tick fires immediately. A failed run is logged and retried
    /// on the next tick.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_work_deadline_expiration_days =
                self.engine.policy().max_work_deadline_expiration_days(),
            "lifecycle reconciliation scheduler started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("lifecycle reconciliation scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.run_once().await {
                        Ok(RunOutcome::Completed(report)) => log_report(&report),
                        Ok(RunOutcome::SkippedOverlap) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "lifecycle reconciliation run failed");
                        }
                    }
                }
            }
        }
    }
}

fn log_report(report: &ReconciliationReport) {
    if report.changed_count() == 0 && report.skipped_count() == 0 {
        tracing::debug!("lifecycle reconciliation found nothing to change");
        return;
    }
    tracing::info!(
        changed = report.changed_count(),
        skipped = report.skipped_count(),
        "lifecycle reconciliation applied changes"
    );
    match serde_json::to_string(report) {
        Ok(summary) => tracing::debug!(%summary, "lifecycle reconciliation report"),
        Err(e) => tracing::warn!(error = %e, "failed to serialise reconciliation report"),
    }
}
