//! Lifecycle status engine: the periodic reconciliation run.

use super::report::{ReconciliationReport, SkipReason, StatusChange};
use crate::project::{
    domain::{ExpirationPolicy, Project, evaluate_transition},
    ports::{
        LifecycleStore, LifecycleStoreError, ProjectStore, ProjectStoreError, UnitOfWork,
        UnitOfWorkError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors that fail a whole reconciliation run.
#[derive(Debug, Error)]
pub enum LifecycleEngineError {
    /// Loading or staging projects failed.
    #[error(transparent)]
    ProjectStore(#[from] ProjectStoreError),
    /// Staging a lifecycle change failed.
    #[error(transparent)]
    LifecycleStore(#[from] LifecycleStoreError),
    /// Committing the run's writes failed.
    #[error(transparent)]
    UnitOfWork(#[from] UnitOfWorkError),
}

/// Result type for lifecycle engine operations.
pub type LifecycleEngineResult<T> = Result<T, LifecycleEngineError>;

/// Recomputes every active project's lifecycle status from the clock.
///
/// Each run reads "now" once, evaluates every eligible project against it,
/// stages the resulting writes, and issues exactly one commit, even when
/// nothing changed. A failed store call or commit fails the run; the run is
/// idempotent and can be repeated from scratch.
pub struct LifecycleStatusEngine<P, L, U, C>
where
    P: ProjectStore,
    L: LifecycleStore,
    U: UnitOfWork,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    lifecycles: Arc<L>,
    unit_of_work: Arc<U>,
    clock: Arc<C>,
    policy: ExpirationPolicy,
}

impl<P, L, U, C> Clone for LifecycleStatusEngine<P, L, U, C>
where
    P: ProjectStore,
    L: LifecycleStore,
    U: UnitOfWork,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            projects: Arc::clone(&self.projects),
            lifecycles: Arc::clone(&self.lifecycles),
            unit_of_work: Arc::clone(&self.unit_of_work),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<P, L, U, C> LifecycleStatusEngine<P, L, U, C>
where
    P: ProjectStore,
    L: LifecycleStore,
    U: UnitOfWork,
    C: Clock + Send + Sync,
{
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub const fn new(
        projects: Arc<P>,
        lifecycles: Arc<L>,
        unit_of_work: Arc<U>,
        clock: Arc<C>,
        policy: ExpirationPolicy,
    ) -> Self {
        Self {
            projects,
            lifecycles,
            unit_of_work,
            clock,
            policy,
        }
    }

    /// Returns the configured expiration policy.
    #[must_use]
    pub const fn policy(&self) -> ExpirationPolicy {
        self.policy
    }

    /// Runs one reconciliation pass over every eligible project.
    ///
    /// Projects whose milestones are out of order are skipped, logged, and
    /// listed in the report; they never block the others.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleEngineError`] when loading, staging, or committing
    /// fails. Every write staged by the failed run is rolled back, so nothing
    /// from it reaches a later commit.
    pub async fn run(&self) -> LifecycleEngineResult<ReconciliationReport> {
        let now = self.clock.utc();
        match self.stage_and_commit(now).await {
            Ok(report) => {
                tracing::info!(
                    evaluated = report.evaluated(),
                    changed = report.changed_count(),
                    unchanged = report.unchanged(),
                    skipped = report.skipped_count(),
                    "project lifecycle reconciliation committed"
                );
                Ok(report)
            }
            Err(err) => {
                if let Err(rollback_err) = self.unit_of_work.rollback().await {
                    tracing::warn!(
                        error = %rollback_err,
                        "failed to roll back staged lifecycle writes"
                    );
                }
                Err(err)
            }
        }
    }

    async fn stage_and_commit(
        &self,
        now: DateTime<Utc>,
    ) -> LifecycleEngineResult<ReconciliationReport> {
        let eligible = self.projects.list_eligible_projects().await?;
        tracing::info!(
            eligible = eligible.len(),
            now = %now,
            "reconciling project lifecycles"
        );

        let mut report = ReconciliationReport::new(now);
        for project in eligible {
            self.reconcile_project(project, now, &mut report).await?;
        }

        self.unit_of_work.commit().await?;
        Ok(report)
    }

    async fn reconcile_project(
        &self,
        mut project: Project,
        now: DateTime<Utc>,
        report: &mut ReconciliationReport,
    ) -> LifecycleEngineResult<()> {
        let project_id = project.id();
        let transition = match evaluate_transition(&project, now, self.policy) {
            Ok(transition) => transition,
            Err(err) => {
                tracing::warn!(
                    project_id = %project_id,
                    error = %err,
                    "skipping project with malformed milestones"
                );
                report.record_skipped(project_id, SkipReason::from(err));
                return Ok(());
            }
        };

        let Some(reason) = transition.reason() else {
            report.record_unchanged();
            return Ok(());
        };
        let from = project.status();
        let to = transition.target();

        if let Err(err) = project.apply_transition(&transition, now) {
            tracing::warn!(
                project_id = %project_id,
                error = %err,
                "skipping project whose transition was rejected"
            );
            report.record_skipped(
                project_id,
                SkipReason::TransitionRejected {
                    message: err.to_string(),
                },
            );
            return Ok(());
        }

        self.lifecycles.update_lifecycle(project.lifecycle()).await?;
        if transition.touches_project() {
            self.projects.update_project(&project).await?;
        }

        tracing::debug!(
            project_id = %project_id,
            from = %from,
            to = %to,
            reason = %reason,
            "project lifecycle status changed"
        );
        report.record_change(StatusChange {
            project_id,
            from,
            to,
            reason,
            freelancer_id: if transition.touches_project() {
                project.freelancer_id()
            } else {
                None
            },
        });
        Ok(())
    }
}
