//! Shared world state for lifecycle reconciliation BDD scenarios.

use super::helpers::{ProjectFixture, engine};
use rstest::fixture;
use tessellate::project::{
    adapters::memory::InMemoryProjectStorage,
    domain::{ExpirationPolicy, Project, ProjectId},
    services::ReconciliationReport,
};

/// Scenario world for reconciliation behaviour tests.
pub struct ReconciliationWorld {
    pub storage: InMemoryProjectStorage,
    pub policy: ExpirationPolicy,
    pub pending_project: Option<ProjectFixture>,
    pub project_id: Option<ProjectId>,
    pub reports: Vec<ReconciliationReport>,
}

impl ReconciliationWorld {
    /// Creates a world with empty storage and the default grace period.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: InMemoryProjectStorage::new(),
            policy: ExpirationPolicy::default(),
            pending_project: None,
            project_id: None,
            reports: Vec::new(),
        }
    }

    /// Refines the project being described by the current scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no project has been introduced yet.
    pub fn refine_project(
        &mut self,
        refine: impl FnOnce(ProjectFixture) -> ProjectFixture,
    ) -> eyre::Result<()> {
        let fixture = self
            .pending_project
            .take()
            .ok_or_else(|| eyre::eyre!("missing pending project in scenario world"))?;
        self.pending_project = Some(refine(fixture));
        Ok(())
    }

    /// Stores the pending project, if any, and runs the engine once.
    ///
    /// # Errors
    ///
    /// Returns an error when storing the project or the run fails.
    pub async fn run_engine(&mut self) -> eyre::Result<()> {
        if let Some(fixture) = self.pending_project.take() {
            self.project_id = Some(fixture.store(&self.storage)?);
        }
        let report = engine(&self.storage, self.policy).run().await?;
        self.reports.push(report);
        Ok(())
    }

    /// Loads the committed scenario project.
    ///
    /// # Errors
    ///
    /// Returns an error when the project was never stored.
    pub fn project(&self) -> eyre::Result<Project> {
        let id = self
            .project_id
            .ok_or_else(|| eyre::eyre!("scenario project was never stored"))?;
        super::helpers::stored(&self.storage, id)
    }

    /// Returns the report of the most recent run.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine has not run.
    pub fn last_report(&self) -> eyre::Result<&ReconciliationReport> {
        self.reports
            .last()
            .ok_or_else(|| eyre::eyre!("the reconciliation job has not run"))
    }
}

impl Default for ReconciliationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReconciliationWorld {
    ReconciliationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
