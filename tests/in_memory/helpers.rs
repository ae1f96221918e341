//! Shared fixtures for in-memory reconciliation integration tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use std::sync::Arc;
use tessellate::project::{
    adapters::memory::InMemoryProjectStorage,
    domain::{
        ApplicationId, ApplicationStatus, CategoryId, ExpirationPolicy, FreelancerApplication,
        Lifecycle, LifecycleId, Milestones, PersistedLifecycleData, PersistedProjectData, Project,
        ProjectId, ProjectStatus, UserId,
    },
    services::LifecycleStatusEngine,
};

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Engine wired entirely to one in-memory store.
pub type InMemoryEngine = LifecycleStatusEngine<
    InMemoryProjectStorage,
    InMemoryProjectStorage,
    InMemoryProjectStorage,
    FixedClock,
>;

/// The instant every scenario treats as "now".
#[must_use]
pub fn scenario_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Returns `scenario_now()` shifted by `offset` days.
#[must_use]
pub fn days(offset: i64) -> DateTime<Utc> {
    scenario_now() + TimeDelta::days(offset)
}

/// Builds an engine over `storage` with the clock frozen at `scenario_now()`.
#[must_use]
pub fn engine(storage: &InMemoryProjectStorage, policy: ExpirationPolicy) -> InMemoryEngine {
    let shared = Arc::new(storage.clone());
    LifecycleStatusEngine::new(
        Arc::clone(&shared),
        Arc::clone(&shared),
        shared,
        Arc::new(FixedClock(scenario_now())),
        policy,
    )
}

/// Describes a stored project in an arbitrary lifecycle state.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    status: ProjectStatus,
    offsets: [i64; 4],
    updated_offset: i64,
    acceptance_confirmed: bool,
    applications: Vec<ApplicationStatus>,
}

impl ProjectFixture {
    /// Starts a fixture in `status` whose milestones all lie in the future.
    #[must_use]
    pub const fn new(status: ProjectStatus) -> Self {
        Self {
            status,
            offsets: [1, 3, 5, 10],
            updated_offset: -10,
            acceptance_confirmed: false,
            applications: Vec::new(),
        }
    }

    /// Sets the four milestones as day offsets from `scenario_now()`.
    #[must_use]
    pub const fn milestones(mut self, offsets: [i64; 4]) -> Self {
        self.offsets = offsets;
        self
    }

    /// Sets the last status change as a day offset from `scenario_now()`.
    #[must_use]
    pub const fn updated(mut self, offset: i64) -> Self {
        self.updated_offset = offset;
        self
    }

    /// Marks the deliverable as confirmed.
    #[must_use]
    pub const fn confirmed(mut self) -> Self {
        self.acceptance_confirmed = true;
        self
    }

    /// Adds an application with `status`.
    #[must_use]
    pub fn application(mut self, status: ApplicationStatus) -> Self {
        self.applications.push(status);
        self
    }

    /// Builds the project aggregate.
    #[must_use]
    pub fn build(&self) -> Project {
        let id = ProjectId::new();
        let [applications_start, applications_deadline, work_start, work_deadline] = self.offsets;
        Project::from_persisted(PersistedProjectData {
            id,
            title: "Migrate billing exports".to_owned(),
            description: "Move CSV exports onto the reporting service".to_owned(),
            budget: Decimal::new(98_000, 2),
            category_id: CategoryId::new(),
            employer_id: UserId::new(),
            freelancer_id: None,
            lifecycle: Lifecycle::from_persisted(PersistedLifecycleData {
                id: LifecycleId::new(),
                project_id: id,
                status: self.status,
                milestones: Milestones::new(
                    days(applications_start),
                    days(applications_deadline),
                    days(work_start),
                    days(work_deadline),
                ),
                acceptance_confirmed: self.acceptance_confirmed,
                updated_at: days(self.updated_offset),
            }),
            applications: self
                .applications
                .iter()
                .map(|status| {
                    FreelancerApplication::from_persisted(
                        ApplicationId::new(),
                        UserId::new(),
                        *status,
                    )
                })
                .collect(),
        })
    }

    /// Builds the project and inserts it into `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage rejects the insert.
    pub fn store(&self, storage: &InMemoryProjectStorage) -> eyre::Result<ProjectId> {
        let project = self.build();
        let id = project.id();
        storage.insert(project)?;
        Ok(id)
    }
}

/// Loads the committed state of `id`.
///
/// # Errors
///
/// Returns an error when the project is missing or storage is unreadable.
pub fn stored(storage: &InMemoryProjectStorage, id: ProjectId) -> eyre::Result<Project> {
    storage
        .find(id)?
        .ok_or_else(|| eyre::eyre!("project {id} missing from storage"))
}
