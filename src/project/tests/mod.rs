//! Unit tests for project lifecycle reconciliation.


use crate::project::domain::{
    ApplicationId, ApplicationStatus, CategoryId, FreelancerApplication, Lifecycle, LifecycleId,
    Milestones, PersistedLifecycleData, PersistedProjectData, Project, ProjectId, ProjectStatus,
    UserId,
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The instant every test treats as "now".
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0)
        .single()
        .expect("valid test timestamp")
}

/// Returns `now()` shifted by `offset` days.
pub(super) fn days(offset: i64) -> DateTime<Utc> {
    now() + TimeDelta::days(offset)
}

/// Builds projects in arbitrary lifecycle states without going through the
/// posting workflow.
pub(super) struct ProjectBuilder {
    status: ProjectStatus,
    milestones: Milestones,
    acceptance_confirmed: bool,
    updated_at: DateTime<Utc>,
    freelancer_id: Option<UserId>,
    applications: Vec<FreelancerApplication>,
}

impl ProjectBuilder {
    /// Starts a project in `status` whose milestones all lie in the future.
    pub(super) fn new(status: ProjectStatus) -> Self {
        Self {
            status,
            milestones: Milestones::new(days(1), days(3), days(5), days(10)),
            acceptance_confirmed: false,
            updated_at: days(-10),
            freelancer_id: None,
            applications: Vec::new(),
        }
    }

    /// Sets the milestones as day offsets from `now()`.
    pub(super) fn milestones(mut self, offsets: [i64; 4]) -> Self {
        let [applications_start, applications_deadline, work_start, work_deadline] = offsets;
        self.milestones = Milestones::new(
            days(applications_start),
            days(applications_deadline),
            days(work_start),
            days(work_deadline),
        );
        self
    }

    /// Sets the last status change as a day offset from `now()`.
    pub(super) fn updated(mut self, offset: i64) -> Self {
        self.updated_at = days(offset);
        self
    }

    /// Marks the deliverable as confirmed.
    pub(super) fn confirmed(mut self) -> Self {
        self.acceptance_confirmed = true;
        self
    }

    /// Sets an already selected freelancer.
    pub(super) fn freelancer(mut self, freelancer_id: UserId) -> Self {
        self.freelancer_id = Some(freelancer_id);
        self
    }

    /// Adds an application with the given status.
    pub(super) fn application(mut self, status: ApplicationStatus) -> Self {
        self.applications.push(FreelancerApplication::from_persisted(
            ApplicationId::new(),
            UserId::new(),
            status,
        ));
        self
    }

    pub(super) fn build(self) -> Project {
        let id = ProjectId::new();
        Project::from_persisted(PersistedProjectData {
            id,
            title: "Build a storefront".to_owned(),
            description: "Port the catalogue to the new theme".to_owned(),
            budget: Decimal::new(125_000, 2),
            category_id: CategoryId::new(),
            employer_id: UserId::new(),
            freelancer_id: self.freelancer_id,
            lifecycle: Lifecycle::from_persisted(PersistedLifecycleData {
                id: LifecycleId::new(),
                project_id: id,
                status: self.status,
                milestones: self.milestones,
                acceptance_confirmed: self.acceptance_confirmed,
                updated_at: self.updated_at,
            }),
            applications: self.applications,
        })
    }
}
