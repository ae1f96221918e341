//! Lifecycle state-machine record attached to each project.

use super::{LifecycleId, Milestones, ProjectId, ProjectStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Mutable lifecycle record of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    id: LifecycleId,
    project_id: ProjectId,
    status: ProjectStatus,
    milestones: Milestones,
    acceptance_confirmed: bool,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLifecycleData {
    /// Persisted lifecycle identifier.
    pub id: LifecycleId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted status.
    pub status: ProjectStatus,
    /// Persisted milestone schedule.
    pub milestones: Milestones,
    /// Whether the deliverable has been confirmed.
    pub acceptance_confirmed: bool,
    /// Last time the status changed.
    pub updated_at: DateTime<Utc>,
}

impl Lifecycle {
    /// Creates the lifecycle of a freshly posted project.
    #[must_use]
    pub fn new(project_id: ProjectId, milestones: Milestones, clock: &impl Clock) -> Self {
        Self {
            id: LifecycleId::new(),
            project_id,
            status: ProjectStatus::PendingForReview,
            milestones,
            acceptance_confirmed: false,
            updated_at: clock.utc(),
        }
    }

    /// Reconstructs a lifecycle from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLifecycleData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            status: data.status,
            milestones: data.milestones,
            acceptance_confirmed: data.acceptance_confirmed,
            updated_at: data.updated_at,
        }
    }

    /// Returns the lifecycle identifier.
    #[must_use]
    pub const fn id(&self) -> LifecycleId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the milestone schedule.
    #[must_use]
    pub const fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    /// Returns whether the deliverable has been confirmed.
    #[must_use]
    pub const fn acceptance_confirmed(&self) -> bool {
        self.acceptance_confirmed
    }

    /// Returns the last time the status changed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records the external confirmation that the deliverable was accepted.
    pub const fn confirm_acceptance(&mut self) {
        self.acceptance_confirmed = true;
    }

    /// Moves the lifecycle to `status`, stamping `now` as the change time.
    ///
    /// Returns `false` and leaves the record untouched when the lifecycle is
    /// already in `status`.
    pub fn apply_status(&mut self, status: ProjectStatus, now: DateTime<Utc>) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = now;
        true
    }
}
