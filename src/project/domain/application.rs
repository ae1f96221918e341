//! Freelancer applications (bids) on a project.

use super::{ApplicationId, ApplicationStatus, UserId};
use serde::{Deserialize, Serialize};

/// A freelancer's bid on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerApplication {
    id: ApplicationId,
    freelancer_id: UserId,
    status: ApplicationStatus,
}

impl FreelancerApplication {
    /// Creates a pending application for `freelancer_id`.
    #[must_use]
    pub fn new(freelancer_id: UserId) -> Self {
        Self {
            id: ApplicationId::new(),
            freelancer_id,
            status: ApplicationStatus::Pending,
        }
    }

    /// Reconstructs an application from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ApplicationId,
        freelancer_id: UserId,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            id,
            freelancer_id,
            status,
        }
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the applying freelancer.
    #[must_use]
    pub const fn freelancer_id(&self) -> UserId {
        self.freelancer_id
    }

    /// Returns the application status.
    #[must_use]
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns `true` when the employer accepted this application.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self.status, ApplicationStatus::Accepted)
    }

    /// Marks the application as accepted by the employer.
    pub const fn accept(&mut self) {
        self.status = ApplicationStatus::Accepted;
    }

    /// Marks the application as rejected.
    pub const fn reject(&mut self) {
        self.status = ApplicationStatus::Rejected;
    }
}
