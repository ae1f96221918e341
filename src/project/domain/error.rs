//! Error types for project domain validation and parsing.

use super::{ApplicationId, MilestoneOrderError, ProjectId};
use thiserror::Error;

/// Errors returned while constructing or mutating project domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The expiration grace period must be at least one day.
    #[error("max work deadline expiration days must be positive, got {0}")]
    InvalidExpirationDays(u32),

    /// The project title is empty after trimming.
    #[error("project title must not be empty")]
    EmptyProjectTitle,

    /// The project budget is negative.
    #[error("project budget must not be negative, got {0}")]
    NegativeBudget(rust_decimal::Decimal),

    /// The milestone schedule is out of order.
    #[error("invalid milestone schedule: {0}")]
    MilestonesOutOfOrder(#[from] MilestoneOrderError),

    /// The referenced application does not belong to the project.
    #[error("application {application_id} does not belong to project {project_id}")]
    ApplicationNotFound {
        /// Project that was searched.
        project_id: ProjectId,
        /// Application that was not found.
        application_id: ApplicationId,
    },

    /// Only accepted applications may win a project.
    #[error("application {0} has not been accepted")]
    ApplicationNotAccepted(ApplicationId),
}

/// Error returned while parsing project lifecycle statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

/// Error returned while parsing freelancer application statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown application status: {0}")]
pub struct ParseApplicationStatusError(pub String);
