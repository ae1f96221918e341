//! Lifecycle and application status enumerations.

use super::{ParseApplicationStatusError, ParseProjectStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a posted project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// The project is waiting for moderation before applications open.
    PendingForReview,
    /// The project is visible in listings. Set by the publishing workflow.
    Published,
    /// Freelancers may apply.
    AcceptingApplications,
    /// Applications are closed and work has not started yet.
    WaitingForWorkStart,
    /// A freelancer has been selected and work is under way.
    InProgress,
    /// The deliverable was accepted.
    Completed,
    /// The work deadline passed without confirmation.
    Expired,
    /// The project was cancelled.
    Cancelled,
}

impl ProjectStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 8] = [
        Self::PendingForReview,
        Self::Published,
        Self::AcceptingApplications,
        Self::WaitingForWorkStart,
        Self::InProgress,
        Self::Completed,
        Self::Expired,
        Self::Cancelled,
    ];

    /// Statuses the reconciliation engine never leaves.
    pub const TERMINAL: [Self; 2] = [Self::Completed, Self::Cancelled];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingForReview => "pending_for_review",
            Self::Published => "published",
            Self::AcceptingApplications => "accepting_applications",
            Self::WaitingForWorkStart => "waiting_for_work_start",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for statuses the engine never transitions away from.
    ///
    /// `Expired` is not terminal: it still escalates to `Cancelled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending_for_review" => Ok(Self::PendingForReview),
            "published" => Ok(Self::Published),
            "accepting_applications" => Ok(Self::AcceptingApplications),
            "waiting_for_work_start" => Ok(Self::WaitingForWorkStart),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

/// Status of a freelancer's application to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// The employer has not decided yet.
    Pending,
    /// The employer accepted the bid.
    Accepted,
    /// The bid was declined or lost to another freelancer.
    Rejected,
}

impl ApplicationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ApplicationStatus {
    type Error = ParseApplicationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseApplicationStatusError(value.to_owned())),
        }
    }
}
