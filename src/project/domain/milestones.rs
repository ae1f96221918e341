//! Scheduled milestone dates bounding each phase of a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the four scheduled milestones of a project lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// Applications open.
    ApplicationsStart,
    /// Applications close.
    ApplicationsDeadline,
    /// Work is due to start.
    WorkStart,
    /// Work is due to be delivered.
    WorkDeadline,
}

impl Milestone {
    /// Returns the milestone name used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationsStart => "applications_start_date",
            Self::ApplicationsDeadline => "applications_deadline",
            Self::WorkStart => "work_start_date",
            Self::WorkDeadline => "work_deadline",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pair of adjacent milestones that are scheduled in the wrong order.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{earlier} ({earlier_at}) is scheduled after {later} ({later_at})")]
pub struct MilestoneOrderError {
    /// Milestone that should come first.
    pub earlier: Milestone,
    /// Scheduled instant of the earlier milestone.
    pub earlier_at: DateTime<Utc>,
    /// Milestone that should come second.
    pub later: Milestone,
    /// Scheduled instant of the later milestone.
    pub later_at: DateTime<Utc>,
}

/// The four milestone timestamps of a lifecycle.
///
/// The creating workflow guarantees
/// `applications_start <= applications_deadline <= work_start <= work_deadline`.
/// Values loaded from storage are not re-validated on construction;
/// [`Milestones::check_order`] reports a violation when one is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    applications_start: DateTime<Utc>,
    applications_deadline: DateTime<Utc>,
    work_start: DateTime<Utc>,
    work_deadline: DateTime<Utc>,
}

impl Milestones {
    /// Creates a milestone schedule.
    #[must_use]
    pub const fn new(
        applications_start: DateTime<Utc>,
        applications_deadline: DateTime<Utc>,
        work_start: DateTime<Utc>,
        work_deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            applications_start,
            applications_deadline,
            work_start,
            work_deadline,
        }
    }

    /// Returns when applications open.
    #[must_use]
    pub const fn applications_start(&self) -> DateTime<Utc> {
        self.applications_start
    }

    /// Returns when applications close.
    #[must_use]
    pub const fn applications_deadline(&self) -> DateTime<Utc> {
        self.applications_deadline
    }

    /// Returns when work is due to start.
    #[must_use]
    pub const fn work_start(&self) -> DateTime<Utc> {
        self.work_start
    }

    /// Returns when work is due to be delivered.
    #[must_use]
    pub const fn work_deadline(&self) -> DateTime<Utc> {
        self.work_deadline
    }

    /// Returns the scheduled instant of a milestone.
    #[must_use]
    pub const fn at(&self, milestone: Milestone) -> DateTime<Utc> {
        match milestone {
            Milestone::ApplicationsStart => self.applications_start,
            Milestone::ApplicationsDeadline => self.applications_deadline,
            Milestone::WorkStart => self.work_start,
            Milestone::WorkDeadline => self.work_deadline,
        }
    }

    /// Checks that the milestones are monotonically non-decreasing.
    ///
    /// # Errors
    ///
    /// Returns the first adjacent pair that is out of order.
    pub fn check_order(&self) -> Result<(), MilestoneOrderError> {
        const ORDER: [(Milestone, Milestone); 3] = [
            (Milestone::ApplicationsStart, Milestone::ApplicationsDeadline),
            (Milestone::ApplicationsDeadline, Milestone::WorkStart),
            (Milestone::WorkStart, Milestone::WorkDeadline),
        ];

        for (earlier, later) in ORDER {
            let earlier_at = self.at(earlier);
            let later_at = self.at(later);
            if earlier_at > later_at {
                return Err(MilestoneOrderError {
                    earlier,
                    earlier_at,
                    later,
                    later_at,
                });
            }
        }
        Ok(())
    }
}
