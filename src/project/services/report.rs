//! Summary of one reconciliation run.

use crate::project::domain::{
    Milestone, MilestoneOrderError, ProjectId, ProjectStatus, TransitionReason, UserId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A lifecycle status change applied during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// Project whose lifecycle changed.
    pub project_id: ProjectId,
    /// Status before the run.
    pub from: ProjectStatus,
    /// Status after the run.
    pub to: ProjectStatus,
    /// Rule that fired.
    pub reason: TransitionReason,
    /// Freelancer selected by the change, for promotions to `InProgress`.
    pub freelancer_id: Option<UserId>,
}

/// Why a project was left out of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The milestone schedule violates its ordering invariant.
    MilestonesOutOfOrder {
        /// Milestone that should come first.
        earlier: Milestone,
        /// Milestone that should come second.
        later: Milestone,
    },
    /// The aggregate refused the evaluated transition.
    TransitionRejected {
        /// Domain error message.
        message: String,
    },
}

impl From<MilestoneOrderError> for SkipReason {
    fn from(err: MilestoneOrderError) -> Self {
        Self::MilestonesOutOfOrder {
            earlier: err.earlier,
            later: err.later,
        }
    }
}

/// A project skipped during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedProject {
    /// Skipped project.
    pub project_id: ProjectId,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    ran_at: DateTime<Utc>,
    evaluated: usize,
    unchanged: usize,
    changes: Vec<StatusChange>,
    skipped: Vec<SkippedProject>,
}

impl ReconciliationReport {
    /// Creates an empty report for a run at `ran_at`.
    #[must_use]
    pub const fn new(ran_at: DateTime<Utc>) -> Self {
        Self {
            ran_at,
            evaluated: 0,
            unchanged: 0,
            changes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Returns the instant the run evaluated projects against.
    #[must_use]
    pub const fn ran_at(&self) -> DateTime<Utc> {
        self.ran_at
    }

    /// Returns how many eligible projects were loaded.
    #[must_use]
    pub const fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// Returns how many projects were already in their implied status.
    #[must_use]
    pub const fn unchanged(&self) -> usize {
        self.unchanged
    }

    /// Returns the applied status changes.
    #[must_use]
    pub fn changes(&self) -> &[StatusChange] {
        &self.changes
    }

    /// Returns the skipped projects.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedProject] {
        &self.skipped
    }

    /// Returns how many projects changed status.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }

    /// Returns how many projects were skipped.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Returns how many projects moved into `status`.
    #[must_use]
    pub fn count_for(&self, status: ProjectStatus) -> usize {
        self.changes
            .iter()
            .filter(|change| change.to == status)
            .count()
    }

    /// Returns the change applied to `project_id`, if any.
    #[must_use]
    pub fn change_for(&self, project_id: ProjectId) -> Option<&StatusChange> {
        self.changes
            .iter()
            .find(|change| change.project_id == project_id)
    }

    pub(crate) const fn record_unchanged(&mut self) {
        self.evaluated += 1;
        self.unchanged += 1;
    }

    pub(crate) fn record_change(&mut self, change: StatusChange) {
        self.evaluated += 1;
        self.changes.push(change);
    }

    pub(crate) fn record_skipped(&mut self, project_id: ProjectId, reason: SkipReason) {
        self.evaluated += 1;
        self.skipped.push(SkippedProject { project_id, reason });
    }
}
