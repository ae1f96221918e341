//! Time-driven status rules for project lifecycles.
//!
//! [`evaluate_transition`] is a pure function of a project, the current
//! instant, and the [`ExpirationPolicy`]. It decides which status the
//! project's milestones and applications imply and describes the change as a
//! [`Transition`]; [`Project::apply_transition`](super::Project::apply_transition)
//! performs it.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. acceptance confirmed: `Completed`
//! 2. past the work deadline: `Expired`, escalating to `Cancelled` once the
//!    project has been expired for the configured grace period
//! 3. past the work start: `InProgress` when an application was accepted,
//!    otherwise `Cancelled`
//! 4. past the applications deadline: `WaitingForWorkStart`
//! 5. past the applications start: `AcceptingApplications`
//! 6. otherwise: `PendingForReview`

use super::{
    ApplicationId, MilestoneOrderError, Project, ProjectDomainError, ProjectStatus, UserId,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grace period after which an expired project is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationPolicy {
    max_work_deadline_expiration_days: u32,
}

impl ExpirationPolicy {
    /// Grace period used when none is configured.
    pub const DEFAULT_MAX_WORK_DEADLINE_EXPIRATION_DAYS: u32 = 30;

    /// Creates a policy cancelling projects expired for at least `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidExpirationDays`] when `days` is
    /// zero.
    pub const fn new(days: u32) -> Result<Self, ProjectDomainError> {
        if days == 0 {
            return Err(ProjectDomainError::InvalidExpirationDays(days));
        }
        Ok(Self {
            max_work_deadline_expiration_days: days,
        })
    }

    /// Returns the configured grace period in days.
    #[must_use]
    pub const fn max_work_deadline_expiration_days(self) -> u32 {
        self.max_work_deadline_expiration_days
    }

    /// Returns the grace period as a duration.
    #[must_use]
    pub fn grace_period(self) -> TimeDelta {
        TimeDelta::days(i64::from(self.max_work_deadline_expiration_days))
    }

    /// Returns `true` once `now` is at least one grace period past `expired_at`.
    #[must_use]
    pub fn is_stale(self, expired_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - expired_at >= self.grace_period()
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self {
            max_work_deadline_expiration_days: Self::DEFAULT_MAX_WORK_DEADLINE_EXPIRATION_DAYS,
        }
    }
}

/// The rule that decided a project's target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// The deliverable was confirmed.
    AcceptanceConfirmed,
    /// The work deadline has passed.
    WorkDeadlinePassed,
    /// The project stayed expired for the whole grace period.
    ExpirationEscalated,
    /// Work started with an accepted freelancer.
    FreelancerSelected,
    /// Work was due to start but no application was accepted.
    NoAcceptedApplication,
    /// The applications deadline has passed.
    ApplicationsClosed,
    /// Applications have opened.
    ApplicationsOpened,
    /// Applications have not opened yet.
    AwaitingApplicationsStart,
}

impl TransitionReason {
    /// Returns the reason name used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AcceptanceConfirmed => "acceptance_confirmed",
            Self::WorkDeadlinePassed => "work_deadline_passed",
            Self::ExpirationEscalated => "expiration_escalated",
            Self::FreelancerSelected => "freelancer_selected",
            Self::NoAcceptedApplication => "no_accepted_application",
            Self::ApplicationsClosed => "applications_closed",
            Self::ApplicationsOpened => "applications_opened",
            Self::AwaitingApplicationsStart => "awaiting_applications_start",
        }
    }
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating a project against the lifecycle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The project is already in the implied status.
    Unchanged {
        /// Current (and target) status.
        status: ProjectStatus,
    },
    /// The lifecycle moves to a new status with no other side effect.
    Change {
        /// Status before the run.
        from: ProjectStatus,
        /// Target status.
        to: ProjectStatus,
        /// Rule that fired.
        reason: TransitionReason,
    },
    /// Work starts: the accepted application wins the project.
    Promote {
        /// Status before the run.
        from: ProjectStatus,
        /// Winning application.
        application_id: ApplicationId,
        /// Freelancer behind the winning application.
        freelancer_id: UserId,
    },
}

impl Transition {
    /// Returns the status the project ends up in.
    #[must_use]
    pub const fn target(&self) -> ProjectStatus {
        match *self {
            Self::Unchanged { status } => status,
            Self::Change { to, .. } => to,
            Self::Promote { .. } => ProjectStatus::InProgress,
        }
    }

    /// Returns the rule behind a change, or `None` when nothing changes.
    #[must_use]
    pub const fn reason(&self) -> Option<TransitionReason> {
        match *self {
            Self::Unchanged { .. } => None,
            Self::Change { reason, .. } => Some(reason),
            Self::Promote { .. } => Some(TransitionReason::FreelancerSelected),
        }
    }

    /// Returns `true` when the lifecycle record changes.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }

    /// Returns `true` when the project record (freelancer and applications)
    /// changes in addition to the lifecycle.
    #[must_use]
    pub const fn touches_project(&self) -> bool {
        matches!(self, Self::Promote { .. })
    }
}

/// Target decided by the rules before comparing with the current status.
struct Target {
    status: ProjectStatus,
    reason: TransitionReason,
    winner: Option<(ApplicationId, UserId)>,
}

impl Target {
    const fn status(status: ProjectStatus, reason: TransitionReason) -> Self {
        Self {
            status,
            reason,
            winner: None,
        }
    }
}

/// Evaluates the lifecycle rules for `project` at instant `now`.
///
/// Terminal projects are always [`Transition::Unchanged`]. Acceptance
/// confirmation is honoured before the milestones are consulted, so it
/// applies even when the schedule is malformed.
///
/// # Errors
///
/// Returns [`MilestoneOrderError`] when the project's milestones are out of
/// order and a date-based rule would have to be consulted.
pub fn evaluate_transition(
    project: &Project,
    now: DateTime<Utc>,
    policy: ExpirationPolicy,
) -> Result<Transition, MilestoneOrderError> {
    let current = project.status();
    if current.is_terminal() {
        return Ok(Transition::Unchanged { status: current });
    }

    let target = resolve_target(project, now, policy)?;
    if target.status == current {
        return Ok(Transition::Unchanged { status: current });
    }

    Ok(match target.winner {
        Some((application_id, freelancer_id)) => Transition::Promote {
            from: current,
            application_id,
            freelancer_id,
        },
        None => Transition::Change {
            from: current,
            to: target.status,
            reason: target.reason,
        },
    })
}

fn resolve_target(
    project: &Project,
    now: DateTime<Utc>,
    policy: ExpirationPolicy,
) -> Result<Target, MilestoneOrderError> {
    let lifecycle = project.lifecycle();
    if lifecycle.acceptance_confirmed() {
        return Ok(Target::status(
            ProjectStatus::Completed,
            TransitionReason::AcceptanceConfirmed,
        ));
    }

    let milestones = lifecycle.milestones();
    milestones.check_order()?;
    let current = lifecycle.status();

    if now > milestones.work_deadline() {
        let target = if current != ProjectStatus::Expired {
            Target::status(ProjectStatus::Expired, TransitionReason::WorkDeadlinePassed)
        } else if policy.is_stale(lifecycle.updated_at(), now) {
            Target::status(
                ProjectStatus::Cancelled,
                TransitionReason::ExpirationEscalated,
            )
        } else {
            Target::status(current, TransitionReason::WorkDeadlinePassed)
        };
        return Ok(target);
    }

    if now > milestones.work_start() {
        let target = match project.accepted_application() {
            Some(application) => Target {
                status: ProjectStatus::InProgress,
                reason: TransitionReason::FreelancerSelected,
                winner: Some((application.id(), application.freelancer_id())),
            },
            None => Target::status(
                ProjectStatus::Cancelled,
                TransitionReason::NoAcceptedApplication,
            ),
        };
        return Ok(target);
    }

    if now > milestones.applications_deadline() {
        return Ok(Target::status(
            ProjectStatus::WaitingForWorkStart,
            TransitionReason::ApplicationsClosed,
        ));
    }

    if now > milestones.applications_start() {
        return Ok(Target::status(
            ProjectStatus::AcceptingApplications,
            TransitionReason::ApplicationsOpened,
        ));
    }

    Ok(Target::status(
        ProjectStatus::PendingForReview,
        TransitionReason::AwaitingApplicationsStart,
    ))
}
