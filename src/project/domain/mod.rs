//! Domain model for project lifecycle reconciliation.
//!
//! A [`Project`] owns one [`Lifecycle`] and its [`FreelancerApplication`]s.
//! The status rules live in [`evaluate_transition`]; everything here is free
//! of infrastructure concerns.

mod application;
mod error;
mod ids;
mod lifecycle;
mod milestones;
mod project;
mod status;
mod transition;

pub use application::FreelancerApplication;
pub use error::{ParseApplicationStatusError, ParseProjectStatusError, ProjectDomainError};
pub use ids::{ApplicationId, CategoryId, LifecycleId, ProjectId, UserId};
pub use lifecycle::{Lifecycle, PersistedLifecycleData};
pub use milestones::{Milestone, MilestoneOrderError, Milestones};
pub use project::{PersistedProjectData, Project, ProjectDraft};
pub use status::{ApplicationStatus, ProjectStatus};
pub use transition::{ExpirationPolicy, Transition, TransitionReason, evaluate_transition};
