//! Project aggregate root.

use super::{
    ApplicationId, CategoryId, FreelancerApplication, Lifecycle, Milestones, ProjectDomainError,
    ProjectId, ProjectStatus, Transition, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employer-supplied details of a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    title: String,
    description: String,
    budget: Decimal,
    category_id: CategoryId,
    employer_id: UserId,
}

impl ProjectDraft {
    /// Creates a draft with an empty description.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        budget: Decimal,
        category_id: CategoryId,
        employer_id: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            budget,
            category_id,
            employer_id,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Project aggregate root.
///
/// Owns its [`Lifecycle`] and the freelancer applications submitted to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    description: String,
    budget: Decimal,
    category_id: CategoryId,
    employer_id: UserId,
    freelancer_id: Option<UserId>,
    lifecycle: Lifecycle,
    applications: Vec<FreelancerApplication>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted budget.
    pub budget: Decimal,
    /// Persisted category reference.
    pub category_id: CategoryId,
    /// Employer who posted the project.
    pub employer_id: UserId,
    /// Selected freelancer, if any.
    pub freelancer_id: Option<UserId>,
    /// Persisted lifecycle record.
    pub lifecycle: Lifecycle,
    /// Persisted applications.
    pub applications: Vec<FreelancerApplication>,
}

impl Project {
    /// Posts a new project with the given milestone schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectTitle`] when the title is
    /// blank, [`ProjectDomainError::NegativeBudget`] when the budget is
    /// below zero, or [`ProjectDomainError::MilestonesOutOfOrder`] when the
    /// schedule is not ordered.
    pub fn new(
        draft: ProjectDraft,
        milestones: Milestones,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ProjectDomainError::EmptyProjectTitle);
        }
        if draft.budget < Decimal::ZERO {
            return Err(ProjectDomainError::NegativeBudget(draft.budget));
        }
        milestones.check_order()?;

        let id = ProjectId::new();
        Ok(Self {
            id,
            title: title.to_owned(),
            description: draft.description,
            budget: draft.budget,
            category_id: draft.category_id,
            employer_id: draft.employer_id,
            freelancer_id: None,
            lifecycle: Lifecycle::new(id, milestones, clock),
            applications: Vec::new(),
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            budget: data.budget,
            category_id: data.category_id,
            employer_id: data.employer_id,
            freelancer_id: data.freelancer_id,
            lifecycle: data.lifecycle,
            applications: data.applications,
        }
    }

    /// Decomposes the project into its persisted representation.
    #[must_use]
    pub fn into_persisted(self) -> PersistedProjectData {
        PersistedProjectData {
            id: self.id,
            title: self.title,
            description: self.description,
            budget: self.budget,
            category_id: self.category_id,
            employer_id: self.employer_id,
            freelancer_id: self.freelancer_id,
            lifecycle: self.lifecycle,
            applications: self.applications,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the project budget.
    #[must_use]
    pub const fn budget(&self) -> Decimal {
        self.budget
    }

    /// Returns the category reference.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Returns the employer who posted the project.
    #[must_use]
    pub const fn employer_id(&self) -> UserId {
        self.employer_id
    }

    /// Returns the selected freelancer, if any.
    #[must_use]
    pub const fn freelancer_id(&self) -> Option<UserId> {
        self.freelancer_id
    }

    /// Returns the lifecycle record.
    #[must_use]
    pub const fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.lifecycle.status()
    }

    /// Returns the applications submitted to the project.
    #[must_use]
    pub fn applications(&self) -> &[FreelancerApplication] {
        &self.applications
    }

    /// Returns the first accepted application, if any.
    #[must_use]
    pub fn accepted_application(&self) -> Option<&FreelancerApplication> {
        self.applications
            .iter()
            .find(|application| application.is_accepted())
    }

    /// Adds a freelancer's application to the project.
    pub fn submit_application(&mut self, application: FreelancerApplication) {
        self.applications.push(application);
    }

    /// Marks an application as accepted by the employer.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::ApplicationNotFound`] when the
    /// application does not belong to the project.
    pub fn accept_application(
        &mut self,
        application_id: ApplicationId,
    ) -> Result<(), ProjectDomainError> {
        self.find_application_mut(application_id)?.accept();
        Ok(())
    }

    /// Records the external confirmation that the deliverable was accepted.
    pub const fn confirm_acceptance(&mut self) {
        self.lifecycle.confirm_acceptance();
    }

    /// Selects the freelancer behind an accepted application.
    ///
    /// Every other application is rejected so the winner is the only
    /// accepted bid on the project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::ApplicationNotFound`] when the
    /// application does not belong to the project, or
    /// [`ProjectDomainError::ApplicationNotAccepted`] when it has not been
    /// accepted.
    pub fn select_freelancer(
        &mut self,
        application_id: ApplicationId,
    ) -> Result<UserId, ProjectDomainError> {
        let winner = self.find_application_mut(application_id)?;
        if !winner.is_accepted() {
            return Err(ProjectDomainError::ApplicationNotAccepted(application_id));
        }
        let freelancer_id = winner.freelancer_id();

        for application in &mut self.applications {
            if application.id() != application_id {
                application.reject();
            }
        }
        self.freelancer_id = Some(freelancer_id);
        Ok(freelancer_id)
    }

    /// Applies an evaluated transition to the aggregate.
    ///
    /// Returns `false` when the transition leaves the project unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error from [`Project::select_freelancer`] when a promotion
    /// names an application that cannot win the project.
    pub fn apply_transition(
        &mut self,
        transition: &Transition,
        now: DateTime<Utc>,
    ) -> Result<bool, ProjectDomainError> {
        match *transition {
            Transition::Unchanged { .. } => Ok(false),
            Transition::Change { to, .. } => Ok(self.lifecycle.apply_status(to, now)),
            Transition::Promote { application_id, .. } => {
                self.select_freelancer(application_id)?;
                Ok(self.lifecycle.apply_status(ProjectStatus::InProgress, now))
            }
        }
    }

    fn find_application_mut(
        &mut self,
        application_id: ApplicationId,
    ) -> Result<&mut FreelancerApplication, ProjectDomainError> {
        let project_id = self.id;
        self.applications
            .iter_mut()
            .find(|application| application.id() == application_id)
            .ok_or(ProjectDomainError::ApplicationNotFound {
                project_id,
                application_id,
            })
    }
}
