//! Store port for loading projects and staging project changes.

use crate::project::domain::{Project, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project store operations.
pub type ProjectStoreResult<T> = Result<T, ProjectStoreError>;

/// Project persistence contract used by the lifecycle engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Returns every project whose lifecycle is not `Completed` or
    /// `Cancelled`, with its lifecycle and applications populated.
    async fn list_eligible_projects(&self) -> ProjectStoreResult<Vec<Project>>;

    /// Stages the project's selected freelancer and application statuses
    /// for the next commit.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::NotFound`] when the project does not
    /// exist.
    async fn update_project(&self, project: &Project) -> ProjectStoreResult<()>;
}

/// Errors returned by project store implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectStoreError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
