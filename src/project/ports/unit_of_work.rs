//! Unit-of-work port flushing staged store writes atomically.

use crate::project::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for unit-of-work operations.
pub type UnitOfWorkResult<T> = Result<T, UnitOfWorkError>;

/// Transaction boundary for one reconciliation run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Flushes every staged project and lifecycle write as one atomic
    /// operation. Committing with nothing staged succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError`] when the writes cannot be applied; no
    /// staged write is persisted in that case.
    async fn commit(&self) -> UnitOfWorkResult<()>;

    /// Drops every staged write without persisting it. Rolling back with
    /// nothing staged succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError`] when the staging area cannot be reached.
    async fn rollback(&self) -> UnitOfWorkResult<()>;
}

/// Errors returned by unit-of-work implementations.
#[derive(Debug, Clone, Error)]
pub enum UnitOfWorkError {
    /// A staged write targets a project that no longer exists.
    #[error("staged write targets missing project: {0}")]
    StaleWrite(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UnitOfWorkError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
