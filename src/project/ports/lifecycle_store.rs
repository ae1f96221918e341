//! Store port for staging lifecycle status changes.

use crate::project::domain::{Lifecycle, LifecycleId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for lifecycle store operations.
pub type LifecycleStoreResult<T> = Result<T, LifecycleStoreError>;

/// Lifecycle persistence contract used by the lifecycle engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LifecycleStore: Send + Sync {
    /// Stages the lifecycle's status and `updated_at` for the next commit.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleStoreError::NotFound`] when the lifecycle does not
    /// exist.
    async fn update_lifecycle(&self, lifecycle: &Lifecycle) -> LifecycleStoreResult<()>;
}

/// Errors returned by lifecycle store implementations.
#[derive(Debug, Clone, Error)]
pub enum LifecycleStoreError {
    /// The lifecycle was not found.
    #[error("lifecycle not found: {0}")]
    NotFound(LifecycleId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LifecycleStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
