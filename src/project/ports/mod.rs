//! Port contracts for project lifecycle reconciliation.
//!
//! Ports define infrastructure-agnostic interfaces used by the lifecycle
//! engine. Writes are staged through the stores and flushed together by
//! [`UnitOfWork::commit`].

pub mod lifecycle_store;
pub mod project_store;
pub mod unit_of_work;

pub use lifecycle_store::{LifecycleStore, LifecycleStoreError, LifecycleStoreResult};
pub use project_store::{ProjectStore, ProjectStoreError, ProjectStoreResult};
pub use unit_of_work::{UnitOfWork, UnitOfWorkError, UnitOfWorkResult};

#[cfg(test)]
pub use lifecycle_store::MockLifecycleStore;
#[cfg(test)]
pub use project_store::MockProjectStore;
#[cfg(test)]
pub use unit_of_work::MockUnitOfWork;
