//! Application services for project lifecycle reconciliation.

mod engine;
mod report;
mod scheduler;

pub use engine::{LifecycleEngineError, LifecycleEngineResult, LifecycleStatusEngine};
pub use report::{ReconciliationReport, SkipReason, SkippedProject, StatusChange};
pub use scheduler::{ReconciliationScheduler, RunOutcome};
