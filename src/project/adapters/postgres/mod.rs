//! `PostgreSQL` adapters for project reconciliation persistence.

mod models;
mod storage;
mod schema;

pub use storage::{PostgresProjectStorage, ProjectPgPool};

#[cfg(test)]
pub(crate) use models::{ApplicationRow, LifecycleRow, ProjectRow};
#[cfg(test)]
pub(crate) use storage::{assemble_projects, expect_row};
