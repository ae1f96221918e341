//! Diesel row models for project lifecycle persistence.

use super::schema::{freelancer_applications, project_lifecycles, projects};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Project title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Fixed-point budget.
    pub budget: Decimal,
    /// Category reference.
    pub category_id: uuid::Uuid,
    /// Employer who posted the project.
    pub employer_id: uuid::Uuid,
    /// Selected freelancer, if any.
    pub freelancer_id: Option<uuid::Uuid>,
}

/// Query result row for lifecycle records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = project_lifecycles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LifecycleRow {
    /// Lifecycle identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// When applications open.
    pub applications_start_date: DateTime<Utc>,
    /// When applications close.
    pub applications_deadline: DateTime<Utc>,
    /// When work is due to start.
    pub work_start_date: DateTime<Utc>,
    /// When work is due to be delivered.
    pub work_deadline: DateTime<Utc>,
    /// External confirmation that the deliverable was accepted.
    pub acceptance_confirmed: bool,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for freelancer applications.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = freelancer_applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    /// Application identifier.
    pub id: uuid::Uuid,
    /// Project applied to.
    pub project_id: uuid::Uuid,
    /// Applying freelancer.
    pub freelancer_id: uuid::Uuid,
    /// Application status.
    pub status: String,
}
