//! `PostgreSQL` storage implementing the reconciliation ports.
//!
//! Reads go straight to the database. Writes are staged in memory and
//! flushed in a single transaction by [`UnitOfWork::commit`].

use super::{
    models::{ApplicationRow, LifecycleRow, ProjectRow},
    schema::{freelancer_applications, project_lifecycles, projects},
};
use crate::project::{
    domain::{
        ApplicationId, ApplicationStatus, CategoryId, FreelancerApplication, Lifecycle,
        LifecycleId, Milestones, ParseApplicationStatusError, ParseProjectStatusError,
        PersistedLifecycleData, PersistedProjectData, Project, ProjectId, ProjectStatus, UserId,
    },
    ports::{
        LifecycleStore, LifecycleStoreError, LifecycleStoreResult, ProjectStore,
        ProjectStoreError, ProjectStoreResult, UnitOfWork, UnitOfWorkError, UnitOfWorkResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed storage for projects, lifecycles and applications.
#[derive(Debug, Clone)]
pub struct PostgresProjectStorage {
    pool: ProjectPgPool,
    pending: Arc<Mutex<PendingWrites>>,
}

#[derive(Debug, Default)]
struct PendingWrites {
    projects: HashMap<ProjectId, ProjectChange>,
    lifecycles: HashMap<LifecycleId, LifecycleChange>,
}

#[derive(Debug)]
struct ProjectChange {
    freelancer_id: Option<Uuid>,
    applications: Vec<(Uuid, &'static str)>,
}

#[derive(Debug)]
struct LifecycleChange {
    project_id: ProjectId,
    status: &'static str,
    updated_at: DateTime<Utc>,
}

/// Failure inside the commit transaction.
#[derive(Debug, Error)]
pub(crate) enum CommitError {
    #[error(transparent)]
    Database(#[from] DieselError),
    #[error("no row updated for project {0}")]
    MissingRow(ProjectId),
}

impl From<CommitError> for UnitOfWorkError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::Database(source) => Self::persistence(source),
            CommitError::MissingRow(project_id) => Self::StaleWrite(project_id),
        }
    }
}

/// Port errors that can wrap an infrastructure failure.
trait PersistenceFailure {
    fn from_source(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for ProjectStoreError {
    fn from_source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for LifecycleStoreError {
    fn from_source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for UnitOfWorkError {
    fn from_source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PostgresProjectStorage {
    /// Creates storage from a `PostgreSQL` connection pool.
    #[must_use]
    pub fn new(pool: ProjectPgPool) -> Self {
        Self {
            pool,
            pending: Arc::default(),
        }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_source)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_source)?
    }

    fn pending<E: PersistenceFailure>(&self) -> Result<MutexGuard<'_, PendingWrites>, E> {
        self.pending
            .lock()
            .map_err(|err| E::from_source(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl ProjectStore for PostgresProjectStorage {
    async fn list_eligible_projects(&self) -> ProjectStoreResult<Vec<Project>> {
        self.run_blocking(|connection| {
            let terminal: Vec<&'static str> = ProjectStatus::TERMINAL
                .iter()
                .map(|status| status.as_str())
                .collect();
            let lifecycle_rows = project_lifecycles::table
                .filter(project_lifecycles::status.ne_all(terminal))
                .select(LifecycleRow::as_select())
                .load::<LifecycleRow>(connection)
                .map_err(ProjectStoreError::persistence)?;
            let project_ids: Vec<Uuid> = lifecycle_rows.iter().map(|row| row.project_id).collect();

            let project_rows = projects::table
                .filter(projects::id.eq_any(project_ids.clone()))
                .order(projects::id.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectStoreError::persistence)?;
            let application_rows = freelancer_applications::table
                .filter(freelancer_applications::project_id.eq_any(project_ids))
                .order((
                    freelancer_applications::created_at.asc(),
                    freelancer_applications::id.asc(),
                ))
                .select(ApplicationRow::as_select())
                .load::<ApplicationRow>(connection)
                .map_err(ProjectStoreError::persistence)?;

            Ok(assemble_projects(
                project_rows,
                lifecycle_rows,
                application_rows,
            ))
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> ProjectStoreResult<()> {
        let change = ProjectChange {
            freelancer_id: project.freelancer_id().map(UserId::into_inner),
            applications: project
                .applications()
                .iter()
                .map(|application| {
                    (
                        application.id().into_inner(),
                        application.status().as_str(),
                    )
                })
                .collect(),
        };
        self.pending::<ProjectStoreError>()?
            .projects
            .insert(project.id(), change);
        Ok(())
    }
}

#[async_trait]
impl LifecycleStore for PostgresProjectStorage {
    async fn update_lifecycle(&self, lifecycle: &Lifecycle) -> LifecycleStoreResult<()> {
        let change = LifecycleChange {
            project_id: lifecycle.project_id(),
            status: lifecycle.status().as_str(),
            updated_at: lifecycle.updated_at(),
        };
        self.pending::<LifecycleStoreError>()?
            .lifecycles
            .insert(lifecycle.id(), change);
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PostgresProjectStorage {
    async fn commit(&self) -> UnitOfWorkResult<()> {
        let pending = std::mem::take(&mut *self.pending::<UnitOfWorkError>()?);
        if pending.projects.is_empty() && pending.lifecycles.is_empty() {
            return Ok(());
        }

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, CommitError, _>(|transaction| {
                    apply_pending(transaction, &pending)
                })
                .map_err(UnitOfWorkError::from)
        })
        .await
    }

    async fn rollback(&self) -> UnitOfWorkResult<()> {
        let discarded = std::mem::take(&mut *self.pending::<UnitOfWorkError>()?);
        tracing::debug!(
            projects = discarded.projects.len(),
            lifecycles = discarded.lifecycles.len(),
            "discarded staged project writes"
        );
        Ok(())
    }
}

fn apply_pending(connection: &mut PgConnection, pending: &PendingWrites) -> Result<(), CommitError> {
    for (project_id, change) in &pending.projects {
        let updated = diesel::update(projects::table.find(project_id.into_inner()))
            .set(projects::freelancer_id.eq(change.freelancer_id))
            .execute(connection)?;
        expect_row(updated, *project_id)?;
        for (application_id, status) in &change.applications {
            let updated = diesel::update(freelancer_applications::table.find(*application_id))
                .set(freelancer_applications::status.eq(*status))
                .execute(connection)?;
            expect_row(updated, *project_id)?;
        }
    }

    for (lifecycle_id, change) in &pending.lifecycles {
        let updated = diesel::update(project_lifecycles::table.find(lifecycle_id.into_inner()))
            .set((
                project_lifecycles::status.eq(change.status),
                project_lifecycles::updated_at.eq(change.updated_at),
            ))
            .execute(connection)?;
        expect_row(updated, change.project_id)?;
    }
    Ok(())
}

/// Fails the commit when an `UPDATE` matched no row of `project_id`.
pub(crate) const fn expect_row(updated: usize, project_id: ProjectId) -> Result<(), CommitError> {
    if updated == 0 {
        return Err(CommitError::MissingRow(project_id));
    }
    Ok(())
}

/// Builds project aggregates from the rows loaded for one listing.
///
/// Projects without a loaded lifecycle are left out. A project whose
/// lifecycle or application rows hold an unknown status is logged and left
/// out without affecting the rest of the listing.
pub(crate) fn assemble_projects(
    project_rows: Vec<ProjectRow>,
    lifecycle_rows: Vec<LifecycleRow>,
    application_rows: Vec<ApplicationRow>,
) -> Vec<Project> {
    let mut unreadable = HashSet::new();
    let mut lifecycles = HashMap::with_capacity(lifecycle_rows.len());
    for row in lifecycle_rows {
        let project_id = row.project_id;
        match row_to_lifecycle(row) {
            Ok(lifecycle) => {
                lifecycles.insert(project_id, lifecycle);
            }
            Err(err) => {
                skip_unreadable(project_id, &err);
                unreadable.insert(project_id);
            }
        }
    }

    let mut applications: HashMap<Uuid, Vec<FreelancerApplication>> = HashMap::new();
    for row in application_rows {
        let project_id = row.project_id;
        match row_to_application(row) {
            Ok(application) => applications.entry(project_id).or_default().push(application),
            Err(err) => {
                skip_unreadable(project_id, &err);
                unreadable.insert(project_id);
            }
        }
    }

    project_rows
        .into_iter()
        .filter(|row| !unreadable.contains(&row.id))
        .filter_map(|row| {
            let lifecycle = lifecycles.remove(&row.id)?;
            let project_applications = applications.remove(&row.id).unwrap_or_default();
            Some(row_to_project(row, lifecycle, project_applications))
        })
        .collect()
}

fn skip_unreadable(project_id: Uuid, err: &dyn std::error::Error) {
    tracing::warn!(
        project_id = %project_id,
        error = %err,
        "skipping project with unreadable rows"
    );
}

fn row_to_project(
    row: ProjectRow,
    lifecycle: Lifecycle,
    applications: Vec<FreelancerApplication>,
) -> Project {
    let ProjectRow {
        id,
        title,
        description,
        budget,
        category_id,
        employer_id,
        freelancer_id,
    } = row;

    Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        title,
        description,
        budget,
        category_id: CategoryId::from_uuid(category_id),
        employer_id: UserId::from_uuid(employer_id),
        freelancer_id: freelancer_id.map(UserId::from_uuid),
        lifecycle,
        applications,
    })
}

fn row_to_lifecycle(row: LifecycleRow) -> Result<Lifecycle, ParseProjectStatusError> {
    let status = ProjectStatus::try_from(row.status.as_str())?;
    Ok(Lifecycle::from_persisted(PersistedLifecycleData {
        id: LifecycleId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        status,
        milestones: Milestones::new(
            row.applications_start_date,
            row.applications_deadline,
            row.work_start_date,
            row.work_deadline,
        ),
        acceptance_confirmed: row.acceptance_confirmed,
        updated_at: row.updated_at,
    }))
}

fn row_to_application(
    row: ApplicationRow,
) -> Result<FreelancerApplication, ParseApplicationStatusError> {
    let status = ApplicationStatus::try_from(row.status.as_str())?;
    Ok(FreelancerApplication::from_persisted(
        ApplicationId::from_uuid(row.id),
        UserId::from_uuid(row.freelancer_id),
        status,
    ))
}
