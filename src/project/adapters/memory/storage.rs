//! In-memory project storage for reconciliation tests and local tooling.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::project::{
    domain::{FreelancerApplication, Lifecycle, PersistedProjectData, Project, ProjectId, UserId},
    ports::{
        LifecycleStore, LifecycleStoreError, LifecycleStoreResult, ProjectStore,
        ProjectStoreError, ProjectStoreResult, UnitOfWork, UnitOfWorkError, UnitOfWorkResult,
    },
};

/// Thread-safe in-memory storage implementing every reconciliation port.
///
/// Store updates are staged and only become visible to readers after
/// [`UnitOfWork::commit`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStorage {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: BTreeMap<ProjectId, Project>,
    staged_projects: HashMap<ProjectId, StagedProject>,
    staged_lifecycles: HashMap<ProjectId, Lifecycle>,
    commits: usize,
}

#[derive(Debug, Clone)]
struct StagedProject {
    freelancer_id: Option<UserId>,
    applications: Vec<FreelancerApplication>,
}

/// Error raised when the storage lock has been poisoned by a panicking writer.
fn poisoned(err: &impl ToString) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

impl InMemoryProjectStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, InMemoryProjectState>, std::io::Error> {
        self.state.read().map_err(|err| poisoned(&err))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InMemoryProjectState>, std::io::Error> {
        self.state.write().map_err(|err| poisoned(&err))
    }

    /// Inserts a committed project, bypassing the staging area.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::DuplicateProject`] when a project with
    /// the same identifier already exists.
    pub fn insert(&self, project: Project) -> ProjectStoreResult<()> {
        let mut state = self.write().map_err(ProjectStoreError::persistence)?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectStoreError::DuplicateProject(project.id()));
        }
        state.projects.insert(project.id(), project);
        Ok(())
    }

    /// Returns the committed state of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::Persistence`] when the storage lock is
    /// poisoned.
    pub fn find(&self, id: ProjectId) -> ProjectStoreResult<Option<Project>> {
        let state = self.read().map_err(ProjectStoreError::persistence)?;
        Ok(state.projects.get(&id).cloned())
    }

    /// Removes a committed project, returning it when it existed.
    ///
    /// Staged writes for the project are kept and fail the next commit.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::Persistence`] when the storage lock is
    /// poisoned.
    pub fn remove(&self, id: ProjectId) -> ProjectStoreResult<Option<Project>> {
        let mut state = self.write().map_err(ProjectStoreError::persistence)?;
        Ok(state.projects.remove(&id))
    }

    /// Returns the number of staged project and lifecycle writes.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::Persistence`] when the storage lock is
    /// poisoned.
    pub fn pending_writes(&self) -> ProjectStoreResult<usize> {
        let state = self.read().map_err(ProjectStoreError::persistence)?;
        Ok(state.staged_projects.len() + state.staged_lifecycles.len())
    }

    /// Returns how many commits have been applied.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::Persistence`] when the storage lock is
    /// poisoned.
    pub fn commit_count(&self) -> ProjectStoreResult<usize> {
        let state = self.read().map_err(ProjectStoreError::persistence)?;
        Ok(state.commits)
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStorage {
    async fn list_eligible_projects(&self) -> ProjectStoreResult<Vec<Project>> {
        let state = self.read().map_err(ProjectStoreError::persistence)?;
        Ok(state
            .projects
            .values()
            .filter(|project| !project.status().is_terminal())
            .cloned()
            .collect())
    }

    async fn update_project(&self, project: &Project) -> ProjectStoreResult<()> {
        let mut state = self.write().map_err(ProjectStoreError::persistence)?;
        if !state.projects.contains_key(&project.id()) {
            return Err(ProjectStoreError::NotFound(project.id()));
        }
        state.staged_projects.insert(
            project.id(),
            StagedProject {
                freelancer_id: project.freelancer_id(),
                applications: project.applications().to_vec(),
            },
        );
        Ok(())
    }
}

#[async_trait]
impl LifecycleStore for InMemoryProjectStorage {
    async fn update_lifecycle(&self, lifecycle: &Lifecycle) -> LifecycleStoreResult<()> {
        let mut state = self.write().map_err(LifecycleStoreError::persistence)?;
        let known = state
            .projects
            .get(&lifecycle.project_id())
            .is_some_and(|project| project.lifecycle().id() == lifecycle.id());
        if !known {
            return Err(LifecycleStoreError::NotFound(lifecycle.id()));
        }
        state
            .staged_lifecycles
            .insert(lifecycle.project_id(), lifecycle.clone());
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryProjectStorage {
    async fn commit(&self) -> UnitOfWorkResult<()> {
        let mut state = self.write().map_err(UnitOfWorkError::persistence)?;

        // Validate every staged write before applying any of them.
        let missing = state
            .staged_projects
            .keys()
            .chain(state.staged_lifecycles.keys())
            .find(|id| !state.projects.contains_key(*id))
            .copied();
        if let Some(project_id) = missing {
            state.staged_projects.clear();
            state.staged_lifecycles.clear();
            return Err(UnitOfWorkError::StaleWrite(project_id));
        }

        let staged_projects = std::mem::take(&mut state.staged_projects);
        let staged_lifecycles = std::mem::take(&mut state.staged_lifecycles);
        for (project_id, staged) in staged_projects {
            replace_project(&mut state.projects, project_id, |data| {
                data.freelancer_id = staged.freelancer_id;
                data.applications = staged.applications;
            });
        }
        for (project_id, lifecycle) in staged_lifecycles {
            replace_project(&mut state.projects, project_id, |data| {
                data.lifecycle = lifecycle;
            });
        }
        state.commits += 1;
        Ok(())
    }

    async fn rollback(&self) -> UnitOfWorkResult<()> {
        let mut state = self.write().map_err(UnitOfWorkError::persistence)?;
        state.staged_projects.clear();
        state.staged_lifecycles.clear();
        Ok(())
    }
}

/// Rebuilds a stored project after applying `change` to its persisted form.
fn replace_project(
    projects: &mut BTreeMap<ProjectId, Project>,
    project_id: ProjectId,
    change: impl FnOnce(&mut PersistedProjectData),
) {
    if let Some(project) = projects.remove(&project_id) {
        let mut data = project.into_persisted();
        change(&mut data);
        projects.insert(project_id, Project::from_persisted(data));
    }
}
