//! Thread-safe in-memory project and task store.
//!
//! Projects and tasks share one state block so that project deletion can
//! cascade to owned tasks under a single lock.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::tracker::{
    domain::{Project, ProjectId, Task, TaskId, TaskKind, TaskStatus},
    ports::{
        ProjectRepository, TaskCreatedListener, TaskFilter, TaskRepository,
        TrackerRepositoryError, TrackerRepositoryResult,
    },
};

/// Thread-safe in-memory tracker store implementing both repository
/// ports.
#[derive(Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<TrackerState>>,
    listeners: Arc<RwLock<Vec<Arc<dyn TaskCreatedListener>>>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTrackerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> TrackerRepositoryResult<std::sync::RwLockReadGuard<'_, TrackerState>> {
        self.state.read().map_err(|err| {
            TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> TrackerRepositoryResult<std::sync::RwLockWriteGuard<'_, TrackerState>> {
        self.state.write().map_err(|err| {
            TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Delivers one created event per registered listener. Listener
    /// failures are reported and do not fail the triggering insert.
    async fn emit_created(&self, task: &Task) {
        let listeners: Vec<Arc<dyn TaskCreatedListener>> = match self.listeners.read() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        for listener in listeners {
            if let Err(err) = listener.task_created(task).await {
                tracing::warn!(task_id = %task.id(), error = %err, "task creation event handler failed");
            }
        }
    }
}

/// Returns `true` when the task matches every criterion in the filter.
fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    if filter.status.is_some_and(|status| task.status() != status) {
        return false;
    }
    if filter.kind.is_some_and(|kind| task.kind() != kind) {
        return false;
    }
    if filter.project.is_some_and(|project| task.project_id() != project) {
        return false;
    }
    if filter.due_date.is_some_and(|due| task.due_date() != due) {
        return false;
    }
    if let Some(term) = &filter.search {
        let needle = term.to_lowercase();
        let in_title = task.title().to_lowercase().contains(&needle);
        let in_description = task
            .description()
            .is_some_and(|text| text.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }
    true
}

/// Sorts tasks into the default listing order: due date ascending, with
/// creation time as the tie-breaker.
fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| (task.due_date(), task.created_at()));
}

#[async_trait]
impl ProjectRepository for InMemoryTrackerStore {
    async fn store(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.projects.contains_key(&project.id()) {
            return Err(TrackerRepositoryError::DuplicateProject(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let mut state = self.write_state()?;
        if !state.projects.contains_key(&project.id()) {
            return Err(TrackerRepositoryError::ProjectNotFound(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> TrackerRepositoryResult<Option<Project>> {
        let state = self.read_state()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list(&self) -> TrackerRepositoryResult<Vec<Project>> {
        let state = self.read_state()?;
        let mut projects: Vec<Project> = state.projects.values().cloned().collect();
        projects.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(projects)
    }

    async fn delete(&self, id: ProjectId) -> TrackerRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.projects.remove(&id).is_none() {
            return Err(TrackerRepositoryError::ProjectNotFound(id));
        }
        state.tasks.retain(|_, task| task.project_id() != id);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTrackerStore {
    async fn store(&self, task: &Task) -> TrackerRepositoryResult<()> {
        {
            let mut state = self.write_state()?;
            if state.tasks.contains_key(&task.id()) {
                return Err(TrackerRepositoryError::DuplicateTask(task.id()));
            }
            state.tasks.insert(task.id(), task.clone());
        }
        // Emitted only on initial insert; updates go through `update`.
        self.emit_created(task).await;
        Ok(())
    }

    async fn update(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let mut state = self.write_state()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TrackerRepositoryError::TaskNotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TrackerRepositoryResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches_filter(task, filter))
            .cloned()
            .collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn find_overdue_candidates(
        &self,
        kind: TaskKind,
        before: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| {
                task.kind() == kind && task.status().is_open() && task.due_date() < before
            })
            .cloned()
            .collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn bulk_set_status(
        &self,
        ids: &[TaskId],
        only_from: &[TaskStatus],
        status: TaskStatus,
        timestamp: DateTime<Utc>,
    ) -> TrackerRepositoryResult<Vec<Task>> {
        let mut state = self.write_state()?;
        let mut transitioned = Vec::new();
        for id in ids {
            let Some(task) = state.tasks.get_mut(id) else {
                continue;
            };
            if !only_from.contains(&task.status()) {
                continue;
            }
            task.set_status_at(status, timestamp);
            transitioned.push(task.clone());
        }
        sort_tasks(&mut transitioned);
        Ok(transitioned)
    }

    fn on_created(&self, listener: Arc<dyn TaskCreatedListener>) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(listener);
        }
    }
}
