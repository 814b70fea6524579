//! Repository ports for project and task persistence.

use crate::tracker::domain::{Project, ProjectId, Task, TaskId, TaskKind, TaskStatus};
use crate::tracker::ports::events::TaskCreatedListener;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracker repository operations.
pub type TrackerRepositoryResult<T> = Result<T, TrackerRepositoryError>;

/// Query filter for task listings.
///
/// All criteria are conjunctive; an empty filter matches every task.
/// Listings are returned in due-date ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to one lifecycle status.
    pub status: Option<TaskStatus>,
    /// Restrict to one subtype.
    pub kind: Option<TaskKind>,
    /// Restrict to tasks owned by one project.
    pub project: Option<ProjectId>,
    /// Restrict to tasks due on an exact date.
    pub due_date: Option<NaiveDate>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
}

impl TaskFilter {
    /// Creates an empty filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to one lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to one subtype.
    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts the filter to one owning project.
    #[must_use]
    pub const fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Restricts the filter to an exact due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Adds a case-insensitive free-text search term.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::DuplicateProject`] when the
    /// identifier already exists.
    async fn store(&self, project: &Project) -> TrackerRepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::ProjectNotFound`] when the
    /// project does not exist.
    async fn update(&self, project: &Project) -> TrackerRepositoryResult<()>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> TrackerRepositoryResult<Option<Project>>;

    /// Returns all projects in name-ascending order.
    async fn list(&self) -> TrackerRepositoryResult<Vec<Project>>;

    /// Deletes a project and every task that references it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::ProjectNotFound`] when the
    /// project does not exist.
    async fn delete(&self, id: ProjectId) -> TrackerRepositoryResult<()>;
}

/// Task persistence contract shared by both subtypes.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and emits one created event to every registered
    /// listener. Updates never emit.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::DuplicateTask`] when the
    /// identifier already exists.
    async fn store(&self, task: &Task) -> TrackerRepositoryResult<()>;

    /// Persists changes to an existing task (status, due date,
    /// timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::TaskNotFound`] when the task
    /// does not exist.
    async fn update(&self, task: &Task) -> TrackerRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TrackerRepositoryResult<Option<Task>>;

    /// Returns tasks matching the filter in due-date ascending order.
    async fn list(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>>;

    /// Returns tasks of the given subtype with an open status and a due
    /// date strictly before `before`, in due-date ascending order.
    async fn find_overdue_candidates(
        &self,
        kind: TaskKind,
        before: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<Task>>;

    /// Conditionally moves the given tasks to `status`, refreshing their
    /// `updated_at` to `timestamp`, and returns the tasks actually
    /// transitioned.
    ///
    /// Each row is updated only when its current status is still in
    /// `only_from`; rows that no longer match are skipped, which is what
    /// keeps overlapping sweeps from transitioning or notifying the same
    /// task twice.
    async fn bulk_set_status(
        &self,
        ids: &[TaskId],
        only_from: &[TaskStatus],
        status: TaskStatus,
        timestamp: DateTime<Utc>,
    ) -> TrackerRepositoryResult<Vec<Task>>;

    /// Registers a listener for task creation events.
    fn on_created(&self, listener: Arc<dyn TaskCreatedListener>);
}

/// Errors returned by tracker repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
