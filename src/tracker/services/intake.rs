//! Service layer for task intake and CRUD-facing task mutations.

use crate::tracker::{
    domain::{
        NewTaskData, ProjectId, Task, TaskDetails, TaskId, TaskStatus, TrackerDomainError,
    },
    ports::{ProjectRepository, TaskFilter, TaskRepository, TrackerRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a development task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDevelopmentTaskRequest {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    due_date: NaiveDate,
    language: String,
    framework: Option<String>,
}

impl CreateDevelopmentTaskRequest {
    /// Creates a request with required development task fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        due_date: NaiveDate,
        language: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            due_date,
            language: language.into(),
            framework: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the framework.
    #[must_use]
    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }
}

/// Request payload for creating a design task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDesignTaskRequest {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    due_date: NaiveDate,
    tool: String,
    file_format: Option<String>,
}

impl CreateDesignTaskRequest {
    /// Creates a request with required design task fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        due_date: NaiveDate,
        tool: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            due_date,
            tool: tool.into(),
            file_format: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the deliverable file format.
    #[must_use]
    pub fn with_file_format(mut self, file_format: impl Into<String>) -> Self {
        self.file_format = Some(file_format.into());
        self
    }
}

/// Service-level errors for task intake operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TrackerDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TrackerRepositoryError),
    /// The owning project does not exist.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// The task does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

/// Result type for task intake service operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Task intake orchestration service.
///
/// Creation goes through the task repository, whose write path emits the
/// created event consumed by the creation notifier.
#[derive(Clone)]
pub struct TaskIntakeService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<P, T, C> TaskIntakeService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task intake service.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            projects,
            tasks,
            clock,
        }
    }

    async fn create_task(
        &self,
        project_id: ProjectId,
        title: String,
        description: Option<String>,
        due_date: NaiveDate,
        details: TaskDetails,
    ) -> IntakeResult<Task> {
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(IntakeError::ProjectNotFound(project_id));
        }
        let task = Task::new(
            NewTaskData {
                project_id,
                title,
                description,
                due_date,
                details,
            },
            &*self.clock,
        )?;
        self.tasks.store(&task).await?;
        Ok(task)
    }

    async fn find_task_or_error(&self, id: TaskId) -> IntakeResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(IntakeError::TaskNotFound(id))
    }

    /// Creates a development task under an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`] when the project does not exist, input
    /// validation fails, or the repository rejects persistence.
    pub async fn create_development_task(
        &self,
        request: CreateDevelopmentTaskRequest,
    ) -> IntakeResult<Task> {
        let details = TaskDetails::development(request.language, request.framework)?;
        self.create_task(
            request.project_id,
            request.title,
            request.description,
            request.due_date,
            details,
        )
        .await
    }

    /// Creates a design task under an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`] when the project does not exist, input
    /// validation fails, or the repository rejects persistence.
    pub async fn create_design_task(&self, request: CreateDesignTaskRequest) -> IntakeResult<Task> {
        let details = TaskDetails::design(request.tool, request.file_format)?;
        self.create_task(
            request.project_id,
            request.title,
            request.description,
            request.due_date,
            details,
        )
        .await
    }

    /// Sets a task's lifecycle status. This is the manual correction path
    /// out of `overdue`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn update_status(&self, id: TaskId, status: TaskStatus) -> IntakeResult<Task> {
        let mut task = self.find_task_or_error(id).await?;
        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Replaces a task's due date. Does not revisit the status: a task
    /// already marked `overdue` stays `overdue` even when the new date
    /// lies in the future.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn reschedule_task(&self, id: TaskId, due_date: NaiveDate) -> IntakeResult<Task> {
        let mut task = self.find_task_or_error(id).await?;
        task.reschedule(due_date, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no task exists with the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Repository`] when persistence lookup fails.
    pub async fn find_task(&self, id: TaskId) -> IntakeResult<Option<Task>> {
        Ok(self.tasks.find_by_id(id).await?)
    }

    /// Lists tasks matching the filter in due-date ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Repository`] when persistence lookup fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> IntakeResult<Vec<Task>> {
        Ok(self.tasks.list(filter).await?)
    }
}
