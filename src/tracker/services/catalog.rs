//! Service layer for project catalogue maintenance.

use crate::tracker::{
    domain::{NewProjectData, Project, ProjectId, TrackerDomainError},
    ports::{ProjectRepository, TrackerRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl CreateProjectRequest {
    /// Creates a request with required project fields.
    #[must_use]
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            description: None,
            start_date,
            end_date,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for project catalogue operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TrackerDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TrackerRepositoryError),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
}

/// Result type for project catalogue service operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Project catalogue orchestration service.
#[derive(Clone)]
pub struct ProjectCatalogService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<P, C> ProjectCatalogService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project catalogue service.
    #[must_use]
    pub const fn new(projects: Arc<P>, clock: Arc<C>) -> Self {
        Self { projects, clock }
    }

    async fn find_project_or_error(&self, id: ProjectId) -> CatalogResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProjectNotFound(id))
    }

    /// Creates and persists a new project.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when validation fails or the repository
    /// rejects persistence.
    pub async fn create_project(&self, request: CreateProjectRequest) -> CatalogResult<Project> {
        let project = Project::new(
            NewProjectData {
                name: request.name,
                description: request.description,
                start_date: request.start_date,
                end_date: request.end_date,
            },
            &*self.clock,
        )?;
        self.projects.store(&project).await?;
        Ok(project)
    }

    /// Retrieves a project by identifier.
    ///
    /// Returns `Ok(None)` when no project exists with the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when persistence lookup fails.
    pub async fn find_project(&self, id: ProjectId) -> CatalogResult<Option<Project>> {
        Ok(self.projects.find_by_id(id).await?)
    }

    /// Lists every project in name-ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when persistence lookup fails.
    pub async fn list_projects(&self) -> CatalogResult<Vec<Project>> {
        Ok(self.projects.list().await?)
    }

    /// Renames an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProjectNotFound`] when the project does
    /// not exist, or [`CatalogError::Domain`] when the new name is empty.
    pub async fn rename_project(
        &self,
        id: ProjectId,
        name: impl Into<String> + Send,
    ) -> CatalogResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        project.rename(name, &*self.clock)?;
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Replaces a project's planned start and end dates.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProjectNotFound`] when the project does
    /// not exist.
    pub async fn reschedule_project(
        &self,
        id: ProjectId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> CatalogResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        project.reschedule(start_date, end_date, &*self.clock);
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Deletes a project and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Repository`] when the project does not
    /// exist or deletion fails.
    pub async fn delete_project(&self, id: ProjectId) -> CatalogResult<()> {
        Ok(self.projects.delete(id).await?)
    }
}
