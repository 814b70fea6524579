//! Project aggregate root.

use super::{ProjectId, TrackerDomainError};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Fields required to create a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectData {
    /// Human-readable project name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Planned start date.
    pub start_date: NaiveDate,
    /// Planned end date. Expected to be on or after `start_date`, but not
    /// enforced.
    pub end_date: NaiveDate,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted project name.
    pub name: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted start date.
    pub start_date: NaiveDate,
    /// Persisted end date.
    pub end_date: NaiveDate,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Project aggregate root. Owns zero or more tasks of either subtype;
/// deleting a project cascades to its tasks at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyProjectName`] when the name is
    /// empty after trimming.
    pub fn new(data: NewProjectData, clock: &impl Clock) -> Result<Self, TrackerDomainError> {
        let name = data.name.trim().to_owned();
        if name.is_empty() {
            return Err(TrackerDomainError::EmptyProjectName);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name,
            description: data.description,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the planned start date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the planned end date.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyProjectName`] when the new name
    /// is empty after trimming.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TrackerDomainError> {
        let trimmed = name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(TrackerDomainError::EmptyProjectName);
        }
        self.name = trimmed;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the planned start and end dates.
    pub fn reschedule(&mut self, start_date: NaiveDate, end_date: NaiveDate, clock: &impl Clock) {
        self.start_date = start_date;
        self.end_date = end_date;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
