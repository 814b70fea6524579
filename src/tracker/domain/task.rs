//! Task aggregate root and the status state machine.

use super::{ParseTaskKindError, ParseTaskStatusError, ProjectId, TaskId, TrackerDomainError};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// Transitions are externally driven: CRUD updates may set any status,
/// and the overdue sweep performs the single automated transition from an
/// open status to [`TaskStatus::Overdue`]. No transition out of
/// `Overdue` is defined by the sweep; manual correction is the recovery
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished. Terminal with respect to the sweep.
    Done,
    /// The due date passed while the task was still open.
    Overdue,
}

impl TaskStatus {
    /// Statuses the sweep may transition to [`TaskStatus::Overdue`].
    pub const OPEN: [Self; 2] = [Self::Todo, Self::InProgress];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Overdue => "overdue",
        }
    }

    /// Returns `true` when the status is still open to the sweep, that
    /// is, `todo` or `in_progress`.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Todo | Self::InProgress)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "overdue" => Ok(Self::Overdue),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task subtype discriminant, derivable from [`TaskDetails`] and stored
/// alongside it for filtered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// A development task carrying language and framework fields.
    Development,
    /// A design task carrying tool and file-format fields.
    Design,
}

impl TaskKind {
    /// Both subtypes, in sweep processing order.
    pub const ALL: [Self; 2] = [Self::Development, Self::Design];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Design => "design",
        }
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "development" => Ok(Self::Development),
            "design" => Ok(Self::Design),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}

/// Subtype-specific task payload.
///
/// The two task subtypes share the common task shape and differ only in
/// this tagged payload, so the sweep and notifier operate purely against
/// the shared interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskDetails {
    /// Development task payload.
    Development {
        /// Implementation language.
        language: String,
        /// Optional framework.
        framework: Option<String>,
    },
    /// Design task payload.
    Design {
        /// Design tool.
        tool: String,
        /// Optional deliverable file format.
        file_format: Option<String>,
    },
}

impl TaskDetails {
    /// Creates a validated development payload.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyLanguage`] when the language is
    /// empty after trimming.
    pub fn development(
        language: impl Into<String>,
        framework: Option<String>,
    ) -> Result<Self, TrackerDomainError> {
        let language = language.into().trim().to_owned();
        if language.is_empty() {
            return Err(TrackerDomainError::EmptyLanguage);
        }
        Ok(Self::Development {
            language,
            framework,
        })
    }

    /// Creates a validated design payload.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyTool`] when the tool is empty
    /// after trimming.
    pub fn design(
        tool: impl Into<String>,
        file_format: Option<String>,
    ) -> Result<Self, TrackerDomainError> {
        let tool = tool.into().trim().to_owned();
        if tool.is_empty() {
            return Err(TrackerDomainError::EmptyTool);
        }
        Ok(Self::Design { tool, file_format })
    }

    /// Returns the subtype discriminant for this payload.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Development { .. } => TaskKind::Development,
            Self::Design { .. } => TaskKind::Design,
        }
    }
}

/// Fields required to create a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Calendar date the task is due.
    pub due_date: NaiveDate,
    /// Subtype payload.
    pub details: TaskDetails,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted due date.
    pub due_date: NaiveDate,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted subtype payload.
    pub details: TaskDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root, shared by both subtypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    due_date: NaiveDate,
    status: TaskStatus,
    details: TaskDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in [`TaskStatus::Todo`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyTaskTitle`] when the title is
    /// empty after trimming.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, TrackerDomainError> {
        let title = data.title.trim().to_owned();
        if title.is_empty() {
            return Err(TrackerDomainError::EmptyTaskTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            project_id: data.project_id,
            title,
            description: data.description,
            due_date: data.due_date,
            status: TaskStatus::Todo,
            details: data.details,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            status: data.status,
            details: data.details,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the subtype payload.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the subtype discriminant.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.details.kind()
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

    /// Returns `true` when the sweep should transition this task on the
    /// given day: the status is still open and the due date is strictly
    /// in the past. A `done` task never qualifies.
    #[must_use]
    pub fn is_overdue_candidate(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date < today
    }

    /// Sets the lifecycle status. CRUD updates may move a task to any
    /// status, including out of `overdue`.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.set_status_at(status, clock.utc());
    }

    /// Sets the lifecycle status with an explicit mutation timestamp.
    ///
    /// Used by repository bulk updates, where the caller supplies one
    /// timestamp for the whole batch.
    pub fn set_status_at(&mut self, status: TaskStatus, timestamp: DateTime<Utc>) {
        self.status = status;
        self.updated_at = timestamp;
    }

    /// Replaces the due date.
    ///
    /// Rescheduling does not revisit the status: a task already marked
    /// `overdue` stays `overdue` even when the new due date lies in the
    /// future. Use [`Task::set_status`] to correct it.
    pub fn reschedule(&mut self, due_date: NaiveDate, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
