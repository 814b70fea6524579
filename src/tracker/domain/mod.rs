//! Domain model for project and task tracking.
//!
//! The tracker domain models project ownership, the task status state
//! machine, and the overdue rule while keeping all infrastructure
//! concerns outside of the domain boundary.

mod error;
mod ids;
mod project;
mod task;

pub use error::{ParseTaskKindError, ParseTaskStatusError, TrackerDomainError};
pub use ids::{ProjectId, TaskId};
pub use project::{NewProjectData, PersistedProjectData, Project};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskDetails, TaskKind, TaskStatus};
