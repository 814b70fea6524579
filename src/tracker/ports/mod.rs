//! Port contracts for project and task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker
//! services.

pub mod events;
pub mod notification;
pub mod repository;

pub use events::TaskCreatedListener;
pub use notification::{DEFAULT_OPERATOR_RECIPIENT, DispatchError, NotificationSink};
pub use repository::{
    ProjectRepository, TaskFilter, TaskRepository, TrackerRepositoryError, TrackerRepositoryResult,
};
