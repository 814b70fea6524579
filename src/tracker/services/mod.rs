//! Application services for project and task tracking.

mod catalog;
mod creation;
mod intake;
mod sweep;

pub use catalog::{CatalogError, CreateProjectRequest, ProjectCatalogService};
pub use creation::{CREATED_SUBJECT, CreationNotifier};
pub use intake::{
    CreateDesignTaskRequest, CreateDevelopmentTaskRequest, IntakeError, TaskIntakeService,
};
pub use sweep::{OVERDUE_SUBJECT, OverdueSweepService, SweepError, SweepReport};
