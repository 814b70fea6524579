//! Creation event port.
//!
//! Repositories emit a created event from their write path once per
//! newly inserted task, never on updates. Listener failure is reported by
//! the emitting repository and does not fail the insert.

use crate::tracker::domain::Task;
use crate::tracker::ports::DispatchError;
use async_trait::async_trait;

/// Port consuming task creation events.
#[async_trait]
pub trait TaskCreatedListener: Send + Sync {
    /// Handles a newly inserted task.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the listener's side effect (for
    /// example a notification send) fails. The emitting repository logs
    /// the failure; the insert stands.
    async fn task_created(&self, task: &Task) -> Result<(), DispatchError>;
}
