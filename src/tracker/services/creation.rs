//! Creation notifier fired once per newly persisted task.

use crate::tracker::{
    domain::Task,
    ports::{
        DEFAULT_OPERATOR_RECIPIENT, DispatchError, NotificationSink, ProjectRepository,
        TaskCreatedListener,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Subject line for task creation notifications.
pub const CREATED_SUBJECT: &str = "New Task Created";

/// Listener sending one notification per task creation event.
///
/// Register it with the store via
/// [`TaskRepository::on_created`](crate::tracker::ports::TaskRepository::on_created);
/// the store's write path fires it on initial inserts only, never on
/// updates.
#[derive(Clone)]
pub struct CreationNotifier<P, N>
where
    P: ProjectRepository,
    N: NotificationSink,
{
    projects: Arc<P>,
    sink: Arc<N>,
    recipient: String,
}

impl<P, N> CreationNotifier<P, N>
where
    P: ProjectRepository,
    N: NotificationSink,
{
    /// Creates a notifier addressing the default operator address.
    #[must_use]
    pub fn new(projects: Arc<P>, sink: Arc<N>) -> Self {
        Self {
            projects,
            sink,
            recipient: DEFAULT_OPERATOR_RECIPIENT.to_owned(),
        }
    }

    /// Overrides the notification recipient.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }
}

#[async_trait]
impl<P, N> TaskCreatedListener for CreationNotifier<P, N>
where
    P: ProjectRepository,
    N: NotificationSink,
{
    async fn task_created(&self, task: &Task) -> Result<(), DispatchError> {
        let project = self
            .projects
            .find_by_id(task.project_id())
            .await
            .map_err(DispatchError::new)?
            .ok_or_else(|| {
                DispatchError::message(format!("owning project {} not found", task.project_id()))
            })?;
        let body = format!(
            "Task \"{}\" was created in project \"{}\"",
            task.title(),
            project.name()
        );
        self.sink.send(CREATED_SUBJECT, &body, &self.recipient).await
    }
}
