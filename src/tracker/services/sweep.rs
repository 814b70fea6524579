//! Periodic overdue sweep over both task subtypes.
//!
//! The sweep is the one automated status transition in the tracker. An
//! external trigger (timer thread, cron, orchestrator) invokes it once
//! per tick; the selection predicate is idempotent, so an aborted sweep
//! is simply retried on the next tick.

use crate::tracker::{
    domain::{Task, TaskId, TaskKind, TaskStatus},
    ports::{DEFAULT_OPERATOR_RECIPIENT, NotificationSink, TaskRepository, TrackerRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Subject line for overdue notifications.
pub const OVERDUE_SUBJECT: &str = "Task Overdue Notification";

/// Outcome of one sweep invocation, separated by task subtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Development tasks transitioned to `overdue`.
    pub development: usize,
    /// Design tasks transitioned to `overdue`.
    pub design: usize,
    /// Notifications that failed to dispatch. The transitions behind
    /// them stand.
    pub dispatch_failures: usize,
}

impl SweepReport {
    /// Total tasks transitioned across both subtypes.
    #[must_use]
    pub const fn transitioned(&self) -> usize {
        self.development + self.design
    }
}

/// Errors aborting a sweep invocation.
///
/// A store failure abandons the remaining batch; the next scheduled tick
/// retries safely. Dispatch failures are NOT errors here, they are
/// counted in the [`SweepReport`].
#[derive(Debug, Error)]
pub enum SweepError {
    /// Persistence failed while reading candidates or writing the bulk
    /// transition.
    #[error(transparent)]
    Repository(#[from] TrackerRepositoryError),
}

/// Result type for sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Overdue sweep orchestration service.
#[derive(Clone)]
pub struct OverdueSweepService<T, N, C>
where
    T: TaskRepository,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    sink: Arc<N>,
    clock: Arc<C>,
    recipient: String,
}

impl<T, N, C> OverdueSweepService<T, N, C>
where
    T: TaskRepository,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    /// Creates a sweep service notifying the default operator address.
    #[must_use]
    pub fn new(tasks: Arc<T>, sink: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            sink,
            clock,
            recipient: DEFAULT_OPERATOR_RECIPIENT.to_owned(),
        }
    }

    /// Overrides the notification recipient.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Runs one sweep using the injected clock's current date.
    ///
    /// This is the entry point for the external scheduled trigger.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when persistence fails; see [`Self::sweep`].
    pub async fn run(&self) -> SweepResult<SweepReport> {
        self.sweep(self.clock.utc().date_naive()).await
    }

    /// Transitions every open task due strictly before `today` to
    /// `overdue` and sends one notification per transitioned task.
    ///
    /// Calling sweep again with no intervening mutations transitions
    /// zero tasks and sends zero notifications: transitioned tasks no
    /// longer match the selection predicate.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Repository`] when the candidate read or the
    /// bulk transition fails. The remaining batch is abandoned for the
    /// next tick to retry.
    pub async fn sweep(&self, today: NaiveDate) -> SweepResult<SweepReport> {
        let mut report = SweepReport::default();
        for kind in TaskKind::ALL {
            let transitioned = self.transition_kind(kind, today).await?;
            match kind {
                TaskKind::Development => report.development += transitioned.len(),
                TaskKind::Design => report.design += transitioned.len(),
            }
            for task in &transitioned {
                if let Err(err) = self.notify_overdue(task).await {
                    report.dispatch_failures += 1;
                    tracing::warn!(
                        task_id = %task.id(),
                        title = task.title(),
                        error = %err,
                        "overdue notification dispatch failed"
                    );
                }
            }
        }
        tracing::info!(
            development = report.development,
            design = report.design,
            dispatch_failures = report.dispatch_failures,
            "overdue sweep completed"
        );
        Ok(report)
    }

    /// Selects and transitions one subtype's overdue candidates.
    ///
    /// Selection and transition are scoped into a single conditional
    /// bulk update, so a concurrent sweep or CRUD write racing this one
    /// cannot cause a task to be transitioned and notified twice.
    async fn transition_kind(&self, kind: TaskKind, today: NaiveDate) -> SweepResult<Vec<Task>> {
        let candidates = self.tasks.find_overdue_candidates(kind, today).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<TaskId> = candidates.iter().map(Task::id).collect();
        let transitioned = self
            .tasks
            .bulk_set_status(&ids, &TaskStatus::OPEN, TaskStatus::Overdue, self.clock.utc())
            .await?;
        Ok(transitioned)
    }

    async fn notify_overdue(&self, task: &Task) -> Result<(), crate::tracker::ports::DispatchError> {
        let body = format!("Task \"{}\" is overdue!", task.title());
        self.sink.send(OVERDUE_SUBJECT, &body, &self.recipient).await
    }
}
