//! End-to-end tracker flow through the public API: project creation,
//! task intake with creation notification, overdue sweep, and cascade
//! deletion, all against the in-memory adapters.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use gantt::tracker::{
    adapters::memory::{InMemoryMailbox, InMemoryTrackerStore, OutboundMessage},
    domain::TaskStatus,
    ports::{TaskFilter, TaskRepository},
    services::{
        CREATED_SUBJECT, CreateDevelopmentTaskRequest, CreateProjectRequest, CreationNotifier,
        OVERDUE_SUBJECT, OverdueSweepService, ProjectCatalogService, TaskIntakeService,
    },
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct World {
    mailbox: Arc<InMemoryMailbox>,
    catalog: ProjectCatalogService<InMemoryTrackerStore, DefaultClock>,
    intake: TaskIntakeService<InMemoryTrackerStore, InMemoryTrackerStore, DefaultClock>,
    sweep: OverdueSweepService<InMemoryTrackerStore, InMemoryMailbox, DefaultClock>,
}

#[fixture]
fn world() -> World {
    let store = Arc::new(InMemoryTrackerStore::new());
    let mailbox = Arc::new(InMemoryMailbox::new());
    let clock = Arc::new(DefaultClock);

    let notifier = CreationNotifier::new(store.clone(), mailbox.clone());
    store.on_created(Arc::new(notifier));

    World {
        catalog: ProjectCatalogService::new(store.clone(), clock.clone()),
        intake: TaskIntakeService::new(store.clone(), store.clone(), clock.clone()),
        sweep: OverdueSweepService::new(store, mailbox.clone(), clock),
        mailbox,
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Asserts exactly one message with the expected subject was delivered.
///
/// # Errors
///
/// Returns an error if the outbox does not contain exactly one message
/// carrying `subject`.
fn assert_single_message(outbox: &[OutboundMessage], subject: &str) -> Result<(), eyre::Report> {
    eyre::ensure!(
        outbox.len() == 1,
        "expected exactly one message, found {}",
        outbox.len()
    );
    let message = outbox
        .first()
        .ok_or_else(|| eyre::eyre!("expected at least one message"))?;
    eyre::ensure!(
        message.subject == subject,
        "unexpected subject: {}",
        message.subject
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_from_creation_to_overdue_notification(
    world: World,
) -> Result<(), eyre::Report> {
    let project = world
        .catalog
        .create_project(CreateProjectRequest::new(
            "Test Project",
            today(),
            today() + Duration::days(10),
        ))
        .await
        .expect("project creation should succeed");

    let task = world
        .intake
        .create_development_task(CreateDevelopmentTaskRequest::new(
            project.id(),
            "Dev Task",
            today() - Duration::days(1),
            "Python",
        ))
        .await
        .expect("task creation should succeed");

    assert_single_message(&world.mailbox.outbox(), CREATED_SUBJECT)?;

    let report = world
        .sweep
        .sweep(today())
        .await
        .expect("sweep should succeed");
    assert_eq!(report.transitioned(), 1);

    let swept = world
        .intake
        .find_task(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(swept.status(), TaskStatus::Overdue);
    assert!(swept.updated_at() > swept.created_at());

    let overdue_messages: Vec<_> = world
        .mailbox
        .outbox()
        .into_iter()
        .filter(|message| message.subject == OVERDUE_SUBJECT)
        .collect();
    assert_single_message(&overdue_messages, OVERDUE_SUBJECT)?;
    let overdue = overdue_messages
        .first()
        .ok_or_else(|| eyre::eyre!("expected an overdue message"))?;
    eyre::ensure!(
        overdue.body.contains("Dev Task"),
        "body missing task title: {}",
        overdue.body
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_leaves_no_orphaned_tasks(world: World) {
    let project = world
        .catalog
        .create_project(CreateProjectRequest::new(
            "Doomed Project",
            today(),
            today() + Duration::days(10),
        ))
        .await
        .expect("project creation should succeed");
    for title in ["First", "Second"] {
        world
            .intake
            .create_development_task(CreateDevelopmentTaskRequest::new(
                project.id(),
                title,
                today() + Duration::days(3),
                "Rust",
            ))
            .await
            .expect("task creation should succeed");
    }

    world
        .catalog
        .delete_project(project.id())
        .await
        .expect("deletion should succeed");

    let remaining = world
        .intake
        .list_tasks(&TaskFilter::new())
        .await
        .expect("listing should succeed");
    assert!(remaining.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_filter_returns_only_matching_tasks(world: World) {
    let project = world
        .catalog
        .create_project(CreateProjectRequest::new(
            "Filtered Project",
            today(),
            today() + Duration::days(10),
        ))
        .await
        .expect("project creation should succeed");
    let first = world
        .intake
        .create_development_task(CreateDevelopmentTaskRequest::new(
            project.id(),
            "Stays todo",
            today() + Duration::days(2),
            "Rust",
        ))
        .await
        .expect("task creation should succeed");
    let second = world
        .intake
        .create_development_task(CreateDevelopmentTaskRequest::new(
            project.id(),
            "Gets done",
            today() + Duration::days(1),
            "Rust",
        ))
        .await
        .expect("task creation should succeed");
    world
        .intake
        .update_status(second.id(), TaskStatus::Done)
        .await
        .expect("status update should succeed");

    let todos = world
        .intake
        .list_tasks(&TaskFilter::new().with_status(TaskStatus::Todo))
        .await
        .expect("listing should succeed");

    assert_eq!(todos.len(), 1);
    assert_eq!(todos.first().expect("one task").id(), first.id());
}
