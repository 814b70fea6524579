//! In-memory store tests: filtering, ordering, cascade, and the
//! conditional bulk update.

use super::fixtures::{days_from_today, design_task, development_task, sample_project, today};
use crate::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{Task, TaskKind, TaskStatus},
    ports::{
        ProjectRepository, TaskFilter, TaskRepository, TrackerRepositoryError,
    },
};
use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

struct Repos {
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
}

#[fixture]
fn repos() -> Repos {
    let store = Arc::new(InMemoryTrackerStore::new());
    Repos {
        projects: store.clone(),
        tasks: store,
    }
}

async fn seed_task(repos: &Repos, task: &Task) {
    repos
        .tasks
        .store(task)
        .await
        .expect("task store should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filter_by_status_returns_exact_subset_in_due_date_order(repos: Repos) {
    let project = sample_project("Filtering");
    repos
        .projects
        .store(&project)
        .await
        .expect("project store should succeed");

    let todo_late = development_task(&project, "Todo late", days_from_today(8));
    let todo_soon = development_task(&project, "Todo soon", days_from_today(2));
    let mut done = development_task(&project, "Done already", days_from_today(4));
    done.set_status(TaskStatus::Done, &DefaultClock);
    let mut in_progress = design_task(&project, "Underway", days_from_today(3));
    in_progress.set_status(TaskStatus::InProgress, &DefaultClock);
    for task in [&todo_late, &todo_soon, &done, &in_progress] {
        seed_task(&repos, task).await;
    }

    let filtered = repos
        .tasks
        .list(&TaskFilter::new().with_status(TaskStatus::Todo))
        .await
        .expect("listing should succeed");

    let titles: Vec<&str> = filtered.iter().map(Task::title).collect();
    assert_eq!(titles, vec!["Todo soon", "Todo late"]);
    assert!(filtered.iter().all(|task| task.status() == TaskStatus::Todo));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_title_and_description_case_insensitively(repos: Repos) {
    let project = sample_project("Search");
    repos
        .projects
        .store(&project)
        .await
        .expect("project store should succeed");

    let by_title = development_task(&project, "Telemetry parser", days_from_today(1));
    let by_description = Task::new(
        crate::tracker::domain::NewTaskData {
            project_id: project.id(),
            title: "Dashboard".to_owned(),
            description: Some("Telemetry widgets".to_owned()),
            due_date: days_from_today(2),
            details: crate::tracker::domain::TaskDetails::design("Figma", None)
                .expect("valid details"),
        },
        &DefaultClock,
    )
    .expect("valid task");
    let unrelated = development_task(&project, "Billing", days_from_today(3));
    for task in [&by_title, &by_description, &unrelated] {
        seed_task(&repos, task).await;
    }

    let found = repos
        .tasks
        .list(&TaskFilter::new().with_search("TELEMETRY"))
        .await
        .expect("listing should succeed");

    let titles: Vec<&str> = found.iter().map(Task::title).collect();
    assert_eq!(titles, vec!["Telemetry parser", "Dashboard"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_cascades_to_owned_tasks(repos: Repos) {
    let kept = sample_project("Kept");
    let doomed = sample_project("Doomed");
    for project in [&kept, &doomed] {
        repos
            .projects
            .store(project)
            .await
            .expect("project store should succeed");
    }
    let survivor = development_task(&kept, "Survivor", days_from_today(1));
    let orphan_a = development_task(&doomed, "Orphan A", days_from_today(1));
    let orphan_b = design_task(&doomed, "Orphan B", days_from_today(2));
    for task in [&survivor, &orphan_a, &orphan_b] {
        seed_task(&repos, task).await;
    }

    repos
        .projects
        .delete(doomed.id())
        .await
        .expect("deletion should succeed");

    let remaining = repos
        .tasks
        .list(&TaskFilter::new())
        .await
        .expect("listing should succeed");
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|task| task.project_id() == kept.id()));
    assert!(
        repos
            .tasks
            .find_by_id(orphan_a.id())
            .await
            .expect("lookup should succeed")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_identifiers_are_rejected(repos: Repos) {
    let project = sample_project("Duplicates");
    repos
        .projects
        .store(&project)
        .await
        .expect("project store should succeed");
    let task = development_task(&project, "Once only", days_from_today(1));
    seed_task(&repos, &task).await;

    let project_result = repos.projects.store(&project).await;
    let task_result = repos.tasks.store(&task).await;

    assert!(matches!(
        project_result,
        Err(TrackerRepositoryError::DuplicateProject(id)) if id == project.id()
    ));
    assert!(matches!(
        task_result,
        Err(TrackerRepositoryError::DuplicateTask(id)) if id == task.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_unknown_task(repos: Repos) {
    let project = sample_project("Unknown");
    let task = development_task(&project, "Never stored", days_from_today(1));

    let result = repos.tasks.update(&task).await;

    assert!(matches!(
        result,
        Err(TrackerRepositoryError::TaskNotFound(id)) if id == task.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_overdue_candidates_applies_kind_status_and_date(repos: Repos) {
    let project = sample_project("Candidates");
    repos
        .projects
        .store(&project)
        .await
        .expect("project store should succeed");

    let due_dev = development_task(&project, "Due dev", days_from_today(-1));
    let future_dev = development_task(&project, "Future dev", days_from_today(1));
    let due_design = design_task(&project, "Due design", days_from_today(-2));
    let mut done_dev = development_task(&project, "Done dev", days_from_today(-3));
    done_dev.set_status(TaskStatus::Done, &DefaultClock);
    for task in [&due_dev, &future_dev, &due_design, &done_dev] {
        seed_task(&repos, task).await;
    }

    let candidates = repos
        .tasks
        .find_overdue_candidates(TaskKind::Development, today())
        .await
        .expect("candidate query should succeed");

    let titles: Vec<&str> = candidates.iter().map(Task::title).collect();
    assert_eq!(titles, vec!["Due dev"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_set_status_skips_rows_outside_the_guard(repos: Repos) {
    let project = sample_project("Guard");
    repos
        .projects
        .store(&project)
        .await
        .expect("project store should succeed");
    let open = development_task(&project, "Open", days_from_today(-1));
    let mut finished = development_task(&project, "Finished", days_from_today(-1));
    finished.set_status(TaskStatus::Done, &DefaultClock);
    for task in [&open, &finished] {
        seed_task(&repos, task).await;
    }

    let transitioned = repos
        .tasks
        .bulk_set_status(
            &[open.id(), finished.id()],
            &TaskStatus::OPEN,
            TaskStatus::Overdue,
            Utc::now(),
        )
        .await
        .expect("bulk update should succeed");

    assert_eq!(transitioned.len(), 1);
    assert!(
        transitioned
            .iter()
            .all(|task| task.id() == open.id() && task.status() == TaskStatus::Overdue)
    );
    let untouched = repos
        .tasks
        .find_by_id(finished.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(untouched.status(), TaskStatus::Done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_set_status_is_a_no_op_the_second_time(repos: Repos) {
    let project = sample_project("Repeat");
    repos
        .projects
        .store(&project)
        .await
        .expect("project store should succeed");
    let task = development_task(&project, "Repeat", days_from_today(-1));
    seed_task(&repos, &task).await;

    let first = repos
        .tasks
        .bulk_set_status(&[task.id()], &TaskStatus::OPEN, TaskStatus::Overdue, Utc::now())
        .await
        .expect("bulk update should succeed");
    let second = repos
        .tasks
        .bulk_set_status(&[task.id()], &TaskStatus::OPEN, TaskStatus::Overdue, Utc::now())
        .await
        .expect("bulk update should succeed");

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}
