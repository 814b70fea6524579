//! Service orchestration tests for the catalogue and intake services.

use super::fixtures::{TestHarness, days_from_today, harness, today};
use crate::tracker::{
    domain::{ProjectId, TaskKind, TaskStatus, TrackerDomainError},
    ports::TaskFilter,
    services::{
        CatalogError, CreateDesignTaskRequest, CreateDevelopmentTaskRequest,
        CreateProjectRequest, IntakeError,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_project_persists_and_is_retrievable() {
    let TestHarness { catalog, .. } = harness();
    let created = catalog
        .create_project(
            CreateProjectRequest::new("Apollo", today(), days_from_today(10))
                .with_description("Launch tracker"),
        )
        .await
        .expect("project creation should succeed");

    let fetched = catalog
        .find_project(created.id())
        .await
        .expect("lookup should succeed");

    assert_eq!(fetched, Some(created));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_project_rejects_blank_name() {
    let TestHarness { catalog, .. } = harness();
    let result = catalog
        .create_project(CreateProjectRequest::new("  ", today(), days_from_today(10)))
        .await;

    assert!(matches!(
        result,
        Err(CatalogError::Domain(TrackerDomainError::EmptyProjectName))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_projects_orders_by_name_ascending() {
    let TestHarness { catalog, .. } = harness();
    for name in ["Zephyr", "Apollo", "Mercury"] {
        catalog
            .create_project(CreateProjectRequest::new(name, today(), days_from_today(10)))
            .await
            .expect("project creation should succeed");
    }

    let names: Vec<String> = catalog
        .list_projects()
        .await
        .expect("listing should succeed")
        .into_iter()
        .map(|project| project.name().to_owned())
        .collect();

    assert_eq!(names, vec!["Apollo", "Mercury", "Zephyr"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_missing_project() {
    let TestHarness { intake, .. } = harness();
    let missing = ProjectId::new();
    let result = intake
        .create_development_task(CreateDevelopmentTaskRequest::new(
            missing,
            "Orphan task",
            days_from_today(3),
            "Rust",
        ))
        .await;

    assert!(matches!(
        result,
        Err(IntakeError::ProjectNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_design_task_carries_subtype_payload() {
    let TestHarness {
        catalog, intake, ..
    } = harness();
    let project = catalog
        .create_project(CreateProjectRequest::new("Apollo", today(), days_from_today(10)))
        .await
        .expect("project creation should succeed");

    let task = intake
        .create_design_task(
            CreateDesignTaskRequest::new(project.id(), "Mission patch", days_from_today(4), "Figma")
                .with_file_format("svg"),
        )
        .await
        .expect("task creation should succeed");

    assert_eq!(task.kind(), TaskKind::Design);
    assert_eq!(task.status(), TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_status_is_the_manual_correction_path() {
    let TestHarness {
        catalog, intake, ..
    } = harness();
    let project = catalog
        .create_project(CreateProjectRequest::new("Apollo", today(), days_from_today(10)))
        .await
        .expect("project creation should succeed");
    let task = intake
        .create_development_task(CreateDevelopmentTaskRequest::new(
            project.id(),
            "Slipped work",
            days_from_today(-1),
            "Rust",
        ))
        .await
        .expect("task creation should succeed");
    intake
        .update_status(task.id(), TaskStatus::Overdue)
        .await
        .expect("status update should succeed");

    let corrected = intake
        .update_status(task.id(), TaskStatus::InProgress)
        .await
        .expect("status update should succeed");

    assert_eq!(corrected.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_tasks_orders_by_due_date_ascending() {
    let TestHarness {
        catalog, intake, ..
    } = harness();
    let project = catalog
        .create_project(CreateProjectRequest::new("Apollo", today(), days_from_today(30)))
        .await
        .expect("project creation should succeed");
    for (title, offset) in [("Late", 9), ("Soon", 1), ("Middle", 5)] {
        intake
            .create_development_task(CreateDevelopmentTaskRequest::new(
                project.id(),
                title,
                days_from_today(offset),
                "Rust",
            ))
            .await
            .expect("task creation should succeed");
    }

    let titles: Vec<String> = intake
        .list_tasks(&TaskFilter::new())
        .await
        .expect("listing should succeed")
        .into_iter()
        .map(|task| task.title().to_owned())
        .collect();

    assert_eq!(titles, vec!["Soon", "Middle", "Late"]);
}
