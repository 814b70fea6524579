//! Unit tests for the overdue selection rule.

use super::fixtures::{days_from_today, development_task, sample_project, today};
use crate::tracker::domain::TaskStatus;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[case(TaskStatus::Todo, -1, true)]
#[case(TaskStatus::Todo, 0, false)]
#[case(TaskStatus::Todo, 1, false)]
#[case(TaskStatus::InProgress, -1, true)]
#[case(TaskStatus::InProgress, 0, false)]
#[case(TaskStatus::InProgress, 1, false)]
#[case(TaskStatus::Done, -1, false)]
#[case(TaskStatus::Done, 1, false)]
#[case(TaskStatus::Overdue, -1, false)]
#[case(TaskStatus::Overdue, 1, false)]
fn is_overdue_candidate_matches_expected(
    #[case] status: TaskStatus,
    #[case] due_offset: i64,
    #[case] expected: bool,
) {
    let project = sample_project("Rule table");
    let mut task = development_task(&project, "Table entry", days_from_today(due_offset));
    task.set_status(status, &DefaultClock);

    assert_eq!(task.is_overdue_candidate(today()), expected);
}

#[rstest]
fn open_statuses_are_exactly_todo_and_in_progress() {
    assert!(TaskStatus::Todo.is_open());
    assert!(TaskStatus::InProgress.is_open());
    assert!(!TaskStatus::Done.is_open());
    assert!(!TaskStatus::Overdue.is_open());
}
