//! `PostgreSQL` store implementation for tracker persistence.

use super::{
    models::{NewProjectRow, NewTaskRow, ProjectRow, TaskRow},
    schema::{projects, tasks},
};
use crate::tracker::{
    domain::{
        PersistedProjectData, PersistedTaskData, Project, ProjectId, Task, TaskDetails, TaskId,
        TaskKind, TaskStatus,
    },
    ports::{
        ProjectRepository, TaskCreatedListener, TaskFilter, TaskRepository,
        TrackerRepositoryError, TrackerRepositoryResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::sync::{Arc, RwLock};

/// `PostgreSQL` connection pool type used by tracker adapters.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<DieselError> for TrackerRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed tracker store implementing both repository ports.
#[derive(Clone)]
pub struct PostgresTrackerStore {
    pool: TrackerPgPool,
    listeners: Arc<RwLock<Vec<Arc<dyn TaskCreatedListener>>>>,
}

impl PostgresTrackerStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub fn new(pool: TrackerPgPool) -> Self {
        Self {
            pool,
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TrackerRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TrackerRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackerRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TrackerRepositoryError::persistence)?
    }

    /// Delivers one created event per registered listener. Listener
    /// failures are reported and do not fail the triggering insert.
    async fn emit_created(&self, task: &Task) {
        let listeners: Vec<Arc<dyn TaskCreatedListener>> = match self.listeners.read() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        for listener in listeners {
            if let Err(err) = listener.task_created(task).await {
                tracing::warn!(task_id = %task.id(), error = %err, "task creation event handler failed");
            }
        }
    }
}

#[async_trait]
impl ProjectRepository for PostgresTrackerStore {
    async fn store(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_project_row(project);

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TrackerRepositoryError::DuplicateProject(project_id)
                    }
                    _ => TrackerRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, project: &Project) -> TrackerRepositoryResult<()> {
        let project_id = project.id();
        let name = project.name().to_owned();
        let description = project.description().map(str::to_owned);
        let start_date = project.start_date();
        let end_date = project.end_date();
        let updated_at = project.updated_at();

        self.run_blocking(move |connection| {
            let affected =
                diesel::update(projects::table.filter(projects::id.eq(project_id.into_inner())))
                    .set((
                        projects::name.eq(name),
                        projects::description.eq(description),
                        projects::start_date.eq(start_date),
                        projects::end_date.eq(end_date),
                        projects::updated_at.eq(updated_at),
                    ))
                    .execute(connection)
                    .map_err(TrackerRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TrackerRepositoryError::ProjectNotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> TrackerRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(TrackerRepositoryError::persistence)?;
            Ok(row.map(row_to_project))
        })
        .await
    }

    async fn list(&self) -> TrackerRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .order(projects::name.asc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_project).collect())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> TrackerRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TrackerRepositoryError, _>(|txn| {
                    // Tasks are exclusively owned, so the cascade is an
                    // explicit two-step delete inside one transaction.
                    diesel::delete(tasks::table.filter(tasks::project_id.eq(id.into_inner())))
                        .execute(txn)
                        .map_err(TrackerRepositoryError::persistence)?;
                    let affected =
                        diesel::delete(projects::table.filter(projects::id.eq(id.into_inner())))
                            .execute(txn)
                            .map_err(TrackerRepositoryError::persistence)?;
                    if affected == 0 {
                        return Err(TrackerRepositoryError::ProjectNotFound(id));
                    }
                    Ok(())
                })
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresTrackerStore {
    async fn store(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_task_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TrackerRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TrackerRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await?;

        // Emitted only on initial insert; updates go through `update`.
        self.emit_created(task).await;
        Ok(())
    }

    async fn update(&self, task: &Task) -> TrackerRepositoryResult<()> {
        let task_id = task.id();
        let title = task.title().to_owned();
        let description = task.description().map(str::to_owned);
        let due_date = task.due_date();
        let status = task.status().as_str().to_owned();
        let kind = task.kind().as_str().to_owned();
        let details =
            serde_json::to_value(task.details()).map_err(TrackerRepositoryError::persistence)?;
        let updated_at = task.updated_at();

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::due_date.eq(due_date),
                    tasks::status.eq(status),
                    tasks::kind.eq(kind),
                    tasks::details.eq(details),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TrackerRepositoryError::TaskNotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TrackerRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TrackerRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>> {
        let filter = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(status) = filter.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(kind) = filter.kind {
                query = query.filter(tasks::kind.eq(kind.as_str()));
            }
            if let Some(project) = filter.project {
                query = query.filter(tasks::project_id.eq(project.into_inner()));
            }
            if let Some(due_date) = filter.due_date {
                query = query.filter(tasks::due_date.eq(due_date));
            }
            if let Some(term) = filter.search {
                let pattern = format!("%{}%", escape_like(&term));
                query = query.filter(
                    tasks::title
                        .ilike(pattern.clone())
                        .or(tasks::description.ilike(pattern)),
                );
            }
            let rows = query
                .order((tasks::due_date.asc(), tasks::created_at.asc()))
                .load::<TaskRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_overdue_candidates(
        &self,
        kind: TaskKind,
        before: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let open: Vec<&str> = TaskStatus::OPEN.iter().map(|status| status.as_str()).collect();
            let rows = tasks::table
                .filter(tasks::kind.eq(kind.as_str()))
                .filter(tasks::status.eq_any(open))
                .filter(tasks::due_date.lt(before))
                .order((tasks::due_date.asc(), tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn bulk_set_status(
        &self,
        ids: &[TaskId],
        only_from: &[TaskStatus],
        status: TaskStatus,
        timestamp: DateTime<Utc>,
    ) -> TrackerRepositoryResult<Vec<Task>> {
        let id_values: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        let from_values: Vec<String> = only_from
            .iter()
            .map(|from| from.as_str().to_owned())
            .collect();
        let status_value = status.as_str().to_owned();

        self.run_blocking(move |connection| {
            // One conditional UPDATE ... RETURNING: rows whose status
            // changed since selection are skipped, so overlapping sweeps
            // cannot transition the same task twice.
            let rows = diesel::update(
                tasks::table
                    .filter(tasks::id.eq_any(id_values))
                    .filter(tasks::status.eq_any(from_values)),
            )
            .set((tasks::status.eq(status_value), tasks::updated_at.eq(timestamp)))
            .returning(TaskRow::as_returning())
            .get_results::<TaskRow>(connection)
            .map_err(TrackerRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    fn on_created(&self, listener: Arc<dyn TaskCreatedListener>) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(listener);
        }
    }
}

/// Escapes SQL LIKE metacharacters in a user-supplied search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn to_new_project_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().to_owned(),
        description: project.description().map(str::to_owned),
        start_date: project.start_date(),
        end_date: project.end_date(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> Project {
    Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_new_task_row(task: &Task) -> TrackerRepositoryResult<NewTaskRow> {
    let details =
        serde_json::to_value(task.details()).map_err(TrackerRepositoryError::persistence)?;
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        kind: task.kind().as_str().to_owned(),
        details,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TrackerRepositoryResult<Task> {
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TrackerRepositoryError::persistence)?;
    let details = serde_json::from_value::<TaskDetails>(row.details)
        .map_err(TrackerRepositoryError::persistence)?;
    debug_assert_eq!(
        details.kind().as_str(),
        row.kind,
        "kind column must stay in step with the details payload"
    );

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        title: row.title,
        description: row.description,
        due_date: row.due_date,
        status,
        details,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
