//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::identity::domain::IdentityId;
use crate::task::{
    domain::{Bid, Budget, PersistedTaskData, Task, TaskId, TaskState, Urgency},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let task_id = task.id();
        let expected = task.version();
        let expected_version =
            i64::try_from(expected).map_err(TaskRepositoryError::persistence)?;
        let next_version = expected_version
            .checked_add(1)
            .ok_or_else(|| TaskRepositoryError::persistence(std::io::Error::other(
                "task version overflow",
            )))?;
        let row = to_new_row(task)?;

        let mut updated = task.clone();
        updated.bump_version();

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::version.eq(expected_version)),
            )
            .set((
                tasks::title.eq(&row.title),
                tasks::description.eq(&row.description),
                tasks::category.eq(&row.category),
                tasks::location.eq(&row.location),
                tasks::provider_id.eq(row.provider_id),
                tasks::budget_minor.eq(row.budget_minor),
                tasks::scheduled_at.eq(row.scheduled_at),
                tasks::skills_required.eq(&row.skills_required),
                tasks::urgency.eq(&row.urgency),
                tasks::bids.eq(&row.bids),
                tasks::state.eq(&row.state),
                tasks::version.eq(next_version),
                tasks::updated_at.eq(row.updated_at),
            ))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if affected == 0 {
                let current = tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .select(tasks::version)
                    .first::<i64>(connection)
                    .optional()
                    .map_err(TaskRepositoryError::persistence)?;

                return match current {
                    None => Err(TaskRepositoryError::NotFound(task_id)),
                    Some(actual_version) => Err(TaskRepositoryError::VersionConflict {
                        task_id,
                        expected,
                        actual: u64::try_from(actual_version)
                            .map_err(TaskRepositoryError::persistence)?,
                    }),
                };
            }
            Ok(updated)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let filters = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = tasks::table.into_boxed();
            if let Some(state) = filters.state() {
                statement = statement.filter(tasks::state.eq(state.as_str()));
            }
            if let Some(category) = filters.category() {
                statement = statement.filter(tasks::category.ilike(category.to_owned()));
            }
            if let Some(urgency) = filters.urgency() {
                statement = statement.filter(tasks::urgency.eq(urgency.as_str()));
            }
            if let Some(client) = filters.client() {
                statement = statement.filter(tasks::client_id.eq(client.into_inner()));
            }
            if let Some(provider) = filters.provider() {
                statement = statement.filter(tasks::provider_id.eq(provider.into_inner()));
            }

            let rows = statement
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let skills_required =
        serde_json::to_value(task.skills_required()).map_err(TaskRepositoryError::persistence)?;
    let bids = serde_json::to_value(task.bids()).map_err(TaskRepositoryError::persistence)?;
    let version = i64::try_from(task.version()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        category: task.category().to_owned(),
        location: task.location().to_owned(),
        client_id: task.client().into_inner(),
        provider_id: task.provider().map(IdentityId::into_inner),
        budget_minor: task.budget().minor_units(),
        scheduled_at: task.scheduled_at(),
        skills_required,
        urgency: task.urgency().as_str().to_owned(),
        bids,
        state: task.state().as_str().to_owned(),
        version,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        category,
        location,
        client_id,
        provider_id,
        budget_minor,
        scheduled_at,
        skills_required: persisted_skills,
        urgency: persisted_urgency,
        bids: persisted_bids,
        state: persisted_state,
        version,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        category,
        location,
        client: IdentityId::from_uuid(client_id),
        provider: provider_id.map(IdentityId::from_uuid),
        budget: Budget::from_minor_units(budget_minor)
            .map_err(TaskRepositoryError::persistence)?,
        scheduled_at,
        skills_required: serde_json::from_value::<Vec<String>>(persisted_skills)
            .map_err(TaskRepositoryError::persistence)?,
        urgency: Urgency::try_from(persisted_urgency.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        bids: serde_json::from_value::<Vec<Bid>>(persisted_bids)
            .map_err(TaskRepositoryError::persistence)?,
        state: TaskState::try_from(persisted_state.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        version: u64::try_from(version).map_err(TaskRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
