//! `PostgreSQL` repository implementation for tasks and their shares.

use super::models::{NewShareRow, NewTaskRow, TaskChangeset, TaskRow};
use crate::outcome::{Failure, Outcome};
use crate::pagination::{Page, Pagination};
use crate::persistence::{
    PgPool,
    pool::run_blocking,
    schema::{task_shares, tasks, users},
};
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus},
    ports::{TaskFilter, TaskRepository},
};
use crate::user::{adapters::postgres::UserRow, domain::User, domain::UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use std::collections::HashMap;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn find_by_id(&self, id: TaskId) -> Outcome<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            load_task(connection, id.value())
        })
        .await
    }

    async fn create(&self, task: &NewTask) -> Outcome<Task> {
        let row = NewTaskRow::from(task);
        run_blocking(&self.pool, move |connection| {
            let created = diesel::insert_into(tasks::table)
                .values(&row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)?;
            hydrate_one(connection, created)
        })
        .await
    }

    async fn update(&self, task: &Task) -> Outcome<Task> {
        let id = task.id().value();
        let owner_id = task.owner_id().value();
        let collaborator_ids: Vec<i64> = task
            .collaborators()
            .iter()
            .map(|user| user.id().value())
            .collect();
        let changes = TaskChangeset::from(task);
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, Failure, _>(|tx| {
                let persisted_completion = tasks::table
                    .find(id)
                    .select(tasks::completed_at)
                    .for_update()
                    .first::<Option<DateTime<Utc>>>(tx)
                    .optional()?
                    .ok_or_else(|| Failure::not_found("Task not found"))?;
                let mut patch = changes;
                // Completion is permanent: a stale copy cannot clear it.
                patch.completed_at = persisted_completion.or(patch.completed_at);

                let persisted: Vec<i64> = task_shares::table
                    .filter(task_shares::task_id.eq(id))
                    .select(task_shares::shared_with_id)
                    .load(tx)?;
                let new_shares: Vec<NewShareRow> = collaborator_ids
                    .iter()
                    .filter(|user_id| !persisted.contains(*user_id))
                    .map(|&shared_with_id| NewShareRow {
                        task_id: id,
                        shared_by_id: owner_id,
                        shared_with_id,
                    })
                    .collect();
                if !new_shares.is_empty() {
                    diesel::insert_into(task_shares::table)
                        .values(&new_shares)
                        .execute(tx)?;
                }

                diesel::update(tasks::table.find(id))
                    .set(&patch)
                    .execute(tx)?;

                load_task(tx, id)?.ok_or_else(|| Failure::not_found("Task not found"))
            })
        })
        .await
    }

    async fn find_visible_page(
        &self,
        viewer: UserId,
        filter: TaskFilter,
        pagination: Pagination,
    ) -> Outcome<Page<Task>> {
        run_blocking(&self.pool, move |connection| {
            let total: i64 = visible_tasks(viewer, filter)
                .count()
                .get_result(connection)?;
            let rows = visible_tasks(viewer, filter)
                .order(tasks::id.asc())
                .limit(pagination.limit())
                .offset(pagination.offset())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            Ok(Page {
                results: hydrate(connection, rows)?,
                total: u64::try_from(total).map_err(Failure::database)?,
            })
        })
        .await
    }

    async fn find_open_late_tasks(&self, now: DateTime<Utc>) -> Outcome<Vec<Task>> {
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::completed_at.is_null())
                .filter(tasks::due_date.lt(now))
                .filter(
                    tasks::status
                        .is_null()
                        .or(tasks::status.ne(TaskStatus::Late.as_str())),
                )
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            hydrate(connection, rows)
        })
        .await
    }

    async fn find_completed_tasks_not_marked_as_done(&self) -> Outcome<Vec<Task>> {
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::completed_at.is_not_null())
                .filter(
                    tasks::status
                        .is_null()
                        .or(tasks::status.ne(TaskStatus::Done.as_str())),
                )
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            hydrate(connection, rows)
        })
        .await
    }

    async fn update_tasks_status(&self, ids: &[TaskId], status: TaskStatus) -> Outcome<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq_any(raw_ids)))
                .set(tasks::status.eq(status.as_str()))
                .execute(connection)?;
            u64::try_from(affected).map_err(Failure::database)
        })
        .await
    }
}

fn visible_tasks(viewer: UserId, filter: TaskFilter) -> tasks::BoxedQuery<'static, Pg> {
    let shared_with_viewer = task_shares::table
        .filter(task_shares::shared_with_id.eq(viewer.value()))
        .select(task_shares::task_id);
    let mut query = tasks::table
        .filter(
            tasks::owner_id
                .eq(viewer.value())
                .or(tasks::id.eq_any(shared_with_viewer)),
        )
        .into_boxed();
    match filter.completed {
        Some(true) => query = query.filter(tasks::completed_at.is_not_null()),
        Some(false) => query = query.filter(tasks::completed_at.is_null()),
        None => {}
    }
    if let Some(priority) = filter.priority {
        query = query.filter(tasks::priority.eq(priority.value()));
    }
    query
}

fn load_task(connection: &mut PgConnection, id: i64) -> Outcome<Option<Task>> {
    tasks::table
        .find(id)
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()?
        .map(|row| hydrate_one(connection, row))
        .transpose()
}

fn hydrate_one(connection: &mut PgConnection, row: TaskRow) -> Outcome<Task> {
    hydrate(connection, vec![row])?
        .pop()
        .ok_or_else(|| Failure::database("task row vanished during hydration"))
}

/// Loads owners and collaborators for `rows` in two queries.
fn hydrate(connection: &mut PgConnection, rows: Vec<TaskRow>) -> Outcome<Vec<Task>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let task_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let owner_ids: Vec<i64> = rows.iter().map(|row| row.owner_id).collect();

    let mut owners = HashMap::new();
    for owner in users::table
        .filter(users::id.eq_any(&owner_ids))
        .select(UserRow::as_select())
        .load::<UserRow>(connection)?
    {
        owners.insert(owner.id, owner.into_user()?);
    }

    let mut collaborators: HashMap<i64, Vec<User>> = HashMap::new();
    for (task_id, collaborator) in task_shares::table
        .inner_join(users::table.on(users::id.eq(task_shares::shared_with_id)))
        .filter(task_shares::task_id.eq_any(&task_ids))
        .order((task_shares::shared_at.asc(), task_shares::id.asc()))
        .select((task_shares::task_id, UserRow::as_select()))
        .load::<(i64, UserRow)>(connection)?
    {
        collaborators
            .entry(task_id)
            .or_default()
            .push(collaborator.into_user()?);
    }

    rows.into_iter()
        .map(|row| {
            let owner = owners.get(&row.owner_id).cloned().ok_or_else(|| {
                Failure::database(format!(
                    "task {} references missing owner {}",
                    row.id, row.owner_id
                ))
            })?;
            let shared = collaborators.remove(&row.id).unwrap_or_default();
            into_task(row, owner, shared)
        })
        .collect()
}

fn into_task(row: TaskRow, owner: User, collaborators: Vec<User>) -> Outcome<Task> {
    let priority = TaskPriority::try_from(row.priority).map_err(Failure::database)?;
    let status = row
        .status
        .as_deref()
        .map(TaskStatus::try_from)
        .transpose()
        .map_err(Failure::database)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(row.id),
        owner,
        title: row.title,
        description: row.description,
        priority,
        due_date: row.due_date,
        completed_at: row.completed_at,
        status,
        collaborators,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
