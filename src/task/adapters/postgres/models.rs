//! Diesel row models for task persistence.

use crate::persistence::schema::{task_shares, tasks};
use crate::task::domain::{NewTask, Task};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct TaskRow {
    pub(super) id: i64,
    pub(super) owner_id: i64,
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) priority: i16,
    pub(super) due_date: Option<DateTime<Utc>>,
    pub(super) completed_at: Option<DateTime<Utc>>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
    pub(super) status: Option<String>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub(super) struct NewTaskRow {
    pub(super) owner_id: i64,
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) priority: i16,
    pub(super) due_date: Option<DateTime<Utc>>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<&NewTask> for NewTaskRow {
    fn from(task: &NewTask) -> Self {
        Self {
            owner_id: task.owner_id().value(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            priority: task.priority().value(),
            due_date: task.due_date(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Scalar columns patched by a task update.
///
/// The reclassification label is left to the status job.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub(super) struct TaskChangeset {
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) priority: i16,
    pub(super) due_date: Option<DateTime<Utc>>,
    pub(super) completed_at: Option<DateTime<Utc>>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskChangeset {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            priority: task.priority().value(),
            due_date: task.due_date(),
            completed_at: task.completed_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Insert model for collaborator grants; `shared_at` takes the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_shares)]
pub(super) struct NewShareRow {
    pub(super) task_id: i64,
    pub(super) shared_by_id: i64,
    pub(super) shared_with_id: i64,
}
