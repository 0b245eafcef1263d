//! Repository port for task persistence, sharing, and reclassification.

use crate::outcome::Outcome;
use crate::pagination::{Page, Pagination};
use crate::task::domain::{NewTask, Task, TaskId, TaskPriority, TaskStatus};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Optional constraints applied when listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// `Some(true)` keeps completed tasks, `Some(false)` keeps open ones.
    pub completed: Option<bool>,
    /// Only return tasks with exactly this priority.
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Restricts the listing by completion.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Restricts the listing to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns whether `task` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.completed
            .is_none_or(|completed| task.is_completed() == completed)
            && self.priority.is_none_or(|priority| task.priority() == priority)
    }
}

/// Task persistence contract.
///
/// Every method reports store failures as `DATABASE_ERROR` failures carrying
/// the underlying message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task with its owner and collaborators.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> Outcome<Option<Task>>;

    /// Stores a new task and returns it with its owner populated.
    async fn create(&self, task: &NewTask) -> Outcome<Task>;

    /// Persists scalar changes and newly added collaborators atomically.
    ///
    /// Collaborators missing from the store are inserted as shares granted by
    /// the owner. Existing shares are never changed or removed. When any step
    /// fails, nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND "Task not found"` when the task no longer exists.
    async fn update(&self, task: &Task) -> Outcome<Task>;

    /// Lists tasks owned by or shared with `viewer`, ordered by identifier.
    async fn find_visible_page(
        &self,
        viewer: UserId,
        filter: TaskFilter,
        pagination: Pagination,
    ) -> Outcome<Page<Task>>;

    /// Returns open tasks whose due date passed before `now` and that are
    /// not yet labelled `LATE`.
    async fn find_open_late_tasks(&self, now: DateTime<Utc>) -> Outcome<Vec<Task>>;

    /// Returns completed tasks not yet labelled `DONE`.
    async fn find_completed_tasks_not_marked_as_done(&self) -> Outcome<Vec<Task>>;

    /// Sets the label of every listed task and returns the affected count.
    async fn update_tasks_status(&self, ids: &[TaskId], status: TaskStatus) -> Outcome<u64>;
}
