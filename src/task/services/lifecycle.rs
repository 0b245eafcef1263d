//! Service layer for creating, viewing, and transitioning tasks.
//!
//! Every transition follows the same shape: fetch the task, check that the
//! current user may act on it, apply the domain rule, then persist. The first
//! failure short-circuits and is returned unchanged.

use crate::outcome::{Failure, Outcome};
use crate::pagination::{Page, Pagination};
use crate::task::{
    domain::{NewTask, Task, TaskId, TaskPriority},
    ports::{TaskFilter, TaskRepository},
};
use crate::user::{
    domain::{User, UserId},
    ports::UserRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

const TASK_NOT_FOUND: &str = "Task not found";
const NOT_OWNER_OR_COLLABORATOR: &str = "User is not owner or collaborator of this task";
const SHARE_TARGET_NOT_FOUND: &str = "User to be shared with not found";

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::None,
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, U, C> TaskLifecycleService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }

    /// Creates a task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns the repository failure.
    #[tracing::instrument(skip_all, fields(owner_id = %owner.id()))]
    pub async fn create_task(&self, request: CreateTaskRequest, owner: &User) -> Outcome<Task> {
        let mut draft = NewTask::new(owner.id(), request.title, &*self.clock)
            .with_priority(request.priority);
        if let Some(description) = request.description.filter(|text| !text.is_empty()) {
            draft = draft.with_description(description);
        }
        if let Some(due_date) = request.due_date {
            draft = draft.with_due_date(due_date);
        }
        let created = self.tasks.create(&draft).await?;
        tracing::info!(task_id = %created.id(), "created task");
        Ok(created)
    }

    /// Retrieves a task visible to `current_user`.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND "Task not found"`, `FORBIDDEN` when the user is
    /// neither owner nor collaborator, or the repository failure.
    pub async fn find_task(&self, id: TaskId, current_user: &User) -> Outcome<Task> {
        let task = self.fetch(id).await?;
        authorize(task.can_be_viewed_by(current_user))?;
        Ok(task)
    }

    /// Lists tasks owned by or shared with `current_user`.
    ///
    /// # Errors
    ///
    /// Returns the repository failure.
    pub async fn find_tasks(
        &self,
        filter: TaskFilter,
        pagination: Pagination,
        current_user: &User,
    ) -> Outcome<Page<Task>> {
        self.tasks
            .find_visible_page(current_user.id(), filter, pagination)
            .await
    }

    /// Completes a task.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND`, `FORBIDDEN`, the `INVALID` completion rule
    /// failure, or the repository failure.
    #[tracing::instrument(skip_all, fields(task_id = %id, user_id = %current_user.id()))]
    pub async fn complete_task(&self, id: TaskId, current_user: &User) -> Outcome<Task> {
        let mut task = self.fetch(id).await?;
        authorize(task.can_be_completed_by(current_user))?;
        task.complete(&*self.clock)?;
        let updated = self.tasks.update(&task).await?;
        tracing::info!("completed task");
        Ok(updated)
    }

    /// Changes the priority of a task.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND`, `FORBIDDEN`, the `INVALID` priority rule failure,
    /// or the repository failure.
    #[tracing::instrument(skip_all, fields(task_id = %id, user_id = %current_user.id(), %priority))]
    pub async fn prioritize_task(
        &self,
        id: TaskId,
        priority: TaskPriority,
        current_user: &User,
    ) -> Outcome<Task> {
        let mut task = self.fetch(id).await?;
        authorize(task.can_be_prioritized_by(current_user))?;
        task.prioritize(priority, &*self.clock)?;
        let updated = self.tasks.update(&task).await?;
        tracing::info!("changed task priority");
        Ok(updated)
    }

    /// Adds a collaborator to a task.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for a missing task, `FORBIDDEN`,
    /// `INVALID "User to be shared with not found"` for a missing target,
    /// the `INVALID` sharing rule failure, or the repository failure.
    #[tracing::instrument(
        skip_all,
        fields(task_id = %id, user_id = %current_user.id(), collaborator_id = %collaborator_id)
    )]
    pub async fn share_task(
        &self,
        id: TaskId,
        collaborator_id: UserId,
        current_user: &User,
    ) -> Outcome<Task> {
        let mut task = self.fetch(id).await?;
        authorize(task.can_be_shared_by(current_user))?;
        let collaborator = self
            .users
            .find_by_id(collaborator_id)
            .await?
            .ok_or_else(|| Failure::invalid(SHARE_TARGET_NOT_FOUND))?;
        task.share_with(collaborator, &*self.clock)?;
        let updated = self.tasks.update(&task).await?;
        tracing::info!("shared task");
        Ok(updated)
    }

    async fn fetch(&self, id: TaskId) -> Outcome<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| Failure::not_found(TASK_NOT_FOUND))
    }
}

fn authorize(allowed: bool) -> Outcome<()> {
    if allowed {
        Ok(())
    } else {
        Err(Failure::forbidden(NOT_OWNER_OR_COLLABORATOR))
    }
}
