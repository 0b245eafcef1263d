//! Task aggregate root and creation draft.

use super::{TaskDomainError, TaskId, TaskPriority, TaskStatus};
use crate::user::domain::{User, UserId};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

/// A task hydrated with its owner and collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    owner: User,
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    status: Option<TaskStatus>,
    collaborators: Vec<User>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Owning user.
    pub owner: User,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted reclassification label.
    pub status: Option<TaskStatus>,
    /// Collaborators in the order they were added.
    pub collaborators: Vec<User>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Maximum number of collaborators on one task.
    pub const MAX_COLLABORATORS: usize = 5;

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            priority: data.priority,
            due_date: data.due_date,
            completed_at: data.completed_at,
            status: data.status,
            collaborators: data.collaborators,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &User {
        &self.owner
    }

    /// Returns the owning user's identifier.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner.id()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns whether the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns the reclassification label, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns collaborators in the order they were added.
    #[must_use]
    pub fn collaborators(&self) -> &[User] {
        &self.collaborators
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` owns or collaborates on the task.
    #[must_use]
    pub fn can_be_viewed_by(&self, user: &User) -> bool {
        self.owner.is_the_same_as(user) || self.has_collaborator(user.id())
    }

    /// Returns whether `user` may complete the task.
    #[must_use]
    pub fn can_be_completed_by(&self, user: &User) -> bool {
        self.can_be_viewed_by(user)
    }

    /// Returns whether `user` may change the priority.
    #[must_use]
    pub fn can_be_prioritized_by(&self, user: &User) -> bool {
        self.can_be_viewed_by(user)
    }

    /// Returns whether `user` may add collaborators.
    #[must_use]
    pub fn can_be_shared_by(&self, user: &User) -> bool {
        self.can_be_viewed_by(user)
    }

    /// Marks the task as completed now.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] on a second completion
    /// and [`TaskDomainError::CompletionBeforeDueDate`] while the due date is
    /// in the future.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        let now = clock.utc();
        if self.due_date.is_some_and(|due| due > now) {
            return Err(TaskDomainError::CompletionBeforeDueDate);
        }
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Changes the priority.
    ///
    /// Raising is always allowed. Lowering is refused while the due date lies
    /// within the next 24 hours, both ends inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] for a completed task and
    /// [`TaskDomainError::PriorityLockedNearDueDate`] when lowering inside the
    /// window.
    pub fn prioritize(
        &mut self,
        priority: TaskPriority,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        let now = clock.utc();
        let lowering = priority < self.priority;
        if lowering && self.due_within_a_day(now) {
            return Err(TaskDomainError::PriorityLockedNearDueDate);
        }
        self.priority = priority;
        self.updated_at = now;
        Ok(())
    }

    /// Adds `user` as a collaborator.
    ///
    /// # Errors
    ///
    /// Checked in order: [`TaskDomainError::AlreadyCompleted`],
    /// [`TaskDomainError::SharedWithOwner`],
    /// [`TaskDomainError::AlreadySharedWith`], and
    /// [`TaskDomainError::CollaboratorLimitReached`].
    pub fn share_with(&mut self, user: User, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_open()?;
        if self.owner.is_the_same_as(&user) {
            return Err(TaskDomainError::SharedWithOwner);
        }
        if self.has_collaborator(user.id()) {
            return Err(TaskDomainError::AlreadySharedWith);
        }
        if self.collaborators.len() >= Self::MAX_COLLABORATORS {
            return Err(TaskDomainError::CollaboratorLimitReached);
        }
        self.collaborators.push(user);
        self.updated_at = clock.utc();
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), TaskDomainError> {
        if self.is_completed() {
            return Err(TaskDomainError::AlreadyCompleted);
        }
        Ok(())
    }

    fn has_collaborator(&self, id: UserId) -> bool {
        self.collaborators.iter().any(|user| user.id() == id)
    }

    fn due_within_a_day(&self, now: DateTime<Utc>) -> bool {
        let horizon = now + TimeDelta::hours(24);
        self.due_date.is_some_and(|due| due >= now && due <= horizon)
    }
}

/// A task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    owner_id: UserId,
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NewTask {
    /// Prepares a task with no description, no due date, and no priority.
    #[must_use]
    pub fn new(owner_id: UserId, title: impl Into<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            owner_id,
            title: title.into(),
            description: None,
            priority: TaskPriority::None,
            due_date: None,
            created_at: timestamp,
            updated_at: timestamp,
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

    /// Returns the owning user's identifier.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the initial priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Attaches the store-assigned identifier and the hydrated owner.
    #[must_use]
    pub fn into_task(self, id: TaskId, owner: User) -> Task {
        Task {
            id,
            owner,
            title: self.title,
            description: self.description,
            priority: self.priority,
            due_date: self.due_date,
            completed_at: None,
            status: None,
            collaborators: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
