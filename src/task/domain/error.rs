//! Error types for task transitions and parsing.

use crate::outcome::Failure;
use thiserror::Error;

/// Business-rule violations raised by task transitions.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task already carries a completion timestamp.
    #[error("Task is already completed")]
    AlreadyCompleted,

    /// The due date is still in the future.
    #[error("Task cannot be completed before the due date")]
    CompletionBeforeDueDate,

    /// Lowering priority is blocked while the due date is near.
    #[error("Cannot lower priority if due within 24 hours")]
    PriorityLockedNearDueDate,

    /// The owner cannot also be a collaborator.
    #[error("Task cannot be shared with owner")]
    SharedWithOwner,

    /// The user is already a collaborator.
    #[error("Task already shared with this user")]
    AlreadySharedWith,

    /// The collaborator limit has been reached.
    #[error("Task cannot be shared with more than 5 users")]
    CollaboratorLimitReached,
}

impl From<TaskDomainError> for Failure {
    fn from(err: TaskDomainError) -> Self {
        Self::invalid(err.to_string())
    }
}

/// Error returned while parsing a persisted priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error returned while parsing a persisted status label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
