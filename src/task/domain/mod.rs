//! Domain model for tasks, their owners, and their collaborators.
//!
//! A [`Task`] is hydrated with its owner and collaborators so every rule
//! (visibility, completion, prioritization, sharing) can be checked without
//! touching the store. Transitions mutate the aggregate in place and report
//! rule violations as [`TaskDomainError`].

mod error;
mod ids;
mod priority;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use priority::{TaskPriority, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task};
