//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by task services and
//! the status reclassification job.

pub mod repository;

pub use repository::{TaskFilter, TaskRepository};

#[cfg(test)]
pub use repository::MockTaskRepository;
