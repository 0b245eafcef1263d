//! Port contracts for user account management.

pub mod repository;

pub use repository::{UserFilter, UserRepository};

#[cfg(test)]
pub use repository::MockUserRepository;
