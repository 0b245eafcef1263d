//! Error types for user account transitions and parsing.

use crate::outcome::Failure;
use thiserror::Error;

/// Business-rule violations raised by user account transitions.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// Promotion of an account that is already an administrator.
    #[error("User already has the \"ADMIN\" role")]
    AlreadyAdmin,

    /// Demotion of an account that already has the plain user role.
    #[error("User already has the \"USER\" role")]
    AlreadyUser,

    /// Activation of an account that is already active.
    #[error("User is already active")]
    AlreadyActive,

    /// Deactivation of an account that is already inactive.
    #[error("User is already inactive")]
    AlreadyInactive,
}

impl From<UserDomainError> for Failure {
    fn from(err: UserDomainError) -> Self {
        Self::invalid(err.to_string())
    }
}

/// Error returned while parsing a persisted role label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);

/// Error returned while parsing a persisted status label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(pub String);
