//! Tagged operation results shared by entities, repositories, and services.
//!
//! Every expected business outcome is reported as a [`Failure`] carrying a
//! [`FailureCode`] and a human-readable message. Callers match on the code
//! instead of catching panics or inspecting error strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message used when a store failure carries no text of its own.
pub const DATABASE_ERROR_FALLBACK: &str = "Database error";

/// Result type returned by domain operations, repositories, and services.
pub type Outcome<T> = Result<T, Failure>;

/// Classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    /// The requested entity does not exist.
    NotFound,
    /// The caller is not allowed to perform the operation.
    Forbidden,
    /// The operation violates a business rule.
    Invalid,
    /// The backing store failed.
    DatabaseError,
}

impl FailureCode {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Invalid => "INVALID",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code the transport layer must answer with.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::Invalid => 422,
            Self::DatabaseError => 500,
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed operation: a code plus an actionable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Failure {
    code: FailureCode,
    message: String,
}

impl Failure {
    /// Creates a failure with an explicit code.
    #[must_use]
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a `NOT_FOUND` failure.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureCode::NotFound, message)
    }

    /// Creates a `FORBIDDEN` failure.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(FailureCode::Forbidden, message)
    }

    /// Creates an `INVALID` failure.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(FailureCode::Invalid, message)
    }

    /// Creates a `DATABASE_ERROR` failure from any store error.
    ///
    /// The underlying message is passed through verbatim; an empty message is
    /// replaced by [`DATABASE_ERROR_FALLBACK`].
    #[must_use]
    pub fn database(err: impl fmt::Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            return Self::new(FailureCode::DatabaseError, DATABASE_ERROR_FALLBACK);
        }
        Self::new(FailureCode::DatabaseError, message)
    }

    /// Returns the failure code.
    #[must_use]
    pub const fn code(&self) -> FailureCode {
        self.code
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
