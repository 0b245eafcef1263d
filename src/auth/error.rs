//! Authentication error types.

use thiserror::Error;

/// Errors raised while hashing credentials or handling tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token is malformed, tampered with, or names no valid subject.
    #[error("Invalid token")]
    InvalidToken,

    /// The token failed another validation step.
    #[error("token validation failed: {0}")]
    Validation(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidToken | ErrorKind::InvalidSignature | ErrorKind::Base64(_) => {
                Self::InvalidToken
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
