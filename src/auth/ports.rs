//! Collaborator contracts for credential hashing and token handling.

use super::AuthError;
use crate::user::domain::UserId;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Derives a storable digest from `plaintext`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Hashing`] when the digest cannot be produced.
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Returns whether `plaintext` produces `digest`.
    ///
    /// Malformed digests never match.
    fn matches(&self, plaintext: &str, digest: &str) -> bool;
}

/// Signs and verifies session tokens.
pub trait TokenIssuer: Send + Sync {
    /// Lifetime given to newly issued tokens.
    fn lifetime(&self) -> TimeDelta;

    /// Encodes `claims` into a signed token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] when encoding fails.
    fn sign(&self, claims: &Claims) -> Result<String, AuthError>;

    /// Decodes and validates a signed token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the signature is invalid or the token has
    /// expired.
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user identifier.
    pub sub: String,
    /// Issued-at timestamp in seconds.
    pub iat: i64,
    /// Expiry timestamp in seconds.
    pub exp: i64,
    /// Unique token identifier.
    pub jti: String,
}

impl Claims {
    /// Builds claims for `user` valid for `lifetime` from `issued_at`.
    #[must_use]
    pub fn new(user: UserId, issued_at: DateTime<Utc>, lifetime: TimeDelta) -> Self {
        Self {
            sub: user.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Returns the user named by the subject claim.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] when the subject is not an
    /// identifier.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken)
    }
}
