//! Credential checks, token issuance, and session resolution.

use super::{
    AuthError,
    ports::{Claims, PasswordHasher, TokenIssuer},
};
use crate::outcome::{Failure, Outcome};
use crate::user::{domain::User, ports::UserRepository};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Result of a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAttempt {
    /// Credentials matched an active account.
    Granted {
        /// Signed session token.
        token: String,
        /// The signed-in account.
        user: User,
    },
    /// No account matched the username and password.
    InvalidCredentials,
    /// Credentials matched an account that may not sign in.
    Inactive,
}

/// Result of resolving the bearer of a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    /// The token names an active account.
    Authenticated(User),
    /// The token failed verification.
    InvalidToken,
    /// The token names an account that no longer exists.
    UnknownUser,
    /// The token names an inactive account.
    Inactive,
}

/// Failures that prevent a sign-in from completing.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The user store failed.
    #[error(transparent)]
    Store(#[from] Failure),
    /// The session token could not be signed.
    #[error(transparent)]
    Credential(#[from] AuthError),
}

/// Authentication orchestration service.
#[derive(Clone)]
pub struct AuthenticationService<U, H, T, C>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<C>,
}

impl<U, H, T, C> AuthenticationService<U, H, T, C>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
    C: Clock + Send + Sync,
{
    /// Creates a new authentication service.
    #[must_use]
    pub const fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    /// Returns the account whose username and password match.
    ///
    /// Returns `Ok(None)` for an unknown username or a wrong password. The
    /// account status is not checked here.
    ///
    /// # Errors
    ///
    /// Propagates `DATABASE_ERROR` failures from the user store.
    pub async fn authenticate(&self, username: &str, password: &str) -> Outcome<Option<User>> {
        let candidate = self.users.find_by_username(username).await?;
        Ok(candidate.filter(|user| self.hasher.matches(password, user.encrypted_password())))
    }

    /// Checks credentials and issues a session token for an active account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError`] when the store fails or the token
    /// cannot be signed.
    #[tracing::instrument(skip_all)]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginAttempt, AuthenticationError> {
        let Some(user) = self.authenticate(username, password).await? else {
            tracing::debug!("rejected sign-in with invalid credentials");
            return Ok(LoginAttempt::InvalidCredentials);
        };
        if !user.is_active() {
            tracing::debug!(user_id = %user.id(), "rejected sign-in for inactive account");
            return Ok(LoginAttempt::Inactive);
        }
        let claims = Claims::new(user.id(), self.clock.utc(), self.tokens.lifetime());
        let token = self.tokens.sign(&claims)?;
        tracing::info!(user_id = %user.id(), "issued session token");
        Ok(LoginAttempt::Granted { token, user })
    }

    /// Resolves the account that bears `token`.
    ///
    /// # Errors
    ///
    /// Propagates `DATABASE_ERROR` failures from the user store.
    pub async fn resolve_current_user(&self, token: &str) -> Outcome<SessionCheck> {
        let Ok(user_id) = self
            .tokens
            .verify(token)
            .and_then(|claims| claims.user_id())
        else {
            return Ok(SessionCheck::InvalidToken);
        };
        let check = match self.users.find_by_id(user_id).await? {
            None => SessionCheck::UnknownUser,
            Some(user) if !user.is_active() => SessionCheck::Inactive,
            Some(user) => SessionCheck::Authenticated(user),
        };
        Ok(check)
    }
}
