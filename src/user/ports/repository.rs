//! Repository port for user account persistence and lookup.

use crate::outcome::Outcome;
use crate::pagination::{Page, Pagination};
use crate::user::domain::{NewUser, User, UserId, UserRole, UserStatus};
use async_trait::async_trait;

/// Optional constraints applied when listing accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Only return accounts with this role.
    pub role: Option<UserRole>,
    /// Only return accounts with this status.
    pub status: Option<UserStatus>,
}

impl UserFilter {
    /// Restricts the listing to one role.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns whether `user` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role() == role)
            && self.status.is_none_or(|status| user.status() == status)
    }
}

/// User persistence contract.
///
/// Store failures surface as `DATABASE_ERROR` failures carrying the
/// underlying message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by identifier.
    ///
    /// Returns `None` when the account does not exist.
    async fn find_by_id(&self, id: UserId) -> Outcome<Option<User>>;

    /// Finds an account by exact username.
    ///
    /// Returns `None` when no account uses the name.
    async fn find_by_username(&self, username: &str) -> Outcome<Option<User>>;

    /// Lists accounts matching `filter`, ordered by identifier.
    async fn find_page(&self, filter: UserFilter, pagination: Pagination) -> Outcome<Page<User>>;

    /// Stores a new account and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns a `DATABASE_ERROR` failure when the username is taken or too
    /// long for the store.
    async fn create(&self, user: &NewUser) -> Outcome<User>;

    /// Persists the role, status, and update timestamp of an account.
    ///
    /// # Errors
    ///
    /// Returns a `NOT_FOUND` failure when the account no longer exists.
    async fn update(&self, user: &User) -> Outcome<User>;
}
