//! User aggregate root and sign-up draft.

use super::{UserDomainError, UserId, UserRole, UserStatus};
use crate::auth::{AuthError, ports::PasswordHasher};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::fmt;

/// A registered account.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    role: UserRole,
    status: UserStatus,
    username: String,
    encrypted_password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted role.
    pub role: UserRole,
    /// Persisted status.
    pub status: UserStatus,
    /// Persisted username.
    pub username: String,
    /// Persisted password digest.
    pub encrypted_password: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            role: data.role,
            status: data.status,
            username: data.username,
            encrypted_password: data.encrypted_password,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the account status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the stored password digest.
    #[must_use]
    pub fn encrypted_password(&self) -> &str {
        &self.encrypted_password
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the account has the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns whether the account may sign in.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Returns whether both values refer to the same account.
    #[must_use]
    pub fn is_the_same_as(&self, other: &Self) -> bool {
        self.id == other.id
    }

    /// Grants the administrator role.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::AlreadyAdmin`] when the account already has
    /// the role.
    pub fn promote(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        if self.role == UserRole::Admin {
            return Err(UserDomainError::AlreadyAdmin);
        }
        self.role = UserRole::Admin;
        self.touch(clock);
        Ok(())
    }

    /// Returns the account to the plain user role.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::AlreadyUser`] when the account already has
    /// the plain role.
    pub fn demote(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        if self.role == UserRole::User {
            return Err(UserDomainError::AlreadyUser);
        }
        self.role = UserRole::User;
        self.touch(clock);
        Ok(())
    }

    /// Allows the account to sign in.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::AlreadyActive`] when the account is active.
    pub fn activate(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        if self.status == UserStatus::Active {
            return Err(UserDomainError::AlreadyActive);
        }
        self.status = UserStatus::Active;
        self.touch(clock);
        Ok(())
    }

    /// Prevents the account from signing in.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::AlreadyInactive`] when the account is
    /// inactive.
    pub fn deactivate(&mut self, clock: &impl Clock) -> Result<(), UserDomainError> {
        if self.status == UserStatus::Inactive {
            return Err(UserDomainError::AlreadyInactive);
        }
        self.status = UserStatus::Inactive;
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("status", &self.status)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// An account that has not been stored yet.
///
/// The plaintext password never reaches this type: the digest is derived once
/// in [`NewUser::sign_up`].
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    role: UserRole,
    status: UserStatus,
    username: String,
    encrypted_password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Prepares an inactive, non-admin account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Hashing`] when the password cannot be hashed.
    pub fn sign_up(
        username: impl Into<String>,
        password: &str,
        hasher: &(impl PasswordHasher + ?Sized),
        clock: &impl Clock,
    ) -> Result<Self, AuthError> {
        let encrypted_password = hasher.hash(password)?;
        let timestamp = clock.utc();
        Ok(Self {
            role: UserRole::User,
            status: UserStatus::Inactive,
            username: username.into(),
            encrypted_password,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Overrides the initial role.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Overrides the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the initial role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the initial status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password digest.
    #[must_use]
    pub fn encrypted_password(&self) -> &str {
        &self.encrypted_password
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            role: self.role,
            status: self.status,
            username: self.username,
            encrypted_password: self.encrypted_password,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("role", &self.role)
            .field("status", &self.status)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
