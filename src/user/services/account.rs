//! Sign-up, lookup, and administrator transitions for user accounts.

use crate::auth::PasswordHasher;
use crate::outcome::{Failure, Outcome};
use crate::pagination::{Page, Pagination};
use crate::user::{
    domain::{NewUser, User, UserDomainError, UserId},
    ports::{UserFilter, UserRepository},
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;

/// Request payload for signing up a new account.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    username: String,
    password: String,
}

impl CreateUserRequest {
    /// Creates a sign-up request.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Administrator-only account transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountTransition {
    Promote,
    Demote,
    Activate,
    Deactivate,
}

impl AccountTransition {
    const fn verb(self) -> &'static str {
        match self {
            Self::Promote => "promote",
            Self::Demote => "demote",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }

    fn apply(self, user: &mut User, clock: &impl Clock) -> Result<(), UserDomainError> {
        match self {
            Self::Promote => user.promote(clock),
            Self::Demote => user.demote(clock),
            Self::Activate => user.activate(clock),
            Self::Deactivate => user.deactivate(clock),
        }
    }
}

/// User account orchestration service.
#[derive(Clone)]
pub struct UserAccountService<R, H, C>
where
    R: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<R, H, C> UserAccountService<R, H, C>
where
    R: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new user account service.
    #[must_use]
    pub const fn new(repository: Arc<R>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            repository,
            hasher,
            clock,
        }
    }

    /// Signs up an inactive account with the plain user role.
    ///
    /// # Errors
    ///
    /// Returns `INVALID "Username already exists"` when the name is taken,
    /// `DATABASE_ERROR` when the password cannot be hashed, or the repository
    /// failure.
    #[tracing::instrument(skip_all)]
    pub async fn create_user(&self, request: CreateUserRequest) -> Outcome<User> {
        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(Failure::invalid("Username already exists"));
        }
        let draft = NewUser::sign_up(
            request.username,
            &request.password,
            &*self.hasher,
            &*self.clock,
        )
        .map_err(Failure::database)?;
        let created = self.repository.create(&draft).await?;
        tracing::info!(user_id = %created.id(), "created user account");
        Ok(created)
    }

    /// Retrieves one account.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND "User not found"` or the repository failure.
    pub async fn find_user(&self, id: UserId) -> Outcome<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Failure::not_found("User not found"))
    }

    /// Lists accounts matching `filter`, ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns the repository failure.
    pub async fn find_users(
        &self,
        filter: UserFilter,
        pagination: Pagination,
    ) -> Outcome<Page<User>> {
        self.repository.find_page(filter, pagination).await
    }

    /// Grants the administrator role to another account.
    ///
    /// # Errors
    ///
    /// Returns `FORBIDDEN` when `current_user` is not an administrator or
    /// targets their own account, `NOT_FOUND` when the target is absent,
    /// `INVALID` when the account is already an administrator, or the
    /// repository failure.
    pub async fn promote_user(&self, id: UserId, current_user: &User) -> Outcome<User> {
        self.transition(AccountTransition::Promote, id, current_user)
            .await
    }

    /// Returns another account to the plain user role.
    ///
    /// # Errors
    ///
    /// Mirrors [`Self::promote_user`].
    pub async fn demote_user(&self, id: UserId, current_user: &User) -> Outcome<User> {
        self.transition(AccountTransition::Demote, id, current_user)
            .await
    }

    /// Allows another account to sign in.
    ///
    /// # Errors
    ///
    /// Mirrors [`Self::promote_user`].
    pub async fn activate_user(&self, id: UserId, current_user: &User) -> Outcome<User> {
        self.transition(AccountTransition::Activate, id, current_user)
            .await
    }

    /// Prevents another account from signing in.
    ///
    /// # Errors
    ///
    /// Mirrors [`Self::promote_user`].
    pub async fn deactivate_user(&self, id: UserId, current_user: &User) -> Outcome<User> {
        self.transition(AccountTransition::Deactivate, id, current_user)
            .await
    }

    #[tracing::instrument(skip_all, fields(action = transition.verb(), user_id = %id))]
    async fn transition(
        &self,
        transition: AccountTransition,
        id: UserId,
        current_user: &User,
    ) -> Outcome<User> {
        let verb = transition.verb();
        if !current_user.is_admin() {
            return Err(Failure::forbidden(format!("Only admins can {verb} users")));
        }
        let mut target = self.find_user(id).await?;
        if target.is_the_same_as(current_user) {
            return Err(Failure::forbidden(format!(
                "Cannot {verb} your own account"
            )));
        }
        transition.apply(&mut target, &*self.clock)?;
        let updated = self.repository.update(&target).await?;
        tracing::info!("updated user account");
        Ok(updated)
    }
}
