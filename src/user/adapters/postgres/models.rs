//! Diesel row models for user persistence.

use crate::outcome::{Failure, Outcome};
use crate::persistence::schema::users;
use crate::user::domain::{NewUser, PersistedUserData, User, UserId, UserRole, UserStatus};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub(crate) id: i64,
    pub(crate) role: String,
    pub(crate) status: String,
    pub(crate) username: String,
    pub(crate) encrypted_password: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Converts the row into the domain aggregate.
    pub(crate) fn into_user(self) -> Outcome<User> {
        let role = UserRole::try_from(self.role.as_str()).map_err(Failure::database)?;
        let status = UserStatus::try_from(self.status.as_str()).map_err(Failure::database)?;
        Ok(User::from_persisted(PersistedUserData {
            id: UserId::new(self.id),
            role,
            status,
            username: self.username,
            encrypted_password: self.encrypted_password,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(super) struct NewUserRow {
    pub(super) role: String,
    pub(super) status: String,
    pub(super) username: String,
    pub(super) encrypted_password: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<&NewUser> for NewUserRow {
    fn from(user: &NewUser) -> Self {
        Self {
            role: user.role().as_str().to_owned(),
            status: user.status().as_str().to_owned(),
            username: user.username().to_owned(),
            encrypted_password: user.encrypted_password().to_owned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Changeset written when an account transitions.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(super) struct UserChangeset {
    pub(super) role: String,
    pub(super) status: String,
    pub(super) updated_at: DateTime<Utc>,
}

impl From<&User> for UserChangeset {
    fn from(user: &User) -> Self {
        Self {
            role: user.role().as_str().to_owned(),
            status: user.status().as_str().to_owned(),
            updated_at: user.updated_at(),
        }
    }
}
