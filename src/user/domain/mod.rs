//! Domain model for user accounts.
//!
//! Accounts are created inactive with the plain user role and only change
//! through the explicit transitions on [`User`].

mod error;
mod ids;
mod role;
mod user;

pub use error::{ParseUserRoleError, ParseUserStatusError, UserDomainError};
pub use ids::UserId;
pub use role::{UserRole, UserStatus};
pub use user::{NewUser, PersistedUserData, User};
