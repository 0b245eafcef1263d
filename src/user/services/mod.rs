//! Application services for user account management.

mod account;

pub use account::{CreateUserRequest, UserAccountService};
