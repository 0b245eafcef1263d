//! Credential hashing, session tokens, and sign-in.
//!
//! - [`ports`]: hashing and token contracts plus the [`Claims`] payload
//! - [`Argon2PasswordHasher`] and [`JwtTokenIssuer`]: production adapters
//! - [`AuthenticationService`]: credential checks and token resolution

mod error;
mod hasher;
pub mod ports;
mod service;
mod token;

pub use error::AuthError;
pub use hasher::Argon2PasswordHasher;
pub use ports::{Claims, PasswordHasher, TokenIssuer};
pub use service::{AuthenticationError, AuthenticationService, LoginAttempt, SessionCheck};
pub use token::JwtTokenIssuer;
