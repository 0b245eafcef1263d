//! Dundertasks: task management with sharing and status reclassification.
//!
//! Users own tasks, share them with up to five collaborators, prioritize and
//! complete them, while administrators manage account roles and activation.
//! A background job periodically labels tasks as `LATE` or `DONE`.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: entities enforcing business rules, free of infrastructure
//! - **Ports**: repository and collaborator traits
//! - **Adapters**: in-memory and `PostgreSQL` implementations of the ports
//! - **Services**: use cases composing fetch, authorize, transition, persist
//!
//! Every expected failure is an [`outcome::Failure`] tagged with a
//! [`outcome::FailureCode`].
//!
//! # Modules
//!
//! - [`task`]: task creation, sharing, prioritization, and completion
//! - [`user`]: sign-up, roles, and activation
//! - [`auth`]: password hashing, session tokens, and sign-in
//! - [`status_job`]: periodic `LATE` / `DONE` reclassification
//! - [`persistence`]: schema, pooling, and the in-memory store

pub mod auth;
pub mod config;
pub mod outcome;
pub mod pagination;
pub mod persistence;
pub mod status_job;
pub mod task;
pub mod telemetry;
pub mod user;
