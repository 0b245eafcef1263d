//! Store plumbing shared by the task and user adapters.
//!
//! - [`schema`]: Diesel table definitions
//! - [`pool`]: connection pooling and blocking offload for `PostgreSQL`
//! - [`memory`]: the in-memory store backing the memory adapters

pub mod memory;
pub mod pool;
pub mod schema;

pub use memory::InMemoryStore;
pub use pool::{PgPool, build_pool};

/// Maximum length of `VARCHAR(255)` columns such as titles and usernames.
pub const MAX_VARCHAR_LENGTH: usize = 255;
