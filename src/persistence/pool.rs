//! Connection pooling and blocking-offload helpers for `PostgreSQL`.

use crate::outcome::{Failure, Outcome};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool shared by the repository adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns a `DATABASE_ERROR` failure when the pool cannot be created.
pub fn build_pool(database_url: &str, max_size: u32) -> Outcome<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(Failure::database)
}

/// Checks out a connection and runs `f` on the blocking thread pool.
///
/// Pool checkout failures and join errors are reported as `DATABASE_ERROR`.
pub(crate) async fn run_blocking<F, T>(pool: &PgPool, f: F) -> Outcome<T>
where
    F: FnOnce(&mut PgConnection) -> Outcome<T> + Send + 'static,
    T: Send + 'static,
{
    let checkout = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = checkout.get().map_err(Failure::database)?;
        f(&mut connection)
    })
    .await
    .map_err(Failure::database)?
}

impl From<diesel::result::Error> for Failure {
    fn from(err: diesel::result::Error) -> Self {
        Self::database(err)
    }
}
