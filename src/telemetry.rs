//! Tracing subscriber setup for the binaries.

use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::TryInitError};

/// Installs a formatted tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used as the
/// filter directive.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing(default_level: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
}
