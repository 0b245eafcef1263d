//! Process environment guard for configuration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Variables read by `AppConfig::from_env`.
pub const CONFIG_VARIABLES: [&str; 7] = [
    "DATABASE_URL",
    "DATABASE_POOL_SIZE",
    "JWT_SECRET",
    "JWT_EXPIRATION_HOURS",
    "STATUS_JOB_INTERVAL_SECS",
    "LOG_LEVEL",
    "RUST_LOG",
];

/// Holds the environment lock and restores the previous values on drop.
pub struct EnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Clears every configuration variable, then applies `overrides`.
    pub fn configure(overrides: &[(&'static str, &str)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = CONFIG_VARIABLES
            .iter()
            .map(|name| (*name, env::var(name).ok()))
            .collect();
        for name in CONFIG_VARIABLES {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                env::remove_var(name);
            }
        }
        for (name, value) in overrides {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                env::set_var(name, value);
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(name, previous),
                    None => env::remove_var(name),
                }
            }
        }
    }
}
