//! Shared world state for task sharing BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use dundertasks::auth::{AuthError, PasswordHasher};
use dundertasks::outcome::Outcome;
use dundertasks::persistence::InMemoryStore;
use dundertasks::status_job::StatusReclassifier;
use dundertasks::task::{
    adapters::memory::InMemoryTaskRepository, domain::Task, services::TaskLifecycleService,
};
use dundertasks::user::{adapters::memory::InMemoryUserRepository, domain::User};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryUserRepository, DefaultClock>;

/// Hasher that tags the plaintext instead of deriving a digest.
pub struct TaggingHasher;

impl PasswordHasher for TaggingHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        Ok(format!("tagged:{plaintext}"))
    }

    fn matches(&self, plaintext: &str, digest: &str) -> bool {
        digest.strip_prefix("tagged:") == Some(plaintext)
    }
}

/// Scenario world for task sharing behaviour tests.
pub struct SharingWorld {
    /// User repository over the shared store.
    pub users: Arc<InMemoryUserRepository>,
    /// Task repository over the shared store.
    pub tasks: Arc<InMemoryTaskRepository>,
    /// Reclassification jobs over the shared store.
    pub reclassifier: StatusReclassifier<InMemoryTaskRepository, DefaultClock>,
    /// The task service under test.
    pub service: TestTaskService,
    /// Accounts created by the scenario, keyed by username.
    pub accounts: HashMap<String, User>,
    /// The task the scenario acts on.
    pub task: Option<Task>,
    /// Result of the last task request.
    pub last_result: Option<Outcome<Task>>,
    /// Result of the last job run.
    pub last_job_result: Option<Outcome<u64>>,
}

impl SharingWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let users = Arc::new(InMemoryUserRepository::new(store.clone()));
        let tasks = Arc::new(InMemoryTaskRepository::new(store));
        let clock = Arc::new(DefaultClock);
        Self {
            reclassifier: StatusReclassifier::new(Arc::clone(&tasks), Arc::clone(&clock)),
            service: TaskLifecycleService::new(Arc::clone(&tasks), Arc::clone(&users), clock),
            users,
            tasks,
            accounts: HashMap::new(),
            task: None,
            last_result: None,
            last_job_result: None,
        }
    }

    /// Returns the account created for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error when the scenario never created the account.
    pub fn account(&self, username: &str) -> Result<User, eyre::Report> {
        self.accounts
            .get(username)
            .cloned()
            .ok_or_else(|| eyre::eyre!("no account named {username} in scenario world"))
    }

    /// Returns the task the scenario acts on.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Records a task request result, keeping the task current on success.
    pub fn record(&mut self, result: Outcome<Task>) {
        if let Ok(ref updated) = result {
            self.task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for SharingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SharingWorld {
    SharingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
