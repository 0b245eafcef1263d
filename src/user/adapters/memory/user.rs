//! In-memory repository for user accounts.

use crate::outcome::{Failure, Outcome};
use crate::pagination::{Page, Pagination};
use crate::persistence::InMemoryStore;
use crate::persistence::memory::check_varchar;
use crate::user::{
    domain::{NewUser, User, UserId},
    ports::{UserFilter, UserRepository},
};
use async_trait::async_trait;

/// User repository backed by the shared [`InMemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Outcome<Option<User>> {
        let state = self.store.read()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Outcome<Option<User>> {
        let state = self.store.read()?;
        Ok(state
            .users
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_page(&self, filter: UserFilter, pagination: Pagination) -> Outcome<Page<User>> {
        let state = self.store.read()?;
        let matching = state
            .users
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        Ok(Page::from_ordered(matching, pagination))
    }

    async fn create(&self, user: &NewUser) -> Outcome<User> {
        check_varchar(user.username())?;
        check_varchar(user.encrypted_password())?;
        self.store.transaction(|state| {
            if state
                .users
                .values()
                .any(|existing| existing.username() == user.username())
            {
                return Err(Failure::database(
                    "duplicate key value violates unique constraint \"users_username_unique\"",
                ));
            }
            let id = state.next_user_id();
            let created = user.clone().into_user(id);
            state.users.insert(id, created.clone());
            Ok(created)
        })
    }

    async fn update(&self, user: &User) -> Outcome<User> {
        self.store.transaction(|state| {
            let stored = state
                .users
                .get_mut(&user.id())
                .ok_or_else(|| Failure::not_found("User not found"))?;
            *stored = user.clone();
            Ok(user.clone())
        })
    }
}
