//! In-memory relational store shared by the memory adapters.
//!
//! Tasks, users, and shares live in one state value so the task adapter can
//! hydrate owners and collaborators the same way the `PostgreSQL` adapter
//! joins them. Multi-step writes go through [`InMemoryStore::transaction`],
//! which stages changes on a copy and commits only when every step succeeds.

use crate::outcome::{Failure, Outcome};
use crate::task::domain::{TaskId, TaskPriority, TaskStatus};
use crate::user::domain::{User, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

/// Row-level contents of the in-memory store.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) tasks: BTreeMap<TaskId, TaskRecord>,
    pub(crate) shares: Vec<ShareRecord>,
    last_user_id: i64,
    last_task_id: i64,
    last_share_id: i64,
}

/// Scalar task columns, as stored in the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskRecord {
    pub(crate) id: TaskId,
    pub(crate) owner_id: UserId,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) priority: TaskPriority,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    pub(crate) status: Option<TaskStatus>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// A collaborator grant, as stored in the `task_shares` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShareRecord {
    pub(crate) id: i64,
    pub(crate) task_id: TaskId,
    pub(crate) shared_by_id: UserId,
    pub(crate) shared_with_id: UserId,
    pub(crate) shared_at: DateTime<Utc>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Outcome<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|err| Failure::database(err.to_string()))
    }

    pub(crate) fn write(&self) -> Outcome<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|err| Failure::database(err.to_string()))
    }

    /// Runs `f` against a staged copy of the state and commits it on success.
    ///
    /// A failure from `f` leaves the committed state untouched.
    pub(crate) fn transaction<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Outcome<T>,
    ) -> Outcome<T> {
        let mut committed = self.write()?;
        let mut staged = committed.clone();
        let value = f(&mut staged)?;
        *committed = staged;
        Ok(value)
    }
}

impl StoreState {
    pub(crate) fn next_user_id(&mut self) -> UserId {
        self.last_user_id += 1;
        UserId::new(self.last_user_id)
    }

    pub(crate) fn next_task_id(&mut self) -> TaskId {
        self.last_task_id += 1;
        TaskId::new(self.last_task_id)
    }

    /// Returns the collaborators of a task in the order they were added.
    pub(crate) fn collaborator_ids(&self, task_id: TaskId) -> Vec<UserId> {
        let mut shares: Vec<&ShareRecord> = self
            .shares
            .iter()
            .filter(|share| share.task_id == task_id)
            .collect();
        shares.sort_by_key(|share| (share.shared_at, share.id));
        shares.into_iter().map(|share| share.shared_with_id).collect()
    }

    /// Appends a share after enforcing its foreign keys and uniqueness.
    pub(crate) fn insert_share(
        &mut self,
        task_id: TaskId,
        shared_by_id: UserId,
        shared_with_id: UserId,
        shared_at: DateTime<Utc>,
    ) -> Outcome<()> {
        let share = ShareRecord {
            id: self.last_share_id + 1,
            task_id,
            shared_by_id,
            shared_with_id,
            shared_at,
        };
        if !self.tasks.contains_key(&share.task_id) {
            return Err(Failure::database(format!(
                "insert or update violates foreign key constraint: task {} does not exist",
                share.task_id
            )));
        }
        self.referenced_user(share.shared_by_id)?;
        self.referenced_user(share.shared_with_id)?;
        if self.shares.iter().any(|existing| {
            existing.task_id == share.task_id && existing.shared_with_id == share.shared_with_id
        }) {
            return Err(Failure::database(
                "duplicate key value violates unique constraint \"task_shares_task_id_shared_with_id_unique\"",
            ));
        }
        self.last_share_id = share.id;
        self.shares.push(share);
        Ok(())
    }

    /// Resolves a user referenced by a foreign key.
    pub(crate) fn referenced_user(&self, id: UserId) -> Outcome<&User> {
        self.users.get(&id).ok_or_else(|| {
            Failure::database(format!(
                "insert or update violates foreign key constraint: user {id} does not exist"
            ))
        })
    }
}

/// Mirrors the `VARCHAR(255)` length check performed by `PostgreSQL`.
pub(crate) fn check_varchar(value: &str) -> Outcome<()> {
    if value.chars().count() > super::MAX_VARCHAR_LENGTH {
        return Err(Failure::database(format!(
            "value too long for type character varying({})",
            super::MAX_VARCHAR_LENGTH
        )));
    }
    Ok(())
}
