//! In-memory repository for tasks and their shares.

use crate::outcome::{Failure, Outcome};
use crate::pagination::{Page, Pagination};
use crate::persistence::InMemoryStore;
use crate::persistence::memory::{StoreState, TaskRecord, check_varchar};
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskFilter, TaskRepository},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Task repository backed by the shared [`InMemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    store: InMemoryStore,
}

impl InMemoryTaskRepository {
    /// Creates a repository over `store`.
    ///
    /// Pass the same store to the user repository so owners and
    /// collaborators can be resolved.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    fn select(&self, predicate: impl Fn(&TaskRecord) -> bool) -> Outcome<Vec<Task>> {
        let state = self.store.read()?;
        state
            .tasks
            .values()
            .filter(|record| predicate(record))
            .map(|record| hydrate(&state, record))
            .collect()
    }
}

fn hydrate(state: &StoreState, record: &TaskRecord) -> Outcome<Task> {
    let owner = state.referenced_user(record.owner_id)?.clone();
    let collaborators = state
        .collaborator_ids(record.id)
        .into_iter()
        .map(|id| state.referenced_user(id).cloned())
        .collect::<Outcome<Vec<_>>>()?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: record.id,
        owner,
        title: record.title.clone(),
        description: record.description.clone(),
        priority: record.priority,
        due_date: record.due_date,
        completed_at: record.completed_at,
        status: record.status,
        collaborators,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }))
}

fn is_visible_to(state: &StoreState, record: &TaskRecord, viewer: UserId) -> bool {
    record.owner_id == viewer
        || state
            .shares
            .iter()
            .any(|share| share.task_id == record.id && share.shared_with_id == viewer)
}

fn insert_missing_shares(state: &mut StoreState, task: &Task) -> Outcome<()> {
    let existing = state.collaborator_ids(task.id());
    for collaborator in task.collaborators() {
        if existing.contains(&collaborator.id()) {
            continue;
        }
        state.insert_share(task.id(), task.owner_id(), collaborator.id(), Utc::now())?;
    }
    Ok(())
}

fn patch_task(state: &mut StoreState, task: &Task) -> Outcome<()> {
    check_varchar(task.title())?;
    let record = state
        .tasks
        .get_mut(&task.id())
        .ok_or_else(|| Failure::not_found("Task not found"))?;
    record.title = task.title().to_owned();
    record.description = task.description().map(str::to_owned);
    record.priority = task.priority();
    record.due_date = task.due_date();
    record.completed_at = record.completed_at.or(task.completed_at());
    record.updated_at = task.updated_at();
    Ok(())
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: TaskId) -> Outcome<Option<Task>> {
        let state = self.store.read()?;
        state
            .tasks
            .get(&id)
            .map(|record| hydrate(&state, record))
            .transpose()
    }

    async fn create(&self, task: &NewTask) -> Outcome<Task> {
        check_varchar(task.title())?;
        self.store.transaction(|state| {
            state.referenced_user(task.owner_id())?;
            let id = state.next_task_id();
            let record = TaskRecord {
                id,
                owner_id: task.owner_id(),
                title: task.title().to_owned(),
                description: task.description().map(str::to_owned),
                priority: task.priority(),
                due_date: task.due_date(),
                completed_at: None,
                status: None,
                created_at: task.created_at(),
                updated_at: task.updated_at(),
            };
            let created = hydrate(state, &record)?;
            state.tasks.insert(id, record);
            Ok(created)
        })
    }

    async fn update(&self, task: &Task) -> Outcome<Task> {
        self.store.transaction(|state| {
            if !state.tasks.contains_key(&task.id()) {
                return Err(Failure::not_found("Task not found"));
            }
            insert_missing_shares(state, task)?;
            patch_task(state, task)?;
            let record = state
                .tasks
                .get(&task.id())
                .ok_or_else(|| Failure::not_found("Task not found"))?;
            hydrate(state, record)
        })
    }

    async fn find_visible_page(
        &self,
        viewer: UserId,
        filter: TaskFilter,
        pagination: Pagination,
    ) -> Outcome<Page<Task>> {
        let state = self.store.read()?;
        let visible = state
            .tasks
            .values()
            .filter(|record| is_visible_to(&state, record, viewer))
            .map(|record| hydrate(&state, record))
            .collect::<Outcome<Vec<_>>>()?;
        let matching = visible
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();
        Ok(Page::from_ordered(matching, pagination))
    }

    async fn find_open_late_tasks(&self, now: DateTime<Utc>) -> Outcome<Vec<Task>> {
        self.select(|record| {
            record.completed_at.is_none()
                && record.due_date.is_some_and(|due| due < now)
                && record.status != Some(TaskStatus::Late)
        })
    }

    async fn find_completed_tasks_not_marked_as_done(&self) -> Outcome<Vec<Task>> {
        self.select(|record| {
            record.completed_at.is_some() && record.status != Some(TaskStatus::Done)
        })
    }

    async fn update_tasks_status(&self, ids: &[TaskId], status: TaskStatus) -> Outcome<u64> {
        self.store.transaction(|state| {
            let mut affected = 0_u64;
            for id in ids {
                if let Some(record) = state.tasks.get_mut(id) {
                    record.status = Some(status);
                    affected += 1;
                }
            }
            Ok(affected)
        })
    }
}
