//! The "mark late" and "mark done" jobs.

use crate::outcome::{Failure, Outcome};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::TaskRepository,
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;

/// Message reported when a job finds no candidates.
pub(crate) const NO_TASKS_TO_UPDATE: &str = "No tasks found to update";

/// One of the two reclassification jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusJobKind {
    /// Labels open tasks whose due date has passed.
    MarkLate,
    /// Labels completed tasks.
    MarkDone,
}

impl StatusJobKind {
    /// Returns the label the job writes.
    #[must_use]
    pub const fn target_status(self) -> TaskStatus {
        match self {
            Self::MarkLate => TaskStatus::Late,
            Self::MarkDone => TaskStatus::Done,
        }
    }

    /// Returns the job name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MarkLate => "mark-late",
            Self::MarkDone => "mark-done",
        }
    }
}

impl fmt::Display for StatusJobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcomes of one run of both jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclassificationReport {
    /// Outcome of the "mark late" job.
    pub late: Outcome<u64>,
    /// Outcome of the "mark done" job.
    pub done: Outcome<u64>,
}

/// Runs the reclassification jobs against a task repository.
#[derive(Clone)]
pub struct StatusReclassifier<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> StatusReclassifier<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a reclassifier.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Runs one job and returns the number of relabelled tasks.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND "No tasks found to update"` when nothing qualifies,
    /// or the repository failure.
    pub async fn run(&self, kind: StatusJobKind) -> Outcome<u64> {
        let candidates = match kind {
            StatusJobKind::MarkLate => {
                self.repository
                    .find_open_late_tasks(self.clock.utc())
                    .await?
            }
            StatusJobKind::MarkDone => {
                self.repository
                    .find_completed_tasks_not_marked_as_done()
                    .await?
            }
        };
        if candidates.is_empty() {
            return Err(Failure::not_found(NO_TASKS_TO_UPDATE));
        }
        let ids: Vec<TaskId> = candidates.iter().map(Task::id).collect();
        self.repository
            .update_tasks_status(&ids, kind.target_status())
            .await
    }

    /// Labels open tasks past their due date as `LATE`.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn mark_late(&self) -> Outcome<u64> {
        self.run(StatusJobKind::MarkLate).await
    }

    /// Labels completed tasks as `DONE`.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn mark_done(&self) -> Outcome<u64> {
        self.run(StatusJobKind::MarkDone).await
    }

    /// Runs both jobs concurrently; a failure in one does not stop the other.
    pub async fn run_all(&self) -> ReclassificationReport {
        let (late, done) = tokio::join!(self.mark_late(), self.mark_done());
        ReclassificationReport { late, done }
    }
}
