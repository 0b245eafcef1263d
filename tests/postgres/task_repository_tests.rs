//! Task repository behaviour against a real database.

use crate::postgres::helpers::PgFixture;
use chrono::TimeDelta;
use dundertasks::outcome::{Failure, FailureCode};
use dundertasks::pagination::Pagination;
use dundertasks::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus},
    ports::{TaskFilter, TaskRepository},
};
use dundertasks::user::domain::{User, UserId};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

fn with_title(task: &Task, title: String, collaborators: Vec<User>) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: task.id(),
        owner: task.owner().clone(),
        title,
        description: task.description().map(str::to_owned),
        priority: task.priority(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
        status: task.status(),
        collaborators,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

// ============================================================================
// Round trips
// ============================================================================

#[rstest]
fn create_then_find_returns_hydrated_task(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_round_trip").expect("database setup");
    let owner = db.user("angela");
    let draft = NewTask::new(owner.id(), "Plan party", &db.clock)
        .with_description("Theme: cats")
        .with_priority(TaskPriority::Medium)
        .with_due_date(db.clock.0 + TimeDelta::days(3));

    let created = db.task(&draft);
    let found = db
        .runtime
        .block_on(db.tasks.find_by_id(created.id()))
        .expect("lookup succeeds")
        .expect("task exists");

    assert_eq!(found, created);
    assert_eq!(found.owner(), &owner);
    assert_eq!(found.description(), Some("Theme: cats"));
    assert_eq!(found.priority(), TaskPriority::Medium);
    assert_eq!(found.due_date(), Some(db.clock.0 + TimeDelta::days(3)));
    assert_eq!(found.created_at(), db.clock.0);
    assert_eq!(found.status(), None);
    assert!(found.collaborators().is_empty());
}

#[rstest]
fn find_missing_task_is_absent(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_missing").expect("database setup");

    let found = db
        .runtime
        .block_on(db.tasks.find_by_id(TaskId::new(4242)))
        .expect("lookup succeeds");

    assert!(found.is_none());
}

#[rstest]
fn create_with_unknown_owner_is_a_database_error(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_orphan").expect("database setup");

    let err = db
        .runtime
        .block_on(
            db.tasks
                .create(&NewTask::new(UserId::new(77), "Orphan", &db.clock)),
        )
        .expect_err("foreign key violation");

    assert_eq!(err.code(), FailureCode::DatabaseError);
}

// ============================================================================
// Sharing and patch atomicity
// ============================================================================

#[rstest]
fn update_appends_collaborators_in_grant_order(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_share_order").expect("database setup");
    let owner = db.user("oscar");
    let first = db.user("kevin");
    let second = db.user("angela");
    let mut task = db.task(&NewTask::new(owner.id(), "Audit", &db.clock));

    task.share_with(first.clone(), &db.clock).expect("share");
    let mut saved = db
        .runtime
        .block_on(db.tasks.update(&task))
        .expect("first update");
    saved.share_with(second.clone(), &db.clock).expect("share");
    let updated = db
        .runtime
        .block_on(db.tasks.update(&saved))
        .expect("second update");

    assert_eq!(updated.collaborators(), &[first, second]);
    assert_eq!(db.share_rows(&updated), 2);
}

#[rstest]
fn failed_patch_rolls_back_queued_shares(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_rollback").expect("database setup");
    let owner = db.user("creed");
    let collaborator = db.user("meredith");
    let task = db.task(&NewTask::new(owner.id(), "Quality assurance", &db.clock));
    let oversized = with_title(&task, "x".repeat(256), vec![collaborator]);

    let err = db
        .runtime
        .block_on(db.tasks.update(&oversized))
        .expect_err("title exceeds the column");

    assert_eq!(err.code(), FailureCode::DatabaseError);
    let persisted = db
        .runtime
        .block_on(db.tasks.find_by_id(task.id()))
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(persisted, task);
    assert_eq!(db.share_rows(&task), 0);
}

#[rstest]
fn duplicate_share_row_is_a_database_error(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_dup_share").expect("database setup");
    let owner = db.user("dwight");
    let collaborator = db.user("mose");
    let task = db.task(&NewTask::new(owner.id(), "Beet harvest", &db.clock));
    let doubled = with_title(
        &task,
        "Beet harvest, twice".to_owned(),
        vec![collaborator.clone(), collaborator],
    );

    let err = db
        .runtime
        .block_on(db.tasks.update(&doubled))
        .expect_err("unique share constraint");

    assert_eq!(err.code(), FailureCode::DatabaseError);
    assert_eq!(db.share_rows(&task), 0);
    let persisted = db
        .runtime
        .block_on(db.tasks.find_by_id(task.id()))
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(persisted.title(), "Beet harvest");
}

#[rstest]
fn update_of_missing_task_is_not_found(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_update_missing").expect("database setup");
    let owner = db.user("holly");
    let task = db.task(&NewTask::new(owner.id(), "Welcome", &db.clock));
    let ghost = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(task.id().value() + 100),
        owner,
        title: "Ghost".to_owned(),
        description: None,
        priority: TaskPriority::None,
        due_date: None,
        completed_at: None,
        status: None,
        collaborators: Vec::new(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    });

    let err = db
        .runtime
        .block_on(db.tasks.update(&ghost))
        .expect_err("missing task");

    assert_eq!(err, Failure::not_found("Task not found"));
}

#[rstest]
fn stale_update_keeps_completion(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_stale").expect("database setup");
    let owner = db.user("jim");
    let task = db.task(&NewTask::new(owner.id(), "Sales call", &db.clock));
    let mut finisher = task.clone();
    let mut stale = task.clone();

    finisher.complete(&db.clock).expect("complete");
    db.runtime
        .block_on(db.tasks.update(&finisher))
        .expect("completion saved");
    stale
        .prioritize(TaskPriority::High, &db.clock)
        .expect("raise");
    let updated = db
        .runtime
        .block_on(db.tasks.update(&stale))
        .expect("stale update saved");

    assert_eq!(updated.completed_at(), Some(db.clock.0));
    assert_eq!(updated.priority(), TaskPriority::High);
}

// ============================================================================
// Listing
// ============================================================================

#[rstest]
fn visible_page_covers_owned_and_shared_tasks(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_visible").expect("database setup");
    let owner = db.user("darryl");
    let viewer = db.user("val");
    let stranger = db.user("roy");
    let mut shared = db.task(&NewTask::new(owner.id(), "Inventory", &db.clock));
    shared.share_with(viewer.clone(), &db.clock).expect("share");
    db.runtime
        .block_on(db.tasks.update(&shared))
        .expect("update");
    let own = db.task(
        &NewTask::new(viewer.id(), "Own list", &db.clock).with_priority(TaskPriority::High),
    );
    db.task(&NewTask::new(stranger.id(), "Hidden", &db.clock));

    let all = db
        .runtime
        .block_on(db.tasks.find_visible_page(
            viewer.id(),
            TaskFilter::default(),
            Pagination::default(),
        ))
        .expect("listing succeeds");
    let second_page = db
        .runtime
        .block_on(db.tasks.find_visible_page(
            viewer.id(),
            TaskFilter::default(),
            Pagination::new(2, 1),
        ))
        .expect("listing succeeds");
    let urgent = db
        .runtime
        .block_on(db.tasks.find_visible_page(
            viewer.id(),
            TaskFilter::default()
                .with_completed(false)
                .with_priority(TaskPriority::High),
            Pagination::default(),
        ))
        .expect("listing succeeds");

    assert_eq!(all.total, 2);
    let ids: Vec<TaskId> = all.results.iter().map(Task::id).collect();
    assert_eq!(ids, vec![shared.id(), own.id()]);
    assert_eq!(second_page.total, 2);
    assert_eq!(second_page.results.len(), 1);
    assert_eq!(second_page.results.first().map(Task::id), Some(own.id()));
    assert_eq!(urgent.total, 1);
    assert_eq!(urgent.results.first().map(Task::id), Some(own.id()));
}

// ============================================================================
// Reclassification queries
// ============================================================================

#[rstest]
fn late_query_selects_open_overdue_tasks_until_labelled(
    shared_test_cluster: &'static TestCluster,
) {
    let db = PgFixture::new(shared_test_cluster, "task_late").expect("database setup");
    let owner = db.user("toby");
    let overdue = db.task(
        &NewTask::new(owner.id(), "File report", &db.clock)
            .with_due_date(db.clock.0 - TimeDelta::days(2)),
    );
    db.task(
        &NewTask::new(owner.id(), "Future", &db.clock)
            .with_due_date(db.clock.0 + TimeDelta::days(2)),
    );
    db.task(&NewTask::new(owner.id(), "No due date", &db.clock));

    let candidates = db
        .runtime
        .block_on(db.tasks.find_open_late_tasks(db.clock.0))
        .expect("query succeeds");
    assert_eq!(
        candidates.iter().map(Task::id).collect::<Vec<_>>(),
        vec![overdue.id()]
    );

    let affected = db
        .runtime
        .block_on(db.tasks.update_tasks_status(&[overdue.id()], TaskStatus::Late))
        .expect("relabel");
    let rerun = db
        .runtime
        .block_on(db.tasks.find_open_late_tasks(db.clock.0))
        .expect("query succeeds");

    assert_eq!(affected, 1);
    assert!(rerun.is_empty());
}

#[rstest]
fn done_query_selects_completed_tasks_including_late_ones(
    shared_test_cluster: &'static TestCluster,
) {
    let db = PgFixture::new(shared_test_cluster, "task_done").expect("database setup");
    let owner = db.user("kelly");
    let mut late = db.task(
        &NewTask::new(owner.id(), "Customer call", &db.clock)
            .with_due_date(db.clock.0 - TimeDelta::days(1)),
    );
    db.runtime
        .block_on(db.tasks.update_tasks_status(&[late.id()], TaskStatus::Late))
        .expect("relabel");
    late.complete(&db.clock).expect("complete");
    db.runtime
        .block_on(db.tasks.update(&late))
        .expect("completion saved");
    db.task(&NewTask::new(owner.id(), "Still open", &db.clock));

    let candidates = db
        .runtime
        .block_on(db.tasks.find_completed_tasks_not_marked_as_done())
        .expect("query succeeds");
    assert_eq!(
        candidates.iter().map(Task::id).collect::<Vec<_>>(),
        vec![late.id()]
    );
    assert_eq!(
        candidates.first().and_then(Task::status),
        Some(TaskStatus::Late)
    );

    db.runtime
        .block_on(db.tasks.update_tasks_status(&[late.id()], TaskStatus::Done))
        .expect("relabel");
    let rerun = db
        .runtime
        .block_on(db.tasks.find_completed_tasks_not_marked_as_done())
        .expect("query succeeds");
    assert!(rerun.is_empty());
}

#[rstest]
fn status_update_counts_only_existing_rows(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "task_status_count").expect("database setup");
    let owner = db.user("nellie");
    let first = db.task(&NewTask::new(owner.id(), "Rebrand", &db.clock));
    let second = db.task(&NewTask::new(owner.id(), "Reorganise", &db.clock));

    let empty = db
        .runtime
        .block_on(db.tasks.update_tasks_status(&[], TaskStatus::Done))
        .expect("empty batch");
    let affected = db
        .runtime
        .block_on(db.tasks.update_tasks_status(
            &[first.id(), second.id(), TaskId::new(second.id().value() + 50)],
            TaskStatus::Done,
        ))
        .expect("relabel");

    assert_eq!(empty, 0);
    assert_eq!(affected, 2);
    let relabelled = db
        .runtime
        .block_on(db.tasks.find_by_id(first.id()))
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(relabelled.status(), Some(TaskStatus::Done));
}
