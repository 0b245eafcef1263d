//! User repository behaviour against a real database.

use crate::postgres::helpers::{PgFixture, TaggingHasher};
use dundertasks::outcome::{Failure, FailureCode};
use dundertasks::pagination::Pagination;
use dundertasks::user::{
    domain::{NewUser, PersistedUserData, User, UserId, UserRole, UserStatus},
    ports::{UserFilter, UserRepository},
};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn create_then_find_by_id_and_username(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "user_round_trip").expect("database setup");
    let draft = NewUser::sign_up("pam", "watercolours", &TaggingHasher, &db.clock)
        .expect("sign-up");

    let created = db
        .runtime
        .block_on(db.users.create(&draft))
        .expect("create succeeds");
    let by_id = db
        .runtime
        .block_on(db.users.find_by_id(created.id()))
        .expect("lookup succeeds");
    let by_name = db
        .runtime
        .block_on(db.users.find_by_username("pam"))
        .expect("lookup succeeds");

    assert_eq!(created.role(), UserRole::User);
    assert_eq!(created.status(), UserStatus::Inactive);
    assert_eq!(created.encrypted_password(), "tagged:watercolours");
    assert_eq!(created.created_at(), db.clock.0);
    assert_eq!(by_id.as_ref(), Some(&created));
    assert_eq!(by_name, Some(created));
}

#[rstest]
fn duplicate_username_is_a_database_error(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "user_duplicate").expect("database setup");
    db.user("jim");
    let again = NewUser::sign_up("jim", "pranks", &TaggingHasher, &db.clock).expect("sign-up");

    let err = db
        .runtime
        .block_on(db.users.create(&again))
        .expect_err("unique username");

    assert_eq!(err.code(), FailureCode::DatabaseError);
}

#[rstest]
fn find_page_filters_and_pages_by_id(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "user_page").expect("database setup");
    let boss = db.user_with_role("michael", UserRole::Admin);
    let first = db.user("dwight");
    let second = db.user("jim");
    let third = db.user("pam");

    let admins = db
        .runtime
        .block_on(db.users.find_page(
            UserFilter::default().with_role(UserRole::Admin),
            Pagination::default(),
        ))
        .expect("listing succeeds");
    let members = db
        .runtime
        .block_on(db.users.find_page(
            UserFilter::default()
                .with_role(UserRole::User)
                .with_status(UserStatus::Active),
            Pagination::new(2, 2),
        ))
        .expect("listing succeeds");
    let first_members = db
        .runtime
        .block_on(db.users.find_page(
            UserFilter::default().with_role(UserRole::User),
            Pagination::new(1, 2),
        ))
        .expect("listing succeeds");

    assert_eq!(admins.total, 1);
    assert_eq!(admins.results, vec![boss]);
    assert_eq!(members.total, 3);
    assert_eq!(members.results, vec![third]);
    assert_eq!(first_members.results, vec![first, second]);
}

#[rstest]
fn update_persists_role_and_status(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "user_update").expect("database setup");
    let mut ryan = db.user("ryan");

    ryan.promote(&db.clock).expect("promote");
    ryan.deactivate(&db.clock).expect("deactivate");
    let updated = db
        .runtime
        .block_on(db.users.update(&ryan))
        .expect("update succeeds");
    let reloaded = db
        .runtime
        .block_on(db.users.find_by_id(ryan.id()))
        .expect("lookup succeeds");

    assert_eq!(updated.role(), UserRole::Admin);
    assert_eq!(updated.status(), UserStatus::Inactive);
    assert_eq!(reloaded, Some(updated));
}

#[rstest]
fn update_of_missing_user_is_not_found(shared_test_cluster: &'static TestCluster) {
    let db = PgFixture::new(shared_test_cluster, "user_update_missing").expect("database setup");
    let ghost = User::from_persisted(PersistedUserData {
        id: UserId::new(9001),
        role: UserRole::User,
        status: UserStatus::Active,
        username: "ghost".to_owned(),
        encrypted_password: "tagged:boo".to_owned(),
        created_at: db.clock.0,
        updated_at: db.clock.0,
    });

    let err = db
        .runtime
        .block_on(db.users.update(&ghost))
        .expect_err("missing user");

    assert_eq!(err, Failure::not_found("User not found"));
}
