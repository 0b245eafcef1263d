//! Account lifecycle across sign-up, administration, and sign-in.

use crate::in_memory::helpers::{Backend, backend};
use dundertasks::auth::{LoginAttempt, SessionCheck};
use dundertasks::outcome::{Failure, FailureCode};
use dundertasks::pagination::Pagination;
use dundertasks::user::{
    domain::{UserRole, UserStatus},
    ports::UserFilter,
    services::CreateUserRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_account_can_sign_in_after_activation(backend: Backend) {
    let admin = backend.seed("michael", UserRole::Admin).await;
    let pam = backend
        .accounts
        .create_user(CreateUserRequest::new("pam", "beesly"))
        .await
        .expect("sign-up succeeds");

    let before = backend
        .sessions
        .login("pam", "beesly")
        .await
        .expect("login completes");
    backend
        .accounts
        .activate_user(pam.id(), &admin)
        .await
        .expect("activation succeeds");
    let after = backend
        .sessions
        .login("pam", "beesly")
        .await
        .expect("login completes");

    assert_eq!(before, LoginAttempt::Inactive);
    let LoginAttempt::Granted { token, user } = after else {
        panic!("expected granted login");
    };
    assert_eq!(user.status(), UserStatus::Active);
    let session = backend
        .sessions
        .resolve_current_user(&token)
        .await
        .expect("resolution completes");
    assert_eq!(session, SessionCheck::Authenticated(user));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivation_invalidates_existing_sessions(backend: Backend) {
    let admin = backend.seed("jan", UserRole::Admin).await;
    let ryan = backend.seed("ryan", UserRole::User).await;
    let LoginAttempt::Granted { token, .. } = backend
        .sessions
        .login("ryan", "password")
        .await
        .expect("login completes")
    else {
        panic!("expected granted login");
    };

    backend
        .accounts
        .deactivate_user(ryan.id(), &admin)
        .await
        .expect("deactivation succeeds");
    let session = backend
        .sessions
        .resolve_current_user(&token)
        .await
        .expect("resolution completes");

    assert_eq!(session, SessionCheck::Inactive);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn promoted_account_gains_admin_powers(backend: Backend) {
    let admin = backend.seed("david", UserRole::Admin).await;
    let dwight = backend.seed("dwight", UserRole::User).await;
    let jim = backend.seed("jim", UserRole::User).await;

    let refused = backend
        .accounts
        .demote_user(jim.id(), &dwight)
        .await
        .expect_err("plain users cannot administer");
    let promoted = backend
        .accounts
        .promote_user(dwight.id(), &admin)
        .await
        .expect("promotion succeeds");
    let second = backend
        .accounts
        .promote_user(jim.id(), &promoted)
        .await
        .expect("new admin may promote");

    assert_eq!(refused, Failure::forbidden("Only admins can demote users"));
    assert!(promoted.is_admin());
    assert!(second.is_admin());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_listing_filters_by_role(backend: Backend) {
    backend.seed("robert", UserRole::Admin).await;
    backend.seed("andy", UserRole::User).await;
    backend.seed("erin", UserRole::User).await;

    let plain = backend
        .accounts
        .find_users(UserFilter::default().with_role(UserRole::User), Pagination::new(1, 1))
        .await
        .expect("listing succeeds");

    assert_eq!(plain.total, 2);
    assert_eq!(plain.results.len(), 1);
    assert_eq!(plain.results[0].username(), "andy");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_is_rejected(backend: Backend) {
    backend.seed("creed", UserRole::User).await;

    let err = backend
        .accounts
        .create_user(CreateUserRequest::new("creed", "bratton"))
        .await
        .expect_err("duplicate username");

    assert_eq!(err.code(), FailureCode::Invalid);
    assert_eq!(err.message(), "Username already exists");
}
