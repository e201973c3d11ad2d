//! Read-only consumers see every session replacement.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use stockdash_core::{Flag, SessionState, SessionStore};

#[tokio::test]
async fn test_observer_task_sees_login_and_logout() {
    let store = SessionStore::new();
    let mut observer = store.observer();

    let watcher = tokio::spawn(async move {
        let mut states = Vec::new();
        while let Ok(session) = observer.changed().await {
            states.push(session.state());
        }
        states
    });

    store.set_session("root", true);
    tokio::task::yield_now().await;
    store.reset_session();
    tokio::task::yield_now().await;
    store.reset_session();
    drop(store);

    let states = tokio::time::timeout(Duration::from_secs(1), watcher)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        states,
        vec![SessionState::LoggedInAdmin, SessionState::Anonymous]
    );
}

#[test]
fn test_observer_reads_are_consistent_after_mutation() {
    let store = SessionStore::new();
    let badge = store.observer();
    let guard_view = store.observer();

    store.set_session("alice", false);
    assert_eq!(badge.user_name().as_deref(), Some("alice"));
    assert_eq!(guard_view.is_user_logged_in(), Flag::True);
    assert_eq!(guard_view.is_admin_user(), Flag::False);

    store.reset_session();
    assert_eq!(badge.user_name(), None);
    assert_eq!(guard_view.is_user_logged_in(), Flag::Unset);
}
