//! End-to-end navigation flows over the dashboard route table.

#![allow(clippy::unwrap_used)]

use stockdash_core::navigation::RedirectCause;
use stockdash_core::{Flag, NavigationError, Session};
use stockdash_integration_tests::dashboard;

// =============================================================================
// Login and Logout
// =============================================================================

#[test]
fn test_full_admin_session_lifecycle() {
    let (store, mut nav) = dashboard();

    // First mount
    let landing = nav.navigate("/").unwrap();
    assert_eq!(
        landing.location.full_path,
        "/auth/login?redirect=/profile-info"
    );

    // Deep link while anonymous
    nav.navigate("/dashboard/database").unwrap();

    // Login handler
    store.set_session("root", true);
    let resumed = nav.resume_after_login().unwrap();
    assert_eq!(resumed.location.full_path, "/dashboard/database");
    assert!(resumed.redirects.is_empty());

    // Logout handler
    store.reset_session();
    let after_logout = nav.navigate("/dashboard/database").unwrap();
    assert_eq!(
        after_logout.location.full_path,
        "/auth/login?redirect=/dashboard/database"
    );
}

#[test]
fn test_reset_then_any_auth_route_needs_login() {
    let (store, mut nav) = dashboard();
    store.set_session("alice", false);
    store.reset_session();

    for path in [
        "/profile-info",
        "/stock-analysis",
        "/stock-prediction",
        "/historical-data",
        "/dashboard/database",
    ] {
        let result = nav.navigate(path).unwrap();
        let first = result.redirects.first().unwrap();
        assert_eq!(first.cause, RedirectCause::Login, "{path}");
        assert_eq!(
            result.location.query_param("redirect").as_deref(),
            Some(path)
        );
    }
}

#[test]
fn test_relogin_replaces_previous_session() {
    let (store, mut nav) = dashboard();
    store.set_session("alice", false);
    store.set_session("bob", true);

    assert_eq!(
        store.snapshot(),
        Session::from_parts(Some("bob".to_owned()), Flag::True, Flag::True)
    );
    let result = nav.navigate("/dashboard/database").unwrap();
    assert_eq!(result.location.full_path, "/dashboard/database");
}

#[test]
fn test_user_is_not_resumed_onto_admin_page() {
    let (store, mut nav) = dashboard();
    nav.navigate("/dashboard/database").unwrap();

    store.set_session("alice", false);
    let result = nav.resume_after_login().unwrap();
    assert_eq!(result.location.full_path, "/profile-info");
    assert_eq!(result.location.route.view(), Some("profile"));
}

// =============================================================================
// Public Pages
// =============================================================================

#[test]
fn test_admin_can_visit_public_pages() {
    let (store, mut nav) = dashboard();
    store.set_session("root", true);

    for path in ["/auth/login", "/auth/register", "/auth"] {
        let result = nav.navigate(path).unwrap();
        assert!(
            result
                .redirects
                .iter()
                .all(|hop| hop.cause == RedirectCause::Record),
            "{path}"
        );
    }
}

// =============================================================================
// Concurrent Navigation
// =============================================================================

#[test]
fn test_last_navigation_wins() {
    let (store, mut nav) = dashboard();
    store.set_session("alice", false);
    nav.navigate("/profile-info").unwrap();

    let slow = nav.begin("/stock-analysis").unwrap();
    let fast = nav.begin("/historical-data").unwrap();

    nav.commit(fast).unwrap();
    assert!(matches!(
        nav.commit(slow),
        Err(NavigationError::Superseded { .. })
    ));
    assert_eq!(nav.current().unwrap().full_path, "/historical-data");
}

#[test]
fn test_pending_decision_uses_session_at_begin() {
    let (store, mut nav) = dashboard();
    let pending = nav.begin("/profile-info").unwrap();
    store.set_session("alice", false);

    let committed = nav.commit(pending).unwrap();
    assert_eq!(
        committed.location.full_path,
        "/auth/login?redirect=/profile-info"
    );
}

#[test]
fn test_navigation_serializes() {
    let (_store, mut nav) = dashboard();
    let result = nav.navigate("/dashboard/database").unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value["location"]["full_path"],
        "/auth/login?redirect=/dashboard/database"
    );
    assert_eq!(value["redirects"][0]["cause"], "login");
}
