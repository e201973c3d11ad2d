//! Integration tests for Stockdash.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockdash-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `guard_properties` - guard decisions across every session shape
//! - `navigation_scenarios` - end-to-end flows through the navigator
//! - `route_table_file` - the shipped YAML route table
//! - `session_observers` - change notification to read-only consumers

use stockdash_core::{Flag, GuardConfig, Navigator, RouteTable, Session, SessionStore};

/// The YAML route table shipped in `config/routes.yaml`.
pub const ROUTES_YAML: &str = include_str!("../../../config/routes.yaml");

/// A session store with a navigator over the built-in dashboard table.
#[must_use]
pub fn dashboard() -> (SessionStore, Navigator) {
    let store = SessionStore::new();
    let navigator = Navigator::new(
        RouteTable::dashboard(),
        store.observer(),
        GuardConfig::default(),
    );
    (store, navigator)
}

/// Every combination of flags, including ones `set_session` never produces.
#[must_use]
pub fn all_sessions() -> Vec<Session> {
    let flags = [Flag::Unset, Flag::False, Flag::True];
    let mut sessions = Vec::new();
    for logged_in in flags {
        for admin in flags {
            sessions.push(Session::from_parts(None, logged_in, admin));
            sessions.push(Session::from_parts(Some("alice".to_owned()), logged_in, admin));
        }
    }
    sessions
}
