//! One-shot navigation check.
//!
//! # Usage
//!
//! ```bash
//! # Anonymous visitor
//! stockdash check /dashboard/database
//!
//! # Logged-in admin, machine-readable
//! stockdash check /dashboard/database --user root --admin --json
//! ```

use std::io::Write;

use serde::Serialize;
use stockdash_core::{GuardConfig, Navigation, Navigator, RouteTable, Session, SessionStore};

use super::{CommandError, mount_line, redirect_lines};

/// Session to evaluate the navigation with.
#[derive(Debug, Clone, Default)]
pub struct CheckSession {
    pub user: Option<String>,
    pub admin: bool,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    session: &'a Session,
    navigation: &'a Navigation,
}

/// Navigate once from a fresh session and report where the visitor lands.
///
/// # Errors
///
/// Returns an error if the navigation fails or output cannot be written.
pub fn run(
    table: RouteTable,
    guard: GuardConfig,
    path: &str,
    session: &CheckSession,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let store = SessionStore::new();
    if let Some(user) = &session.user {
        store.set_session(user.as_str(), session.admin);
    }

    let mut navigator = Navigator::new(table, store.observer(), guard);
    let navigation = navigator.navigate(path)?;
    let snapshot = store.snapshot();

    if json {
        let report = CheckReport {
            session: &snapshot,
            navigation: &navigation,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "session: {}", snapshot.state())?;
    for line in redirect_lines(&navigation) {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "{}", mount_line(&navigation.location))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn check(path: &str, session: &CheckSession, json: bool) -> String {
        let mut out = Vec::new();
        run(
            RouteTable::dashboard(),
            GuardConfig::default(),
            path,
            session,
            json,
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_anonymous_check() {
        let text = check("/dashboard/database", &CheckSession::default(), false);
        assert_eq!(
            text,
            "session: anonymous\n\
             /dashboard/database -> /auth/login?redirect=/dashboard/database (login required)\n\
             mounted auth > login at /auth/login?redirect=/dashboard/database\n"
        );
    }

    #[test]
    fn test_user_check() {
        let session = CheckSession {
            user: Some("alice".to_owned()),
            admin: false,
        };
        let text = check("/dashboard/database", &session, false);
        assert!(text.starts_with("session: logged_in_user\n"));
        assert!(text.ends_with("mounted dashboard > profile at /profile-info\n"));
    }

    #[test]
    fn test_json_check() {
        let session = CheckSession {
            user: Some("root".to_owned()),
            admin: true,
        };
        let text = check("/dashboard/database", &session, true);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["session"]["user_name"], "root");
        assert_eq!(value["session"]["admin"], true);
        assert_eq!(
            value["navigation"]["location"]["full_path"],
            "/dashboard/database"
        );
        assert_eq!(value["navigation"]["redirects"], serde_json::json!([]));
    }

    #[test]
    fn test_unknown_path_is_an_error() {
        let mut out = Vec::new();
        let result = run(
            RouteTable::dashboard(),
            GuardConfig::default(),
            "/nowhere",
            &CheckSession::default(),
            false,
            &mut out,
        );
        assert!(matches!(result, Err(CommandError::Navigation(_))));
    }
}
