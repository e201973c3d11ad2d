//! Subcommand implementations.

pub mod check;
pub mod routes;
pub mod shell;

use stockdash_core::navigation::{Navigation, RedirectCause};
use stockdash_core::{Location, NavigationError};
use thiserror::Error;

/// Errors that can stop a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Navigation failed: {0}")]
    Navigation(#[from] NavigationError),
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// "mounted dashboard > profile at /profile-info"
pub fn mount_line(location: &Location) -> String {
    let views: Vec<&str> = location
        .route
        .matched
        .iter()
        .filter_map(|record| record.view.as_deref())
        .collect();
    if views.is_empty() {
        format!("at {} (no view)", location.full_path)
    } else {
        format!("mounted {} at {}", views.join(" > "), location.full_path)
    }
}

/// One line per redirect hop.
pub fn redirect_lines(navigation: &Navigation) -> impl Iterator<Item = String> + '_ {
    navigation.redirects.iter().map(|hop| {
        let cause = match hop.cause {
            RedirectCause::Record => "redirect",
            RedirectCause::Login => "login required",
            RedirectCause::Fallback => "admin required",
        };
        format!("{} -> {} ({cause})", hop.from, hop.to)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stockdash_core::{GuardConfig, Navigator, RouteTable, SessionStore};

    use super::*;

    #[test]
    fn test_mount_line_lists_layout_chain() {
        let store = SessionStore::new();
        store.set_session("alice", false);
        let mut nav = Navigator::new(RouteTable::dashboard(), store.observer(), GuardConfig::default());
        let navigation = nav.navigate("/stock-analysis").unwrap();
        assert_eq!(
            mount_line(&navigation.location),
            "mounted dashboard > stock-analysis at /stock-analysis"
        );
    }

    #[test]
    fn test_redirect_lines() {
        let store = SessionStore::new();
        let mut nav = Navigator::new(RouteTable::dashboard(), store.observer(), GuardConfig::default());
        let navigation = nav.navigate("/").unwrap();
        let lines: Vec<String> = redirect_lines(&navigation).collect();
        assert_eq!(
            lines,
            [
                "/ -> /profile-info (redirect)",
                "/profile-info -> /auth/login?redirect=/profile-info (login required)",
            ]
        );
    }
}
