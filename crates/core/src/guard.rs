//! Route guard.
//!
//! [`evaluate`] is a pure function of the session, the target route's own
//! metadata and the requested location. It never fails and never blocks a
//! visitor for being too privileged.
//!
//! Precondition: a route with `requires_admin` must also set `requires_auth`.
//! The admin check is only reached through the auth branch, so a descriptor
//! that violates this is treated as public. The guard does not detect it;
//! [`RouteTable::lint`](crate::routes::RouteTable::lint) does.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::routes::table::normalize_path;
use crate::routes::{LOGIN_PATH, PROFILE_PATH, RouteMeta};
use crate::session::Session;

/// Name of the login query parameter carrying the return path.
pub const REDIRECT_PARAM: &str = "redirect";

/// Bytes escaped inside a query value. `/`, `:`, `?` and `@` are legal there.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Continue to the requested route.
    Proceed,
    /// Send the visitor to the login route, carrying the requested location.
    RedirectToLogin { redirect: String },
    /// Send an authenticated visitor who is not an admin to the landing page.
    /// The requested location is dropped.
    RedirectToFallback,
}

impl Decision {
    /// Where the decision sends the visitor, or `None` to proceed.
    #[must_use]
    pub fn location(&self, config: &GuardConfig) -> Option<String> {
        match self {
            Self::Proceed => None,
            Self::RedirectToLogin { redirect } => Some(format!(
                "{}?{REDIRECT_PARAM}={}",
                config.login_path,
                utf8_percent_encode(redirect, QUERY_VALUE)
            )),
            Self::RedirectToFallback => Some(config.fallback_path.clone()),
        }
    }
}

/// Redirect targets used by the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Login route, without query.
    pub login_path: String,
    /// Default authenticated landing page.
    pub fallback_path: String,
}

impl GuardConfig {
    /// Build a config with both paths normalized the way route paths are,
    /// so `/auth/login/` and `/auth/login` name the same route.
    #[must_use]
    pub fn new(login_path: &str, fallback_path: &str) -> Self {
        Self {
            login_path: normalize_path(login_path),
            fallback_path: normalize_path(fallback_path),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: LOGIN_PATH.to_owned(),
            fallback_path: PROFILE_PATH.to_owned(),
        }
    }
}

/// Decide whether a navigation to a route may proceed.
///
/// Checks run in order: public routes proceed, then authentication, then
/// admin. An anonymous request for an admin route therefore always yields the
/// login redirect.
#[must_use]
pub fn evaluate(session: &Session, meta: &RouteMeta, requested_path: &str) -> Decision {
    let decision = if !meta.requires_auth {
        Decision::Proceed
    } else if !session.is_logged_in().is_true() {
        Decision::RedirectToLogin {
            redirect: requested_path.to_owned(),
        }
    } else if meta.requires_admin && !session.is_admin().is_true() {
        Decision::RedirectToFallback
    } else {
        Decision::Proceed
    };

    tracing::debug!(
        path = requested_path,
        state = %session.state(),
        decision = ?decision,
        "Route guard evaluated"
    );
    decision
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::Flag;

    const DATABASE: &str = "/dashboard/database";

    fn sessions() -> Vec<Session> {
        vec![
            Session::anonymous(),
            Session::from_parts(None, Flag::False, Flag::False),
            Session::logged_in("alice", false),
            Session::logged_in("root", true),
            Session::from_parts(None, Flag::Unset, Flag::True),
        ]
    }

    #[test]
    fn test_public_route_always_proceeds() {
        for session in sessions() {
            assert_eq!(
                evaluate(&session, &RouteMeta::PUBLIC, "/auth/login"),
                Decision::Proceed,
                "{session:?}"
            );
        }
    }

    #[test]
    fn test_not_logged_in_redirects_to_login_with_path() {
        let not_logged_in = [
            Session::anonymous(),
            Session::from_parts(None, Flag::False, Flag::Unset),
            Session::from_parts(Some("x".into()), Flag::Unset, Flag::True),
        ];
        for session in not_logged_in {
            for meta in [RouteMeta::AUTHENTICATED, RouteMeta::ADMIN] {
                assert_eq!(
                    evaluate(&session, &meta, "/stock-analysis?range=1y"),
                    Decision::RedirectToLogin {
                        redirect: "/stock-analysis?range=1y".to_owned()
                    }
                );
            }
        }
    }

    #[test]
    fn test_non_admin_on_admin_route_gets_fallback() {
        for admin in [Flag::Unset, Flag::False] {
            let session = Session::from_parts(Some("alice".into()), Flag::True, admin);
            assert_eq!(
                evaluate(&session, &RouteMeta::ADMIN, DATABASE),
                Decision::RedirectToFallback
            );
        }
    }

    #[test]
    fn test_admin_on_admin_route_proceeds() {
        let session = Session::logged_in("root", true);
        assert_eq!(evaluate(&session, &RouteMeta::ADMIN, DATABASE), Decision::Proceed);
    }

    #[test]
    fn test_user_on_auth_route_proceeds() {
        let session = Session::logged_in("alice", false);
        assert_eq!(
            evaluate(&session, &RouteMeta::AUTHENTICATED, "/profile-info"),
            Decision::Proceed
        );
    }

    #[test]
    fn test_admin_without_auth_is_treated_as_public() {
        let malformed = RouteMeta {
            requires_auth: false,
            requires_admin: true,
        };
        assert_eq!(
            evaluate(&Session::anonymous(), &malformed, "/ops"),
            Decision::Proceed
        );
    }

    #[test]
    fn test_login_location_keeps_slashes() {
        let decision = evaluate(&Session::anonymous(), &RouteMeta::ADMIN, DATABASE);
        assert_eq!(
            decision.location(&GuardConfig::default()).unwrap(),
            "/auth/login?redirect=/dashboard/database"
        );
    }

    #[test]
    fn test_login_location_escapes_query_delimiters() {
        let decision = Decision::RedirectToLogin {
            redirect: "/stock-analysis?range=1y&ticker=A B".to_owned(),
        };
        assert_eq!(
            decision.location(&GuardConfig::default()).unwrap(),
            "/auth/login?redirect=/stock-analysis?range=1y%26ticker=A%20B"
        );
    }

    #[test]
    fn test_fallback_location_has_no_query() {
        let session = Session::logged_in("alice", false);
        let decision = evaluate(&session, &RouteMeta::ADMIN, DATABASE);
        assert_eq!(
            decision.location(&GuardConfig::default()).unwrap(),
            "/profile-info"
        );
    }

    #[test]
    fn test_proceed_has_no_location() {
        assert_eq!(Decision::Proceed.location(&GuardConfig::default()), None);
    }

    #[test]
    fn test_custom_config() {
        let config = GuardConfig {
            login_path: "/signin".to_owned(),
            fallback_path: "/home".to_owned(),
        };
        let login = Decision::RedirectToLogin {
            redirect: "/x".to_owned(),
        };
        assert_eq!(login.location(&config).unwrap(), "/signin?redirect=/x");
        assert_eq!(
            Decision::RedirectToFallback.location(&config).unwrap(),
            "/home"
        );
    }

    #[test]
    fn test_decision_serializes_with_tag() {
        let json = serde_json::to_string(&Decision::RedirectToFallback).unwrap();
        assert_eq!(json, r#"{"decision":"redirect_to_fallback"}"#);
    }

    #[test]
    fn test_config_paths_are_normalized() {
        let config = GuardConfig::new("/auth/login/", "/profile-info//");
        assert_eq!(config, GuardConfig::default());

        let login = Decision::RedirectToLogin {
            redirect: "/stock-analysis".to_owned(),
        };
        assert_eq!(
            login.location(&config).unwrap(),
            "/auth/login?redirect=/stock-analysis"
        );
    }
}
