//! Stockdash Core - session state and access control for the dashboard shell.
//!
//! This crate decides, for every navigation attempt, whether the current
//! visitor may reach a route:
//! - [`session`] - who is using the app (anonymous, logged-in user, admin)
//! - [`routes`] - the static navigation tree and its per-route requirements
//! - [`guard`] - the pure decision function over session and route metadata
//! - [`navigation`] - resolves locations, runs the guard, follows redirects
//!
//! # Architecture
//!
//! No I/O, no rendering, no credential checks. The session is an explicit
//! handle created by the application ([`SessionStore::new`]) and passed to
//! whoever needs it; there is no process-wide instance.
//!
//! # Example
//!
//! ```
//! use stockdash_core::{GuardConfig, Navigator, RouteTable, SessionStore};
//!
//! let store = SessionStore::new();
//! let mut nav = Navigator::new(RouteTable::dashboard(), store.observer(), GuardConfig::default());
//!
//! let result = nav.navigate("/dashboard/database").unwrap();
//! assert_eq!(result.location.full_path, "/auth/login?redirect=/dashboard/database");
//!
//! store.set_session("root", true);
//! let result = nav.resume_after_login().unwrap();
//! assert_eq!(result.location.full_path, "/dashboard/database");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod guard;
pub mod navigation;
pub mod routes;
pub mod session;

pub use guard::{Decision, GuardConfig, evaluate};
pub use navigation::{Location, Navigation, NavigationError, Navigator, PendingNavigation};
pub use routes::{RouteDescriptor, RouteLint, RouteMeta, RouteTable, RouteTableError};
pub use session::{Flag, Session, SessionObserver, SessionState, SessionStore};
