//! Observable session store.
//!
//! [`SessionStore`] is the mutating handle owned by the login and logout
//! handlers; [`SessionObserver`] is the read-only handle given to the
//! navigation layer and UI consumers. Both wrap one `tokio::sync::watch`
//! channel, so a read after `set_session`/`reset_session` returns always sees
//! the new value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use super::Flag;

/// The current visitor's identity flags.
///
/// Fields are private so a session can only change as a whole, through
/// [`SessionStore::set_session`] and [`SessionStore::reset_session`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    user_name: Option<String>,
    logged_in: Flag,
    admin: Flag,
}

impl Session {
    /// An anonymous session with every field unset.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_name: None,
            logged_in: Flag::Unset,
            admin: Flag::Unset,
        }
    }

    /// A logged-in session, as produced by [`SessionStore::set_session`].
    #[must_use]
    pub fn logged_in(name: impl Into<String>, admin: bool) -> Self {
        Self {
            user_name: Some(name.into()),
            logged_in: Flag::True,
            admin: Flag::from(admin),
        }
    }

    /// Build a session from raw field values.
    ///
    /// Does not cross-validate the flags: `admin = True` with
    /// `logged_in != True` is representable and the guard treats it as
    /// anonymous.
    #[must_use]
    pub const fn from_parts(user_name: Option<String>, logged_in: Flag, admin: Flag) -> Self {
        Self {
            user_name,
            logged_in,
            admin,
        }
    }

    /// Display name of the visitor, if known.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Whether the visitor is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> Flag {
        self.logged_in
    }

    /// Whether the visitor is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> Flag {
        self.admin
    }

    /// Coarse state of the session.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match (self.logged_in, self.admin) {
            (Flag::True, Flag::True) => SessionState::LoggedInAdmin,
            (Flag::True, _) => SessionState::LoggedInUser,
            _ => SessionState::Anonymous,
        }
    }

    const fn is_pristine(&self) -> bool {
        self.user_name.is_none() && self.logged_in.is_unset() && self.admin.is_unset()
    }
}

/// Coarse session state machine.
///
/// `Anonymous -> LoggedInUser | LoggedInAdmin` on login, back to `Anonymous`
/// on logout. There is no elevation transition; becoming admin takes a fresh
/// login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    LoggedInUser,
    LoggedInAdmin,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::LoggedInUser => write!(f, "logged_in_user"),
            Self::LoggedInAdmin => write!(f, "logged_in_admin"),
        }
    }
}

/// Returned by [`SessionObserver::changed`] once every store handle is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session store was dropped")]
pub struct SessionClosed;

/// Mutating handle to the session.
///
/// Cloning shares the same underlying session. Created once per application
/// with [`SessionStore::new`] and handed to whoever handles login and logout.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionStore {
    /// Create a store holding an anonymous session.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::anonymous());
        Self { tx: Arc::new(tx) }
    }

    /// Record a successful login.
    ///
    /// Replaces all three fields at once. The name is not validated; an
    /// empty string is accepted.
    pub fn set_session(&self, name: impl Into<String>, admin: bool) {
        let session = Session::logged_in(name, admin);
        tracing::info!(
            user = session.user_name().unwrap_or_default(),
            state = %session.state(),
            "Session set"
        );
        self.tx.send_replace(session);
    }

    /// Record a logout. Idempotent; a second call does not notify observers.
    pub fn reset_session(&self) {
        let changed = self.tx.send_if_modified(|session| {
            if session.is_pristine() {
                return false;
            }
            *session = Session::anonymous();
            true
        });
        if changed {
            tracing::info!("Session reset");
        }
    }

    /// Read-only projection of the login flag.
    #[must_use]
    pub fn is_user_logged_in(&self) -> Flag {
        self.tx.borrow().is_logged_in()
    }

    /// Read-only projection of the admin flag.
    #[must_use]
    pub fn is_admin_user(&self) -> Flag {
        self.tx.borrow().is_admin()
    }

    /// The current user name, if any.
    #[must_use]
    pub fn user_name(&self) -> Option<String> {
        self.tx.borrow().user_name.clone()
    }

    /// A copy of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// A read-only handle for consumers that must not mutate the session.
    #[must_use]
    pub fn observer(&self) -> SessionObserver {
        SessionObserver {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the session.
#[derive(Debug, Clone)]
pub struct SessionObserver {
    rx: watch::Receiver<Session>,
}

impl SessionObserver {
    /// Read-only projection of the login flag.
    #[must_use]
    pub fn is_user_logged_in(&self) -> Flag {
        self.rx.borrow().is_logged_in()
    }

    /// Read-only projection of the admin flag.
    #[must_use]
    pub fn is_admin_user(&self) -> Flag {
        self.rx.borrow().is_admin()
    }

    /// The current user name, if any.
    #[must_use]
    pub fn user_name(&self) -> Option<String> {
        self.rx.borrow().user_name.clone()
    }

    /// A copy of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Wait until the session is replaced, then return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] once every [`SessionStore`] handle has been
    /// dropped.
    pub async fn changed(&mut self) -> Result<Session, SessionClosed> {
        self.rx.changed().await.map_err(|_| SessionClosed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
