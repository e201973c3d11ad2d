//! Navigation layer.
//!
//! [`Navigator`] resolves a requested location against the route table,
//! follows redirect records, runs the guard before committing, and follows
//! guard redirects (re-running the guard on each new target). Decisions are
//! synchronous. When navigations overlap, the most recently begun one wins.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use thiserror::Error;

use crate::guard::{self, Decision, GuardConfig, REDIRECT_PARAM};
use crate::routes::table::{normalize_path, split_location};
use crate::routes::{ResolvedRoute, RouteTable};
use crate::session::SessionObserver;

/// Redirect hops allowed in a single navigation.
pub const MAX_REDIRECTS: usize = 8;

/// Errors raised by the navigation layer. The guard itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    NotFound(String),
    #[error("Too many redirects navigating to {path} ({hops} hops)")]
    RedirectLoop { path: String, hops: usize },
    #[error("Navigation {ticket} was superseded by navigation {latest}")]
    Superseded { ticket: u64, latest: u64 },
}

/// Why a navigation was sent elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectCause {
    /// The matched record declares a `redirect`.
    Record,
    /// The guard required a login.
    Login,
    /// The guard required admin rights.
    Fallback,
}

/// One redirect hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub from: String,
    pub to: String,
    pub cause: RedirectCause,
}

/// A committed (or committable) location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Full path including query.
    pub full_path: String,
    pub route: ResolvedRoute,
}

impl Location {
    /// Percent-decoded value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let (_, query) = split_location(&self.full_path);
        query?
            .split('&')
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
    }
}

/// Result of a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub location: Location,
    /// Every hop taken, in order. Empty when the first target proceeded.
    pub redirects: Vec<Redirect>,
}

impl Navigation {
    /// The location originally requested, if the navigation was redirected.
    #[must_use]
    pub fn redirected_from(&self) -> Option<&str> {
        self.redirects.first().map(|hop| hop.from.as_str())
    }
}

/// A navigation whose decision is made but not yet acted upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    ticket: u64,
    navigation: Navigation,
}

impl PendingNavigation {
    #[must_use]
    pub const fn navigation(&self) -> &Navigation {
        &self.navigation
    }
}

/// Drives navigation for one application instance.
#[derive(Debug)]
pub struct Navigator {
    table: RouteTable,
    session: SessionObserver,
    config: GuardConfig,
    current: Option<Location>,
    latest_ticket: u64,
}

impl Navigator {
    #[must_use]
    pub const fn new(table: RouteTable, session: SessionObserver, config: GuardConfig) -> Self {
        Self {
            table,
            session,
            config,
            current: None,
            latest_ticket: 0,
        }
    }

    /// The committed location, if any navigation has completed.
    #[must_use]
    pub const fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Resolve and guard a navigation, then commit it.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotFound`] when a target matches no route
    /// and [`NavigationError::RedirectLoop`] after [`MAX_REDIRECTS`] hops.
    pub fn navigate(&mut self, path: &str) -> Result<Navigation, NavigationError> {
        let pending = self.begin(path)?;
        self.commit(pending)
    }

    /// Decide a navigation without committing it.
    ///
    /// Every call supersedes navigations begun earlier.
    ///
    /// # Errors
    ///
    /// Same as [`Navigator::navigate`].
    pub fn begin(&mut self, path: &str) -> Result<PendingNavigation, NavigationError> {
        self.latest_ticket += 1;
        let ticket = self.latest_ticket;
        let session = self.session.snapshot();

        let mut target = path.to_owned();
        let mut redirects: Vec<Redirect> = Vec::new();

        loop {
            if redirects.len() > MAX_REDIRECTS {
                tracing::warn!(path, hops = redirects.len(), "Redirect loop");
                return Err(NavigationError::RedirectLoop {
                    path: path.to_owned(),
                    hops: redirects.len(),
                });
            }

            let route = self
                .table
                .resolve(&target)
                .ok_or_else(|| NavigationError::NotFound(target.clone()))?;

            if let Some(record_target) = &route.redirect {
                let to = carry_suffix(&target, record_target);
                redirects.push(Redirect {
                    from: std::mem::replace(&mut target, to.clone()),
                    to,
                    cause: RedirectCause::Record,
                });
                continue;
            }

            let decision = guard::evaluate(&session, &route.meta, &target);
            let cause = match decision {
                Decision::Proceed => {
                    return Ok(PendingNavigation {
                        ticket,
                        navigation: Navigation {
                            location: Location {
                                full_path: target,
                                route,
                            },
                            redirects,
                        },
                    });
                }
                Decision::RedirectToLogin { .. } => RedirectCause::Login,
                Decision::RedirectToFallback => RedirectCause::Fallback,
            };

            // Only `Proceed` has no location.
            let to = decision
                .location(&self.config)
                .unwrap_or_else(|| self.config.fallback_path.clone());
            redirects.push(Redirect {
                from: std::mem::replace(&mut target, to.clone()),
                to,
                cause,
            });
        }
    }

    /// Act on a pending navigation.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Superseded`] when another navigation was
    /// begun after this one; the current location is left unchanged.
    pub fn commit(&mut self, pending: PendingNavigation) -> Result<Navigation, NavigationError> {
        if pending.ticket != self.latest_ticket {
            tracing::debug!(
                ticket = pending.ticket,
                latest = self.latest_ticket,
                "Dropping superseded navigation"
            );
            return Err(NavigationError::Superseded {
                ticket: pending.ticket,
                latest: self.latest_ticket,
            });
        }

        let navigation = pending.navigation;
        tracing::info!(
            path = %navigation.location.full_path,
            redirected_from = navigation.redirected_from(),
            "Navigated"
        );
        self.current = Some(navigation.location.clone());
        Ok(navigation)
    }

    /// Continue after a successful login.
    ///
    /// When the current location is the login route and carries an in-app
    /// `redirect` parameter, navigates there. Otherwise navigates to the
    /// fallback page.
    ///
    /// # Errors
    ///
    /// Same as [`Navigator::navigate`].
    pub fn resume_after_login(&mut self) -> Result<Navigation, NavigationError> {
        let login_path = normalize_path(&self.config.login_path);
        let target = self
            .current
            .as_ref()
            .filter(|location| location.route.path == login_path)
            .and_then(|location| location.query_param(REDIRECT_PARAM))
            .filter(|target| is_in_app_path(target))
            .unwrap_or_else(|| self.config.fallback_path.clone());
        self.navigate(&target)
    }
}

/// Absolute, same-origin path. Rejects protocol-relative `//host` and
/// `/\host` forms.
fn is_in_app_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}

/// Keep the original query and fragment when a redirect record's target
/// declares none of its own.
fn carry_suffix(from: &str, to: &str) -> String {
    let (from, from_fragment) = split_fragment(from);
    let (to, to_fragment) = split_fragment(to);

    let mut carried = to.to_owned();
    if let (Some(query), None) = (split_location(from).1, split_location(to).1) {
        carried.push('?');
        carried.push_str(query);
    }
    if let Some(fragment) = to_fragment.or(from_fragment) {
        carried.push('#');
        carried.push_str(fragment);
    }
    carried
}

fn split_fragment(location: &str) -> (&str, Option<&str>) {
    location
        .split_once('#')
        .map_or((location, None), |(head, fragment)| (head, Some(fragment)))
}
