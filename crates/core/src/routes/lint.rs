//! Load-time checks for route tables.
//!
//! These are configuration diagnostics. The guard never consults them.

use core::fmt;

use serde::Serialize;

use super::table::{join_path, normalize_path};
use super::{RouteDescriptor, RouteTable};

/// A suspicious route declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteLint {
    /// `requires_admin` without `requires_auth`. The admin check is never
    /// reached for such a route, so it is effectively public.
    AdminWithoutAuth { path: String },
    /// A child of an auth-gated route that is not gated itself. Metadata is
    /// not inherited, so the child is reachable anonymously.
    UnguardedChild { path: String, parent: String },
}

impl fmt::Display for RouteLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdminWithoutAuth { path } => {
                write!(f, "{path}: requires_admin is set without requires_auth")
            }
            Self::UnguardedChild { path, parent } => write!(
                f,
                "{path}: parent {parent} requires auth but this route does not"
            ),
        }
    }
}

impl RouteTable {
    /// Report malformed or suspicious declarations, in tree order.
    #[must_use]
    pub fn lint(&self) -> Vec<RouteLint> {
        let mut lints = Vec::new();
        for route in self.routes() {
            lint_route(route, "/", None, &mut lints);
        }
        lints
    }
}

fn lint_route(
    route: &RouteDescriptor,
    parent_path: &str,
    gated_parent: Option<&str>,
    lints: &mut Vec<RouteLint>,
) {
    let full_path = normalize_path(&join_path(parent_path, &route.path));

    if route.meta.requires_admin && !route.meta.requires_auth {
        lints.push(RouteLint::AdminWithoutAuth {
            path: full_path.clone(),
        });
    }

    // Redirect records are followed before the guard runs.
    let exposed = !route.meta.requires_auth && route.redirect.is_none();
    if let Some(parent) = gated_parent.filter(|_| exposed) {
        lints.push(RouteLint::UnguardedChild {
            path: full_path.clone(),
            parent: parent.to_owned(),
        });
    }

    let next_parent = if route.meta.requires_auth {
        Some(full_path.as_str())
    } else {
        gated_parent
    };
    for child in &route.children {
        lint_route(child, &full_path, next_parent, lints);
    }
}
