//! Route descriptors as supplied by the navigation tree.

use serde::{Deserialize, Serialize};

/// Access requirements declared by a single route.
///
/// `requires_admin` is only meaningful together with `requires_auth`; the
/// guard never reaches the admin check otherwise. Route tables must set
/// `requires_auth: true` wherever `requires_admin: true` is set
/// ([`RouteTable::lint`](super::RouteTable::lint) reports violations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteMeta {
    #[serde(default, alias = "requiresAuth")]
    pub requires_auth: bool,
    #[serde(default, alias = "requiresAdmin")]
    pub requires_admin: bool,
}

impl RouteMeta {
    /// No requirements.
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
    };

    /// Logged-in visitors only.
    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        requires_admin: false,
    };

    /// Logged-in admins only.
    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_admin: true,
    };
}

/// A navigable path segment plus its declared access requirements.
///
/// Children do not inherit `meta` from their parent; each node declares its
/// own requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDescriptor {
    /// Path segment, relative to the parent unless it starts with `/`.
    pub path: String,
    /// Identifier of the view mounted for this route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Redirect target, relative to the parent unless it starts with `/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    /// A public route with no view, redirect or children.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            view: None,
            redirect: None,
            meta: RouteMeta::PUBLIC,
            children: Vec::new(),
        }
    }

    /// A record that only redirects elsewhere.
    #[must_use]
    pub fn redirect_to(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(path).redirect(target)
    }

    #[must_use]
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    #[must_use]
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    #[must_use]
    pub const fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub const fn requires_auth(mut self) -> Self {
        self.meta.requires_auth = true;
        self
    }

    #[must_use]
    pub const fn requires_admin(mut self) -> Self {
        self.meta.requires_admin = true;
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }
}
