//! Built-in route table for the stock dashboard.

use super::{RouteDescriptor, RouteTable};

/// Path of the default authenticated landing page.
pub const PROFILE_PATH: &str = "/profile-info";

/// Path of the login page.
pub const LOGIN_PATH: &str = "/auth/login";

impl RouteTable {
    /// The stock dashboard navigation tree.
    ///
    /// ```text
    /// /                      dashboard layout
    ///   ""                   -> profile-info
    ///   profile-info         auth
    ///   stock-analysis       auth
    ///   stock-prediction     auth
    ///   historical-data      auth
    /// /dashboard             dashboard layout
    ///   ""                   -> /profile-info
    ///   database             auth + admin
    /// /auth                  auth layout
    ///   ""                   -> login
    ///   login
    ///   register
    /// ```
    ///
    /// # Panics
    ///
    /// Never in practice; the tree is static and has no duplicate paths.
    #[must_use]
    pub fn dashboard() -> Self {
        Self::new(vec![
            RouteDescriptor::new("/").view("dashboard").children([
                RouteDescriptor::redirect_to("", "profile-info"),
                RouteDescriptor::new("profile-info")
                    .view("profile")
                    .requires_auth(),
                RouteDescriptor::new("stock-analysis")
                    .view("stock-analysis")
                    .requires_auth(),
                RouteDescriptor::new("stock-prediction")
                    .view("stock-prediction")
                    .requires_auth(),
                RouteDescriptor::new("historical-data")
                    .view("historical-data")
                    .requires_auth(),
            ]),
            RouteDescriptor::new("/dashboard").view("dashboard").children([
                RouteDescriptor::redirect_to("", PROFILE_PATH),
                RouteDescriptor::new("database")
                    .view("database")
                    .requires_auth()
                    .requires_admin(),
            ]),
            RouteDescriptor::new("/auth").view("auth").children([
                RouteDescriptor::redirect_to("", "login"),
                RouteDescriptor::new("login").view("login"),
                RouteDescriptor::new("register").view("register"),
            ]),
        ])
        .expect("built-in route table is valid")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::routes::RouteMeta;

    #[test]
    fn test_database_is_admin_gated() {
        let route = RouteTable::dashboard().resolve("/dashboard/database").unwrap();
        assert_eq!(route.meta, RouteMeta::ADMIN);
        assert_eq!(route.view(), Some("database"));
    }

    #[test]
    fn test_landing_pages_exist() {
        let table = RouteTable::dashboard();
        assert_eq!(
            table.resolve(PROFILE_PATH).unwrap().meta,
            RouteMeta::AUTHENTICATED
        );
        assert_eq!(table.resolve(LOGIN_PATH).unwrap().meta, RouteMeta::PUBLIC);
    }

    #[test]
    fn test_layout_roots_redirect() {
        let table = RouteTable::dashboard();
        assert_eq!(
            table.resolve("/").unwrap().redirect.as_deref(),
            Some("/profile-info")
        );
        assert_eq!(
            table.resolve("/auth").unwrap().redirect.as_deref(),
            Some("/auth/login")
        );
        assert_eq!(
            table.resolve("/dashboard").unwrap().redirect.as_deref(),
            Some("/profile-info")
        );
    }
}
