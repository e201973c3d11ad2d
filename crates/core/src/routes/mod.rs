//! Navigation tree.
//!
//! A [`RouteTable`] is built once at startup, from code or YAML, and treated
//! as read-only afterwards.

pub mod dashboard;
pub mod descriptor;
pub mod lint;
pub mod table;

pub use dashboard::{LOGIN_PATH, PROFILE_PATH};
pub use descriptor::{RouteDescriptor, RouteMeta};
pub use lint::RouteLint;
pub use table::{MatchedRecord, ResolvedRoute, RouteNode, RouteTable, RouteTableError};
