//! Route table and path resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{RouteDescriptor, RouteMeta};

/// Errors raised while building a [`RouteTable`].
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("Invalid route table: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Route table has no routes")]
    Empty,
    #[error("Duplicate route path: {0}")]
    DuplicatePath(String),
    #[error("Invalid route path {0:?}: paths must not contain '?' or '#'")]
    InvalidPath(String),
}

/// One record of the matched chain, outermost layout first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRecord {
    pub path: String,
    pub view: Option<String>,
}

/// A requested location matched against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    /// The location as requested, including any query string.
    pub requested: String,
    /// Normalized pathname that matched.
    pub path: String,
    /// The matched record's own requirements.
    pub meta: RouteMeta,
    /// Absolute redirect target if the matched record is a redirect.
    pub redirect: Option<String>,
    pub matched: Vec<MatchedRecord>,
}

impl ResolvedRoute {
    /// Innermost view of the matched chain.
    #[must_use]
    pub fn view(&self) -> Option<&str> {
        self.matched.iter().rev().find_map(|record| record.view.as_deref())
    }
}

/// A node of the tree together with its joined path, for display.
#[derive(Debug, Clone, Copy)]
pub struct RouteNode<'a> {
    pub depth: usize,
    pub full_path: &'a str,
    pub descriptor: &'a RouteDescriptor,
}

#[derive(Debug, Clone)]
struct RouteEntry {
    full_path: String,
    lineage: Vec<usize>,
    meta: RouteMeta,
    redirect: Option<String>,
    matched: Vec<MatchedRecord>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteTableFile {
    routes: Vec<RouteDescriptor>,
}

/// Static, ordered tree of routes. Read-only once built.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    full_paths: Vec<(usize, String)>,
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table from top-level routes.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no routes, a path contains a query or
    /// fragment, or two unrelated routes resolve to the same full path.
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RouteTableError> {
        if routes.is_empty() {
            return Err(RouteTableError::Empty);
        }

        let mut entries = Vec::new();
        for (index, route) in routes.iter().enumerate() {
            flatten(route, "/", vec![index], &[], &mut entries)?;
        }
        check_duplicates(&entries)?;

        let mut full_paths = Vec::new();
        for route in &routes {
            collect_full_paths(route, "/", 0, &mut full_paths);
        }

        Ok(Self {
            routes,
            full_paths,
            entries,
        })
    }

    /// Parse a table from a YAML document with a top-level `routes` list.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError::Parse`] for malformed YAML or unknown keys,
    /// and any error [`RouteTable::new`] returns.
    pub fn from_yaml(yaml: &str) -> Result<Self, RouteTableError> {
        let file: RouteTableFile = serde_yaml::from_str(yaml)?;
        Self::new(file.routes)
    }

    /// Top-level routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Match a requested location.
    ///
    /// The query string and fragment are ignored for matching and a trailing
    /// slash is dropped. Children are tried before their parent, in
    /// declaration order, so a layout with an empty-path child resolves to
    /// that child.
    #[must_use]
    pub fn resolve(&self, requested: &str) -> Option<ResolvedRoute> {
        let (pathname, _) = split_location(requested);
        let path = normalize_path(pathname);
        let entry = self.entries.iter().find(|entry| entry.full_path == path)?;

        Some(ResolvedRoute {
            requested: requested.to_owned(),
            path,
            meta: entry.meta,
            redirect: entry.redirect.clone(),
            matched: entry.matched.clone(),
        })
    }

    /// Every node in pre-order, with its depth and joined path.
    #[must_use]
    pub fn nodes(&self) -> Vec<RouteNode<'_>> {
        let mut descriptors = Vec::new();
        for route in &self.routes {
            collect_descriptors(route, &mut descriptors);
        }
        descriptors
            .into_iter()
            .zip(&self.full_paths)
            .map(|(descriptor, (depth, full_path))| RouteNode {
                depth: *depth,
                full_path,
                descriptor,
            })
            .collect()
    }
}

fn flatten(
    route: &RouteDescriptor,
    parent_path: &str,
    lineage: Vec<usize>,
    ancestors: &[MatchedRecord],
    out: &mut Vec<RouteEntry>,
) -> Result<(), RouteTableError> {
    if route.path.contains(['?', '#']) {
        return Err(RouteTableError::InvalidPath(route.path.clone()));
    }

    let full_path = normalize_path(&join_path(parent_path, &route.path));
    let mut matched = ancestors.to_vec();
    matched.push(MatchedRecord {
        path: full_path.clone(),
        view: route.view.clone(),
    });

    for (index, child) in route.children.iter().enumerate() {
        let mut child_lineage = lineage.clone();
        child_lineage.push(index);
        flatten(child, &full_path, child_lineage, &matched, out)?;
    }

    let redirect = route
        .redirect
        .as_deref()
        .map(|target| join_path(parent_path, target));

    out.push(RouteEntry {
        full_path,
        lineage,
        meta: route.meta,
        redirect,
        matched,
    });
    Ok(())
}

fn check_duplicates(entries: &[RouteEntry]) -> Result<(), RouteTableError> {
    for (position, entry) in entries.iter().enumerate() {
        let clash = entries.iter().skip(position + 1).any(|other| {
            other.full_path == entry.full_path
                && !other.lineage.starts_with(&entry.lineage)
                && !entry.lineage.starts_with(&other.lineage)
        });
        if clash {
            return Err(RouteTableError::DuplicatePath(entry.full_path.clone()));
        }
    }
    Ok(())
}

fn collect_full_paths(
    route: &RouteDescriptor,
    parent_path: &str,
    depth: usize,
    out: &mut Vec<(usize, String)>,
) {
    let full_path = normalize_path(&join_path(parent_path, &route.path));
    out.push((depth, full_path.clone()));
    for child in &route.children {
        collect_full_paths(child, &full_path, depth + 1, out);
    }
}

fn collect_descriptors<'a>(route: &'a RouteDescriptor, out: &mut Vec<&'a RouteDescriptor>) {
    out.push(route);
    for child in &route.children {
        collect_descriptors(child, out);
    }
}

/// Join a relative segment onto a parent path. Absolute segments win.
pub(crate) fn join_path(parent: &str, segment: &str) -> String {
    if segment.starts_with('/') {
        return segment.to_owned();
    }
    if segment.is_empty() {
        return parent.to_owned();
    }
    format!("{}/{segment}", parent.trim_end_matches('/'))
}

/// Ensure a leading slash and drop trailing ones (except for the root).
pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Split a location into pathname and query, discarding any fragment.
pub(crate) fn split_location(location: &str) -> (&str, Option<&str>) {
    let without_fragment = location
        .split_once('#')
        .map_or(location, |(head, _)| head);
    match without_fragment.split_once('?') {
        Some((pathname, query)) => (pathname, Some(query)),
        None => (without_fragment, None),
    }
}
