//! Route tree listing.
//!
//! # Usage
//!
//! ```bash
//! stockdash routes
//! stockdash --routes config/routes.yaml routes
//! ```

use std::io::{self, Write};

use stockdash_core::RouteTable;

/// Write the route tree, then any lints.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render(table: &RouteTable, out: &mut impl Write) -> io::Result<()> {
    for node in table.nodes() {
        let route = node.descriptor;
        let label = format!("{}{}", "  ".repeat(node.depth), node.full_path);

        let mut details = Vec::new();
        if let Some(view) = &route.view {
            details.push(format!("[{view}]"));
        }
        if route.meta.requires_auth {
            details.push("auth".to_owned());
        }
        if route.meta.requires_admin {
            details.push("admin".to_owned());
        }
        if let Some(target) = &route.redirect {
            details.push(format!("-> {target}"));
        }

        writeln!(out, "{label:<28} {}", details.join(" "))?;
    }

    for lint in table.lint() {
        writeln!(out, "warning: {lint}")?;
    }
    Ok(())
}
