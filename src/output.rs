//! CLI output formatting.
//!
//! Output leads with what was built (listings and their pages) and shows
//! file paths as secondary context.
//!
//! ## Generate
//!
//! ```text
//! Listings
//! 001 Snippets (2 pages)
//!     /list/p/1 → list/p/1/index.html (24 cards)
//!     /list/p/2 → list/p/2/index.html (3 cards)
//! 002 Collections (1 page)
//!     /collections → collections/index.html (8 cards)
//!
//! Generated 2 listings, 3 pages, 35 snippets, 4 assets
//! ```
//!
//! ## Check
//!
//! ```text
//! Listings
//! 001 Snippets (27 items)
//!     002 JavaScript (12 items)
//! 003 Collections (8 items)
//!
//! Schema WebData: 9 relationships
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::{ContentManifest, GenerateReport, Listing};
use crate::graph::ContentGraph;
use crate::schema::{Model, Schema};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec!["Listings".to_string()];
    let mut total_pages = 0;

    for (i, listing) in report.listings.iter().enumerate() {
        total_pages += listing.pages.len();
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            listing.name,
            plural(listing.pages.len(), "page", "pages")
        ));
        for page in &listing.pages {
            lines.push(format!(
                "{}{} → {} ({})",
                indent(1),
                page.slug,
                page.path,
                plural(page.cards, "card", "cards")
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}",
        plural(report.listings.len(), "listing", "listings"),
        plural(total_pages, "page", "pages"),
        plural(report.snippets, "snippet", "snippets"),
        plural(report.assets, "asset", "assets"),
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Listing tree (children indented under parents) followed by a schema summary.
///
/// Listings are numbered in manifest order; roots are listings without a
/// parent in the graph.
pub fn format_check_output(
    manifest: &ContentManifest,
    graph: &ContentGraph,
    schema: &Schema,
) -> Vec<String> {
    let mut lines = vec!["Listings".to_string()];
    let position = |id: &str| manifest.listings.iter().position(|l| l.id == id);

    let roots = manifest.listings.iter().filter(|l| {
        graph
            .owner(Model::Listing, &l.id, "parent")
            .ok()
            .flatten()
            .is_none()
    });
    for root in roots {
        walk_listing(root, 0, manifest, graph, &position, &mut lines);
    }

    lines.push(String::new());
    lines.push(format!(
        "Schema {}: {}",
        schema.name,
        plural(schema.relationships.len(), "relationship", "relationships")
    ));
    lines
}

fn walk_listing(
    listing: &Listing,
    depth: usize,
    manifest: &ContentManifest,
    graph: &ContentGraph,
    position: &dyn Fn(&str) -> Option<usize>,
    lines: &mut Vec<String>,
) {
    let index = position(&listing.id).map_or(0, |p| p + 1);
    lines.push(format!(
        "{}{} {} ({})",
        indent(depth),
        format_index(index),
        listing.name,
        plural(listing.items.len(), "item", "items")
    ));
    let children = graph
        .related(Model::Listing, &listing.id, "children")
        .unwrap_or_default();
    for child_id in children {
        if let Some(child) = manifest.listings.iter().find(|l| l.id == child_id) {
            walk_listing(child, depth + 1, manifest, graph, position, lines);
        }
    }
}

pub fn print_check_output(manifest: &ContentManifest, graph: &ContentGraph, schema: &Schema) {
    for line in format_check_output(manifest, graph, schema) {
        println!("{}", line);
    }
}
