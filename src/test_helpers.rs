//! Shared test utilities for the snipsite test suite.
//!
//! Builders for content objects and manifests, plus a fixture loader for
//! tests that need a full content manifest on disk.

use std::path::Path;
use tempfile::TempDir;

use crate::generate::{ContentManifest, Listing};
use crate::types::ContentItem;

/// Slug form of a title: lowercase, non-alphanumerics collapsed to dashes.
fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// A content item titled `title`, linking to `/s/{slug}`.
pub fn content_item(title: &str) -> ContentItem {
    let slug = slug(title);
    ContentItem {
        cover: format!("/assets/cover/{slug}.jpg"),
        title: title.to_string(),
        url: format!("/s/{slug}"),
        description: format!("<p>About {title}.</p>"),
        tags: "JavaScript".to_string(),
        extra_context: "Snippet".to_string(),
    }
}

/// A paginated listing with `count` generated items.
pub fn listing(id: &str, parent: Option<&str>, count: usize) -> Listing {
    Listing {
        id: id.to_string(),
        parent: parent.map(str::to_string),
        slug: format!("/{id}"),
        name: id.to_uppercase(),
        description: format!("Snippets about {id}."),
        cover: Some(format!("/assets/cover/{id}.jpg")),
        page_description: None,
        sublinks: Vec::new(),
        structured_data: None,
        breadcrumbs: None,
        paginated: true,
        items: (1..=count)
            .map(|n| content_item(&format!("{id} snippet {n}")))
            .collect(),
    }
}

pub fn manifest(listings: Vec<Listing>) -> ContentManifest {
    ContentManifest { listings }
}

/// Copy `fixtures/content.json` into a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content.json");
    std::fs::copy(&fixture, tmp.path().join("content.json")).unwrap();
    tmp
}

#[test]
fn slug_collapses_punctuation() {
    assert_eq!(slug("Array chunk"), "array-chunk");
    assert_eq!(slug("a < b"), "a-b");
}
