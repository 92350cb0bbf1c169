//! Content objects handed to the renderer.
//!
//! These are the pre-resolved, read-only records the components consume.
//! They are deserialized from the content manifest and never mutated
//! during rendering.

use serde::{Deserialize, Serialize};

/// A snippet or collection as shown on a preview card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Cover image URL
    pub cover: String,
    pub title: String,
    /// Site-relative URL of the item's page
    pub url: String,
    /// Short description as HTML. Rendered unescaped; must be sanitized upstream.
    #[serde(default)]
    pub description: String,
    /// Pre-formatted tag line (e.g. "JavaScript, Array")
    #[serde(default)]
    pub tags: String,
    /// Trailing context shown after the tags (e.g. a date or snippet count)
    #[serde(default, alias = "extraContext")]
    pub extra_context: String,
}

/// A chip linking to a related listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSublink {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub selected: bool,
}

/// Position within a paginated listing. Pages are 1-based and page `n`
/// lives at `{base_url}/p/{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator<'a> {
    pub page_number: usize,
    pub total_pages: usize,
    pub base_url: &'a str,
}

impl Paginator<'_> {
    pub fn page_url(&self, page: usize) -> String {
        page_slug(self.base_url, page)
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}

/// Site-relative form of a slug: one leading `/`, no trailing `/`.
///
/// `collections`, `/collections` and `/collections/` are the same page.
pub fn normalize_slug(slug: &str) -> String {
    format!("/{}", slug.trim_matches('/'))
}

/// URL of page `page` of the listing rooted at `base_url`.
pub fn page_slug(base_url: &str, page: usize) -> String {
    match base_url.trim_matches('/') {
        "" => format!("/p/{page}"),
        base => format!("/{base}/p/{page}"),
    }
}

/// One step in a breadcrumb trail. `url` is site-relative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}
