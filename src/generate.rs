//! Static site generation.
//!
//! Reads a content manifest of pre-resolved listings and renders every
//! listing page to disk.
//!
//! ## Content Manifest
//!
//! ```json
//! {
//!   "listings": [
//!     {
//!       "id": "js",
//!       "parent": "list",
//!       "slug": "/js",
//!       "name": "JavaScript",
//!       "description": "JavaScript snippets.",
//!       "cover": "/assets/cover/js.jpg",
//!       "sublinks": [{ "name": "Array", "url": "/js/t/array/p/1" }],
//!       "items": [{ "cover": "...", "title": "...", "url": "...", "description": "<p>...</p>" }]
//!     }
//!   ]
//! }
//! ```
//!
//! Item descriptions are HTML and are written into pages unescaped. The
//! manifest producer is responsible for sanitizing them.
//!
//! ## Pages
//!
//! A paginated listing with slug `/js` is split into pages of
//! `listing.page_size` items at `/js/p/1`, `/js/p/2`, ... Unpaginated
//! listings render once at their slug. Only listings with more than one
//! page get a paginator.
//!
//! Before rendering, listings and pages are loaded into a
//! [`ContentGraph`](crate::graph::ContentGraph): `Listing.parent` links must
//! point at known listings and must not form a cycle, and each page is
//! linked to its listing and its snippets.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── sitemap.xml
//! ├── assets/            # Copied from the assets directory, if any
//! ├── list/p/1/index.html
//! └── js/
//!     └── p/
//!         ├── 1/index.html
//!         └── 2/index.html
//! ```
//!
//! Pages render in parallel on the rayon pool; files are written afterwards.

use crate::components::RenderContext;
use crate::components::listing_page::{ListingPageProps, listing_page};
use crate::config::SiteConfig;
use crate::graph::{ContentGraph, GraphError};
use crate::schema::{self, Model, SchemaError};
use crate::types::{Breadcrumb, ContentItem, ListingSublink, Paginator, normalize_slug, page_slug};
use maud::html;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Content error: {0}")]
    Graph(#[from] GraphError),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Two pages render to the same slug: {0}")]
    DuplicateSlug(String),
}

/// Content manifest produced by the content pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentManifest {
    pub listings: Vec<Listing>,
}

impl ContentManifest {
    /// Read a manifest, returning it with its raw bytes' cache key.
    pub fn load(path: &Path) -> Result<(Self, String), GenerateError> {
        let bytes = fs::read(path)?;
        let manifest: Self = serde_json::from_slice(&bytes)?;
        Ok((manifest, cache_key(&bytes)))
    }
}

/// A listing with its items already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Base slug, e.g. `/js`. Pages live below it when paginated.
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sublinks: Vec<ListingSublink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<serde_json::Value>,
    /// Explicit breadcrumbs. When absent, nested listings get a trail built
    /// from their parents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<Breadcrumb>>,
    #[serde(default = "default_paginated")]
    pub paginated: bool,
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

fn default_paginated() -> bool {
    true
}

impl Listing {
    /// URL of the listing's first page.
    pub fn first_page(&self) -> String {
        if self.paginated {
            page_slug(&self.slug, 1)
        } else {
            normalize_slug(&self.slug)
        }
    }
}

/// One page to render.
#[derive(Debug, Clone)]
pub struct PlannedPage<'a> {
    pub listing: &'a Listing,
    pub slug: String,
    pub items: &'a [ContentItem],
    pub page_number: usize,
    pub total_pages: usize,
}

impl<'a> PlannedPage<'a> {
    fn paginator(&self) -> Option<Paginator<'a>> {
        let listing: &'a Listing = self.listing;
        (self.total_pages > 1).then_some(Paginator {
            page_number: self.page_number,
            total_pages: self.total_pages,
            base_url: &listing.slug,
        })
    }
}

/// Report of a generate run, consumed by [`crate::output`].
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub listings: Vec<ListingReport>,
    /// Distinct snippets across all pages.
    pub snippets: usize,
    pub assets: usize,
}

#[derive(Debug)]
pub struct ListingReport {
    pub name: String,
    pub pages: Vec<PageReport>,
}

#[derive(Debug)]
pub struct PageReport {
    pub slug: String,
    /// Output file, relative to the output directory.
    pub path: String,
    pub cards: usize,
}

/// Short hex digest used as the icon cache key.
pub fn cache_key(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)[..12].to_string()
}

/// Split listings into pages.
pub fn plan_pages(manifest: &ContentManifest, page_size: usize) -> Vec<PlannedPage<'_>> {
    let page_size = page_size.max(1);
    let mut pages = Vec::new();
    for listing in &manifest.listings {
        if !listing.paginated {
            pages.push(PlannedPage {
                listing,
                slug: normalize_slug(&listing.slug),
                items: &listing.items,
                page_number: 1,
                total_pages: 1,
            });
            continue;
        }
        let total_pages = listing.items.len().div_ceil(page_size).max(1);
        for page_number in 1..=total_pages {
            let start = ((page_number - 1) * page_size).min(listing.items.len());
            let end = (start + page_size).min(listing.items.len());
            pages.push(PlannedPage {
                listing,
                slug: page_slug(&listing.slug, page_number),
                items: &listing.items[start..end],
                page_number,
                total_pages,
            });
        }
    }
    pages
}

/// Load listings and pages into a content graph.
///
/// Fails if a listing's parent is unknown, if the parent chain has a
/// cycle, or if two pages would be written to the same file.
pub fn build_graph(
    manifest: &ContentManifest,
    pages: &[PlannedPage],
) -> Result<ContentGraph, GenerateError> {
    let schema = schema::web_data();
    schema.validate()?;
    let mut graph = ContentGraph::new(schema);

    for listing in &manifest.listings {
        graph.insert(Model::Listing, &listing.id);
    }
    for listing in &manifest.listings {
        if let Some(parent) = &listing.parent {
            graph.link(Model::Listing, &listing.id, "parent", parent)?;
        }
    }

    let mut seen = HashSet::new();
    for page in pages {
        if !seen.insert(output_path(&page.slug)) {
            return Err(GenerateError::DuplicateSlug(page.slug.clone()));
        }
        graph.insert(Model::Page, &page.slug);
        graph.link(Model::Page, &page.slug, "listings", &page.listing.id)?;
        for item in page.items {
            graph.insert(Model::Snippet, &item.url);
            graph.link(Model::Page, &page.slug, "snippets", &item.url)?;
        }
    }
    Ok(graph)
}

/// Breadcrumb trail from the root listing down to `listing`.
fn derived_breadcrumbs(
    graph: &ContentGraph,
    manifest: &ContentManifest,
    listing: &Listing,
) -> Result<Option<Vec<Breadcrumb>>, GraphError> {
    let ancestors = graph.ancestors(Model::Listing, &listing.id, "parent")?;
    if ancestors.is_empty() {
        return Ok(None);
    }
    let crumbs = ancestors
        .iter()
        .rev()
        .filter_map(|id| manifest.listings.iter().find(|l| l.id == *id))
        .chain(std::iter::once(listing))
        .map(|l| Breadcrumb {
            name: l.name.clone(),
            url: l.first_page(),
        })
        .collect();
    Ok(Some(crumbs))
}

/// Output file for a page slug: `/js/p/1` → `js/p/1/index.html`.
pub fn output_path(slug: &str) -> PathBuf {
    let trimmed = slug.trim_matches('/');
    if trimmed.is_empty() {
        PathBuf::from("index.html")
    } else {
        Path::new(trimmed).join("index.html")
    }
}

/// Render `sitemap.xml` for the given page slugs.
pub fn render_sitemap(site_url: &str, slugs: &[&str]) -> String {
    let urlset = html! {
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for slug in slugs {
                url { loc { (site_url) (slug) } }
            }
        }
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
        urlset.into_string()
    )
}

/// Copy every file under `assets_dir` to `<output_dir>/assets`.
fn copy_assets(assets_dir: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    let target = output_dir.join("assets");
    let mut copied = 0;
    for entry in WalkDir::new(assets_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(assets_dir)
            .unwrap_or(entry.path());
        let dst = target.join(rel);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dst)?;
        copied += 1;
    }
    Ok(copied)
}

/// Render the site described by the manifest at `content_path` into `output_dir`.
pub fn generate(
    content_path: &Path,
    output_dir: &Path,
    assets_dir: Option<&Path>,
    config: &SiteConfig,
) -> Result<GenerateReport, GenerateError> {
    let (manifest, manifest_key) = ContentManifest::load(content_path)?;
    let cache_key = config
        .site
        .manifest_cache_key
        .clone()
        .unwrap_or(manifest_key);
    let ctx = RenderContext::new(config, &cache_key);

    let pages = plan_pages(&manifest, config.listing.page_size);
    let graph = build_graph(&manifest, &pages)?;
    tracing::info!(
        listings = manifest.listings.len(),
        pages = pages.len(),
        "rendering site"
    );

    let mut breadcrumbs = Vec::with_capacity(manifest.listings.len());
    for listing in &manifest.listings {
        let crumbs = match &listing.breadcrumbs {
            Some(explicit) => Some(explicit.clone()),
            None => derived_breadcrumbs(&graph, &manifest, listing)?,
        };
        breadcrumbs.push((listing.id.as_str(), crumbs));
    }
    let crumbs_for = |id: &str| {
        breadcrumbs
            .iter()
            .find(|(lid, _)| *lid == id)
            .and_then(|(_, c)| c.as_deref())
    };

    let rendered: Vec<(PathBuf, String)> = pages
        .par_iter()
        .map(|page| {
            let listing = page.listing;
            let props = ListingPageProps {
                slug: &page.slug,
                paginator: page.paginator(),
                snippet_list: page.items,
                listing_name: &listing.name,
                listing_description: &listing.description,
                listing_sublinks: &listing.sublinks,
                listing_cover: listing.cover.as_deref(),
                page_description: listing.page_description.as_deref(),
                structured_data: listing.structured_data.as_ref(),
                breadcrumbs: crumbs_for(&listing.id),
            };
            let html = listing_page(&ctx, &props).into_string();
            (output_path(&page.slug), html)
        })
        .collect();

    fs::create_dir_all(output_dir)?;
    for (rel, html) in &rendered {
        let path = output_dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        tracing::debug!(path = %path.display(), "wrote page");
    }

    let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
    fs::write(
        output_dir.join("sitemap.xml"),
        render_sitemap(&config.site.url, &slugs),
    )?;

    let assets = match assets_dir {
        Some(dir) if dir.is_dir() => copy_assets(dir, output_dir)?,
        _ => 0,
    };

    let mut report = GenerateReport {
        snippets: graph.len(Model::Snippet),
        assets,
        ..Default::default()
    };
    for listing in &manifest.listings {
        let page_reports = pages
            .iter()
            .zip(&rendered)
            .filter(|(page, _)| page.listing.id == listing.id)
            .map(|(page, (rel, _))| PageReport {
                slug: page.slug.clone(),
                path: rel.to_string_lossy().into_owned(),
                cards: page.items.len(),
            })
            .collect();
        report.listings.push(ListingReport {
            name: listing.name.clone(),
            pages: page_reports,
        });
    }
    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
