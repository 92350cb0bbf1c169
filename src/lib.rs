//! # snipsite
//!
//! A static renderer for snippet and article listing sites. Content arrives
//! as a manifest of already-resolved listings; snipsite checks it against
//! the site's content schema and renders every listing page to plain HTML.
//!
//! # Architecture
//!
//! ```text
//! content.json ─┬─> graph check (schema invariants)
//!               └─> plan pages ─> render (rayon) ─> dist/
//! ```
//!
//! Rendering is a pure function from content objects to markup. Nothing is
//! fetched or cached while rendering, and pages do not depend on each other,
//! so they render in parallel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`schema`] | Content entities and their `manyToOne` / `manyToMany` relationships |
//! | [`graph`] | In-memory record graph that enforces the schema's invariants |
//! | [`components`] | Maud components: atoms, preview cards, document head, listing template |
//! | [`generate`] | Content manifest loading, pagination, page rendering, sitemap |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Content objects consumed by the components |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Components
//!
//! Components are plain functions taking explicit prop structs and
//! returning [`maud::Markup`]. Composition is by calling: templates call
//! organisms, organisms call molecules, molecules call atoms. There is no
//! component trait and no dynamic dispatch.
//!
//! All interpolation is escaped by maud. The one exception is a preview
//! card's description, which is HTML by contract and must be sanitized by
//! whoever produces the content manifest.
//!
//! ## Schema as Data
//!
//! The relationship schema is a value, not code: it serializes to the
//! shape external content tooling consumes (`snipsite schema`). The
//! [`graph`] module is the storage-side counterpart that actually holds
//! records to single ownership, symmetric many-to-many links, and the
//! listing tree.
//!
//! ## Environment Signals
//!
//! Build mode, runtime and cookie consent come from `config.toml` (and
//! CLI overrides) and gate which scripts the document head emits. See
//! [`components::meta`].

pub mod components;
pub mod config;
pub mod generate;
pub mod graph;
pub mod output;
pub mod schema;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
