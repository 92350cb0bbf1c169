//! HTML components.
//!
//! Components are plain functions from explicit prop structs to
//! [`maud::Markup`], layered the same way the site's design system is:
//!
//! | Layer | Module | Components |
//! |-------|--------|------------|
//! | Atoms | [`atoms`] | card shell, titles, icons, images, listing chips |
//! | Molecules | [`preview_card`], [`paginator`] | preview card, paginator |
//! | Organisms | [`preview_card`], [`meta`], [`shell`] | card list, document head, page layout |
//! | Templates | [`listing_page`] | listing page |
//!
//! Higher layers compose lower ones; nothing holds state between renders.
//! Interpolated values are escaped by maud, except where a component
//! documents a raw-HTML field.

pub mod atoms;
pub mod listing_page;
pub mod meta;
pub mod paginator;
pub mod preview_card;
pub mod shell;

use crate::config::SiteConfig;
use meta::Environment;

/// Site-wide values every page render needs.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub env: Environment,
    /// Cache-busting query value for icon URLs.
    pub cache_key: &'a str,
}

impl<'a> RenderContext<'a> {
    /// Context with environment signals taken from `config.build`.
    pub fn new(config: &'a SiteConfig, cache_key: &'a str) -> Self {
        Self {
            config,
            env: Environment::from_config(&config.build),
            cache_key,
        }
    }

    /// Absolute URL for a site-relative path.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.config.site.url, path)
    }
}
