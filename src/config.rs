//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered over stock defaults, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Snippets"
//! description = "Short code snippets for all your development needs."
//! url = "https://example.com"      # No trailing slash
//! logo = "/assets/logo.png"
//! theme_color = "#1e253d"
//! # manifest_cache_key = "v1"      # Defaults to a hash of the content manifest
//!
//! [build]
//! mode = "production"              # "production" | "development"
//! runtime = "browser"              # "browser" | "server"
//! accepts_cookies = false
//!
//! [ads]
//! # client = "ca-pub-0000000000000000"
//!
//! [analytics]
//! # id = "G-XXXXXXXXXX"
//!
//! [analytics.consent]
//! ad_storage = "denied"
//! analytics_storage = "denied"
//!
//! [analytics.consent_granted]
//! ad_storage = "granted"
//! analytics_storage = "granted"
//!
//! [analytics.config]
//! anonymize_ip = true
//!
//! [listing]
//! page_size = 24                   # Cards per listing page
//! paginator_window = 1             # Page buttons shown either side of the current one
//!
//! [processing]
//! max_processes = 4                # Max parallel render workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity used in titles, meta tags and absolute URLs.
    pub site: SiteSettings,
    /// Environment signals consumed by the document head.
    pub build: BuildConfig,
    pub ads: AdsConfig,
    pub analytics: AnalyticsConfig,
    /// Listing pagination.
    pub listing: ListingConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.page_size == 0 {
            return Err(ConfigError::Validation(
                "listing.page_size must be at least 1".into(),
            ));
        }
        let url = &self.site.url;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "site.url must be an absolute http(s) URL".into(),
            ));
        }
        if url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.url must not end with a slash".into(),
            ));
        }
        if !self.site.theme_color.starts_with('#') {
            return Err(ConfigError::Validation(
                "site.theme_color must be a hex color".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    pub name: String,
    /// Fallback page description.
    pub description: String,
    /// Absolute base URL, without trailing slash.
    pub url: String,
    /// Default Open Graph image path.
    pub logo: String,
    pub theme_color: String,
    /// Cache-busting query value for icons. When unset the generator derives
    /// one from the content manifest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_cache_key: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: "Snippets".to_string(),
            description: "Short code snippets for all your development needs.".to_string(),
            url: "https://example.com".to_string(),
            logo: "/assets/logo.png".to_string(),
            theme_color: "#1e253d".to_string(),
            manifest_cache_key: None,
        }
    }
}

/// Build mode. Ads are only injected in production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Production,
    Development,
}

/// Where the rendered head is evaluated. Analytics scripts are only
/// emitted for the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    #[default]
    Browser,
    Server,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub mode: BuildMode,
    pub runtime: Runtime,
    /// Treat cookie consent as already granted.
    pub accepts_cookies: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdsConfig {
    /// Ad publisher client id. No ad script is emitted without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Measurement id. No analytics scripts are emitted without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Consent state sent before the visitor decides.
    pub consent: BTreeMap<String, String>,
    /// Consent state sent once cookies are accepted.
    pub consent_granted: BTreeMap<String, String>,
    /// Extra parameters for the analytics `config` call.
    pub config: toml::Table,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let storage = |state: &str| {
            BTreeMap::from([
                ("ad_storage".to_string(), state.to_string()),
                ("analytics_storage".to_string(), state.to_string()),
            ])
        };
        let mut config = toml::Table::new();
        config.insert("anonymize_ip".to_string(), toml::Value::Boolean(true));
        Self {
            id: None,
            consent: storage("denied"),
            consent_granted: storage("granted"),
            config,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Preview cards per listing page.
    pub page_size: usize,
    /// Page buttons shown on each side of the current page.
    pub paginator_window: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 24,
            paginator_window: 1,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(dir = %dir.display(), mode = ?config.build.mode, "loaded config");
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# snipsite configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

[site]
# Site name, appended to every page title ("Page - Site").
name = "Snippets"
# Description used when a page does not provide its own.
description = "Short code snippets for all your development needs."
# Absolute base URL for canonical links and Open Graph images. No trailing slash.
url = "https://example.com"
# Default Open Graph image, relative to the site root.
logo = "/assets/logo.png"
theme_color = "#1e253d"
# Cache-busting value appended to icon URLs.
# Omit to derive one from the content manifest.
# manifest_cache_key = "v1"

[build]
# "production" or "development". Ads are only injected in production.
mode = "production"
# "browser" or "server". Analytics scripts are only emitted for the browser.
runtime = "browser"
# Emit the consent-update script as if cookies were already accepted.
accepts_cookies = false

[ads]
# Ad publisher client id. Leave unset to disable ads.
# client = "ca-pub-0000000000000000"

[analytics]
# Measurement id. Leave unset to disable analytics.
# id = "G-XXXXXXXXXX"

[analytics.consent]
ad_storage = "denied"
analytics_storage = "denied"

[analytics.consent_granted]
ad_storage = "granted"
analytics_storage = "granted"

[analytics.config]
anonymize_ip = true

[listing]
# Preview cards per listing page.
page_size = 24
# Page buttons shown on each side of the current page.
paginator_window = 1

[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn default_build_signals() {
        let config = SiteConfig::default();
        assert_eq!(config.build.mode, BuildMode::Production);
        assert_eq!(config.build.runtime, Runtime::Browser);
        assert!(!config.build.accepts_cookies);
        assert!(config.ads.client.is_none());
        assert!(config.analytics.id.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[site]
name = "30 seconds"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.name, "30 seconds");
        assert_eq!(config.site.url, "https://example.com");
        assert_eq!(config.listing.page_size, 24);
    }

    #[test]
    fn parse_build_modes() {
        let toml = r#"
[build]
mode = "development"
runtime = "server"
accepts_cookies = true
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.build.mode, BuildMode::Development);
        assert_eq!(config.build.runtime, Runtime::Server);
        assert!(config.build.accepts_cookies);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.name, "Snippets");
        assert_eq!(config.analytics.consent["ad_storage"], "denied");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[analytics]
id = "G-TEST"

[analytics.consent]
ad_storage = "granted"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.analytics.id.as_deref(), Some("G-TEST"));
        assert_eq!(config.analytics.consent["ad_storage"], "granted");
        // Merged, not replaced
        assert_eq!(config.analytics.consent["analytics_storage"], "denied");
        assert_eq!(config.analytics.config["anonymize_ip"], toml::Value::Boolean(true));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[site]
nmae = "typo"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[themes]\ncolor = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_zero_page_size() {
        let mut config = SiteConfig::default();
        config.listing.page_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_url_trailing_slash() {
        let mut config = SiteConfig::default();
        config.site.url = "https://example.com/".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_relative_url() {
        let mut config = SiteConfig::default();
        config.site.url = "example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_runs_after_merge() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[listing]\npage_size = 0\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[x.y]\na = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[x.y]\nb = 5\nc = 6").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["x"]["y"]["a"].as_integer(), Some(1));
        assert_eq!(merged["x"]["y"]["b"].as_integer(), Some(5));
        assert_eq!(merged["x"]["y"]["c"].as_integer(), Some(6));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.name, defaults.site.name);
        assert_eq!(config.site.url, defaults.site.url);
        assert_eq!(config.listing.page_size, defaults.listing.page_size);
        assert_eq!(config.analytics.consent, defaults.analytics.consent);
        assert_eq!(config.analytics.config, defaults.analytics.config);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_threads(&config), cores);
    }
}
