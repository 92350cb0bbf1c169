//! Document `<head>` contents.
//!
//! Builds the title, description, social tags, resource links and the
//! page's script tags. Scripts are assembled as [`ScriptTag`] descriptors
//! first ([`build_scripts`]) and then rendered in order, so the gating
//! rules can be tested without parsing HTML.
//!
//! ## Script gating
//!
//! | Script | Emitted when |
//! |--------|--------------|
//! | `adsense` | production build and an ad client is configured |
//! | `structured-data` | structured data is given |
//! | `breadcrumb-data` | breadcrumbs are given |
//! | `gtag-id`, `gtag`, `gtag-pageview` | browser runtime and an analytics id is configured |
//! | `gtag-consent` | cookies already accepted and an analytics id is configured |
//!
//! The page-view script fires at most once per document: it checks and sets
//! a flag on `window` instead of a local variable, and reads the path at
//! runtime.
//!
//! ## Output order
//!
//! Tag order is fixed: title, description, viewport, Open Graph, Twitter
//! card, scripts, then preconnect/sitemap/feed/preload/icon/manifest links
//! and finally the canonical link.

use super::RenderContext;
use crate::config::{BuildConfig, BuildMode, Runtime, SiteConfig};
use crate::types::Breadcrumb;
use maud::{Markup, PreEscaped, html};
use serde_json::{Value, json};

const AD_SCRIPT_URL: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";
const GTAG_SCRIPT_URL: &str = "https://www.googletagmanager.com/gtag/js";
const PAGEVIEW_FLAG: &str = "__snipsitePageviewFired";

const FONT_PRELOADS: [&str; 4] = [
    "/assets/Inter.var.woff2",
    "/assets/Raleway-Medium.woff2",
    "/assets/RobotoMono-Regular.woff2",
    "/assets/icons.woff2",
];

/// Environment signals that gate script injection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    pub mode: BuildMode,
    pub runtime: Runtime,
    pub accepts_cookies: bool,
}

impl Environment {
    pub fn from_config(build: &BuildConfig) -> Self {
        Self {
            mode: build.mode,
            runtime: build.runtime,
            accepts_cookies: build.accepts_cookies,
        }
    }
}

/// Per-page head inputs.
#[derive(Debug, Clone, Copy)]
pub struct MetaProps<'a> {
    /// Page title; the site name alone is used when `None`.
    pub title: Option<&'a str>,
    /// Page description; the site description is used when `None` or empty.
    pub description: Option<&'a str>,
    /// Open Graph image path; the site logo is used when `None`.
    pub logo_src: Option<&'a str>,
    pub page_type: &'a str,
    pub structured_data: Option<&'a Value>,
    pub breadcrumbs: Option<&'a [Breadcrumb]>,
    /// Canonical slug (not a full URL). No canonical link when empty.
    pub canonical: &'a str,
}

impl Default for MetaProps<'_> {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            logo_src: None,
            page_type: "website",
            structured_data: None,
            breadcrumbs: None,
            canonical: "",
        }
    }
}

/// A `<script>` element to emit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptTag {
    /// Stable identifier; not rendered.
    pub key: &'static str,
    pub src: Option<String>,
    pub script_type: Option<&'static str>,
    pub is_async: bool,
    pub cross_origin: Option<&'static str>,
    pub inner_html: Option<String>,
}

impl ScriptTag {
    fn external(key: &'static str, src: String) -> Self {
        Self {
            key,
            src: Some(src),
            script_type: None,
            is_async: true,
            cross_origin: None,
            inner_html: None,
        }
    }

    fn inline(key: &'static str, script_type: Option<&'static str>, body: String) -> Self {
        Self {
            key,
            src: None,
            script_type,
            is_async: false,
            cross_origin: None,
            inner_html: Some(body),
        }
    }
}

/// Serialize JSON for embedding inside a `<script>` element.
///
/// `<` is written as its unicode escape so the payload can never close the
/// surrounding element.
fn script_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
}

fn breadcrumb_list(site_url: &str, breadcrumbs: &[Breadcrumb]) -> Value {
    let items: Vec<Value> = breadcrumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "item": {
                    "@id": format!("{site_url}{}", crumb.url),
                    "name": crumb.name,
                },
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// Assemble the page's scripts in emission order.
pub fn build_scripts(props: &MetaProps, env: Environment, config: &SiteConfig) -> Vec<ScriptTag> {
    let mut scripts = Vec::new();

    if let (BuildMode::Production, Some(client)) = (env.mode, &config.ads.client) {
        let mut ad = ScriptTag::external("adsense", format!("{AD_SCRIPT_URL}?client={client}"));
        ad.cross_origin = Some("anonymous");
        scripts.push(ad);
    }

    if let Some(data) = props.structured_data {
        scripts.push(ScriptTag::inline(
            "structured-data",
            Some("application/ld+json"),
            script_json(data),
        ));
    }

    if let Some(breadcrumbs) = props.breadcrumbs {
        scripts.push(ScriptTag::inline(
            "breadcrumb-data",
            Some("application/ld+json"),
            script_json(&breadcrumb_list(&config.site.url, breadcrumbs)),
        ));
    }

    let analytics = &config.analytics;
    if let (Runtime::Browser, Some(id)) = (env.runtime, &analytics.id) {
        scripts.push(ScriptTag::external(
            "gtag-id",
            format!("{GTAG_SCRIPT_URL}?id={id}"),
        ));
        scripts.push(ScriptTag::inline(
            "gtag",
            None,
            format!(
                "window.dataLayer = window.dataLayer || [];\
                 function gtag(){{dataLayer.push(arguments);}}\
                 gtag('js', new Date());\
                 gtag('consent', 'default', {consent});\
                 gtag('config', {id}, {config});",
                consent = script_json(&analytics.consent),
                id = script_json(id),
                config = script_json(&analytics.config),
            ),
        ));
        scripts.push(ScriptTag::inline(
            "gtag-pageview",
            None,
            format!(
                "if(!window.{PAGEVIEW_FLAG}){{\
                 window.{PAGEVIEW_FLAG}=true;\
                 gtag('event', 'page_view', {{ page_path: window.location.pathname }});\
                 }}"
            ),
        ));
    }

    if env.accepts_cookies && analytics.id.is_some() {
        scripts.push(ScriptTag::inline(
            "gtag-consent",
            None,
            format!(
                "gtag('consent', 'update', {});",
                script_json(&analytics.consent_granted)
            ),
        ));
    }

    scripts
}

fn render_script(script: &ScriptTag) -> Markup {
    html! {
        script
            type=[script.script_type]
            src=[script.src.as_deref()]
            async[script.is_async]
            crossorigin=[script.cross_origin] {
            @if let Some(body) = &script.inner_html {
                (PreEscaped(body))
            }
        }
    }
}

/// Render the contents of `<head>` (without the `<head>` element itself).
pub fn meta(ctx: &RenderContext, props: &MetaProps) -> Markup {
    let site = &ctx.config.site;
    let title = match props.title {
        Some(t) if !t.is_empty() => format!("{t} - {}", site.name),
        _ => site.name.clone(),
    };
    let description = props
        .description
        .filter(|d| !d.is_empty())
        .unwrap_or(&site.description);
    let og_image = ctx.absolute(props.logo_src.unwrap_or(&site.logo));
    let scripts = build_scripts(props, ctx.env, ctx.config);
    let v = ctx.cache_key;

    html! {
        title { (title) }
        meta name="description" content=(description);
        meta name="viewport" content="width=device-width, initial-scale=1";
        meta property="og:title" content=(title);
        meta property="og:description" content=(description);
        meta property="og:type" content=(props.page_type);
        meta property="og:image" content=(og_image);
        meta name="twitter:card" content="summary_large_image";
        @for script in &scripts {
            (render_script(script))
        }
        link rel="preconnect dns-prefetch" href="https://www.google-analytics.com";
        link rel="sitemap" href="/sitemap.xml" type="application/xml";
        link rel="alternate" href="/feed" type="application/rss+xml" title=(site.name);
        @for font in FONT_PRELOADS {
            link rel="preload" type="font/woff2" href=(font) as="font" crossorigin="anonymous";
        }
        link rel="icon" href={ "/assets/icons/favicon-32x32.png?v=" (v) } type="image/png";
        link rel="manifest" href="/manifest.webmanifest" crossorigin="anonymous";
        meta name="theme-color" content=(site.theme_color);
        link rel="icon" sizes="192x192" href={ "/assets/icons/icon-192x192.png?v=" (v) };
        link rel="apple-touch-icon" href={ "/assets/icons/icon-180x180.png?v=" (v) };
        @if !props.canonical.is_empty() {
            link rel="canonical" href=(ctx.absolute(props.canonical));
        }
    }
}
