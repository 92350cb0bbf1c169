//! Page layout: the HTML document, site header and footer.

use super::RenderContext;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../../static/style.css");

/// Renders the full HTML document around `head` and `body` contents.
pub fn base_document(head: Markup, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                (head)
                style { (PreEscaped(CSS)) }
            }
            body {
                (body)
            }
        }
    }
}

fn site_header(ctx: &RenderContext) -> Markup {
    html! {
        header class="nav-bar flex a-center j-space-between px-4" {
            a class="nav-home fs-lg f-alt" href="/" aria-label="Home" {
                (ctx.config.site.name)
            }
            nav class="nav-links flex gap-4" {
                a href="/list/p/1" { "Snippets" }
                a href="/collections/p/1" { "Collections" }
            }
        }
    }
}

fn site_footer(ctx: &RenderContext) -> Markup {
    html! {
        footer class="site-footer txt-050 fs-xs my-6 mx-3.5" {
            p { (ctx.config.site.name) }
            nav class="flex gap-4" {
                a href="/feed" { "RSS" }
                a href="/sitemap.xml" { "Sitemap" }
            }
        }
    }
}

/// Site chrome around page content.
pub fn shell(ctx: &RenderContext, content: Markup) -> Markup {
    html! {
        (site_header(ctx))
        main class="page-container" {
            (content)
        }
        (site_footer(ctx))
    }
}
