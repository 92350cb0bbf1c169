//! Listing page template.
//!
//! Used for every paginated listing (`/list/p/1`, `/js/p/3`, ...) and for
//! unpaginated ones such as the collections index. The template only
//! forwards props to its children; the chip row and paginator are shown
//! when their props are present.

use super::atoms::{ImageProps, image, listing_chips, page_title};
use super::meta::{MetaProps, meta};
use super::paginator::paginator;
use super::preview_card::preview_card_list;
use super::shell::{base_document, shell};
use super::RenderContext;
use crate::types::{Breadcrumb, ContentItem, ListingSublink, Paginator};
use maud::{Markup, html};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct ListingPageProps<'a> {
    /// Site-relative slug of this page; used as the canonical link.
    pub slug: &'a str,
    pub paginator: Option<Paginator<'a>>,
    pub snippet_list: &'a [ContentItem],
    pub listing_name: &'a str,
    pub listing_description: &'a str,
    pub listing_sublinks: &'a [ListingSublink],
    pub listing_cover: Option<&'a str>,
    pub page_description: Option<&'a str>,
    pub structured_data: Option<&'a Value>,
    pub breadcrumbs: Option<&'a [Breadcrumb]>,
}

/// Title for the document head: the structured data's `name` when
/// structured data is given, the listing name otherwise.
fn head_title<'a>(props: &ListingPageProps<'a>) -> &'a str {
    match props.structured_data {
        Some(data) => data.get("name").and_then(Value::as_str).unwrap_or(""),
        None => props.listing_name,
    }
}

pub fn listing_page(ctx: &RenderContext, props: &ListingPageProps) -> Markup {
    let head = meta(
        ctx,
        &MetaProps {
            title: Some(head_title(props)),
            description: props.page_description,
            logo_src: props.listing_cover,
            structured_data: props.structured_data,
            breadcrumbs: props.breadcrumbs,
            canonical: props.slug,
            ..Default::default()
        },
    );

    let content = html! {
        div class="snippet-list-header g-c1 a-center" {
            div class="md:order-2 md:f-right my-2 mx-3.5 f-center" {
                @if let Some(cover) = props.listing_cover {
                    (image(&ImageProps {
                        src: cover,
                        alt: "",
                        width: 240,
                        height: 240,
                        class: Some("br-md"),
                        loading: None,
                        fetch_priority: Some("high"),
                    }))
                }
            }
            div {
                (page_title("f-center md:f-left", html! { (props.listing_name) }))
                p class="lh-2 mt-4 mx-3.5 mb-2 txt-100 fs-sm md:fs-md" {
                    (props.listing_description)
                }
            }
        }
        @if !props.listing_sublinks.is_empty() {
            (listing_chips(props.listing_sublinks))
        }
        div class="g-c3" {
            (preview_card_list(props.snippet_list))
            @if let Some(p) = &props.paginator {
                (paginator(p, ctx.config.listing.paginator_window))
            }
        }
    };

    base_document(head, shell(ctx, content))
}
