//! Preview cards for snippets and collections, used on listing pages.
//!
//! The item's `description` is HTML and is injected as-is. Nothing here
//! sanitizes it: whoever builds the [`ContentItem`] is responsible for
//! handing over safe markup. Every other field is escaped.

use super::atoms::{CARD_CLASS, ImageProps, card_subtitle, card_title, image};
use crate::types::ContentItem;
use maud::{Markup, PreEscaped, html};

pub fn preview_card(item: &ContentItem) -> Markup {
    html! {
        li class={ (CARD_CLASS) " list-card grid a-center py-5 px-4 md:p-6 no-overflow" } {
            (image(&ImageProps {
                src: &item.cover,
                alt: "",
                width: 144,
                height: 144,
                class: Some("br-md"),
                loading: Some("lazy"),
                fetch_priority: None,
            }))
            div class="flex flex-col gap-1 md:gap-2" {
                (card_title(true, html! {
                    a class="inherit fill-parent" href=(item.url) { (item.title) }
                }))
                p class="mx-0 mt-1 mb-3 f-clamp fs-sm md:fs-md" {
                    (PreEscaped(&item.description))
                }
                (card_subtitle(html! {
                    (item.tags)
                    " · "
                    span class="inline-block" { (item.extra_context) }
                }))
            }
        }
    }
}

pub fn preview_card_list(items: &[ContentItem]) -> Markup {
    html! {
        ul class="list-section" {
            @for item in items {
                (preview_card(item))
            }
        }
    }
}
