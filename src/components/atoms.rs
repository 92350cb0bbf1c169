//! Smallest building blocks: card pieces, images, titles and chips.

use crate::types::ListingSublink;
use maud::{Markup, html};

/// Base classes shared by every card surface.
pub const CARD_CLASS: &str = "card srfc-01dp txt-100 br-lg";

/// What a card represents. Snippet icons are round, collection icons are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Snippet,
    Collection,
}

/// Generic card: a `<div>` with the card classes plus `class`.
pub fn card(class: &str, content: Markup) -> Markup {
    html! {
        div class={ (CARD_CLASS) " " (class) } {
            (content)
        }
    }
}

pub fn card_icon(icon: &str, kind: CardKind) -> Markup {
    let radius = match kind {
        CardKind::Snippet => "br-round",
        CardKind::Collection => "br-xl",
    };
    html! {
        img src={ "/assets/icons/" (icon) ".svg" }
            class={ "card-icon relative inline-block " (radius) " icon icon-" (icon) " before:fs-lg mt-1" }
            alt="";
    }
}

/// Card heading: `h1` for a primary card, `h3` inside lists.
pub fn card_title(is_secondary: bool, content: Markup) -> Markup {
    const CLASS: &str = "card-title m-0 txt-200 fs-lg md:fs-xl f-alt f-ellipsis";
    html! {
        @if is_secondary {
            h3 class=(CLASS) { (content) }
        } @else {
            h1 class=(CLASS) { (content) }
        }
    }
}

pub fn card_subtitle(content: Markup) -> Markup {
    html! {
        p class="inline-block txt-050 fs-xs m-0" { (content) }
    }
}

/// Attributes of an `<img>`. Optional attributes are omitted when `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProps<'a> {
    pub src: &'a str,
    pub alt: &'a str,
    pub width: u32,
    pub height: u32,
    pub class: Option<&'a str>,
    pub loading: Option<&'a str>,
    pub fetch_priority: Option<&'a str>,
}

pub fn image(props: &ImageProps) -> Markup {
    html! {
        img src=(props.src)
            alt=(props.alt)
            width=(props.width)
            height=(props.height)
            class=[props.class]
            loading=[props.loading]
            fetchpriority=[props.fetch_priority];
    }
}

pub fn page_title(class: &str, content: Markup) -> Markup {
    html! {
        h1 class={ "page-title " (class) } { (content) }
    }
}

/// Chip row linking to related listings.
pub fn listing_chips(items: &[ListingSublink]) -> Markup {
    html! {
        ul class="listing-chips flex gap-2 my-4 mx-3.5" {
            @for item in items {
                li {
                    a.chip.selected[item.selected] href=(item.url) {
                        (item.name)
                    }
                }
            }
        }
    }
}
