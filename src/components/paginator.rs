//! Page navigation for paginated listings.
//!
//! Shows previous/next arrows, the first and last page, and a window of
//! pages around the current one. Gaps collapse to an ellipsis:
//!
//! ```text
//! ‹  1  …  4  [5]  6  …  12  ›
//! ```

use crate::types::Paginator;
use maud::{Markup, html};

/// One slot in the paginator bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(usize),
    Current(usize),
    Ellipsis,
}

/// Buttons for `paginator`, showing `window` pages either side of the current one.
pub fn page_buttons(paginator: &Paginator, window: usize) -> Vec<PageButton> {
    let total = paginator.total_pages;
    let current = paginator.page_number.clamp(1, total.max(1));
    let lo = current.saturating_sub(window).max(1);
    let hi = (current + window).min(total);

    let mut pages: Vec<usize> = (lo..=hi).collect();
    if lo > 1 {
        pages.insert(0, 1);
    }
    if hi < total {
        pages.push(total);
    }

    let mut buttons = Vec::with_capacity(pages.len() + 2);
    let mut prev = 0;
    for page in pages {
        if prev != 0 && page > prev + 1 {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(if page == current {
            PageButton::Current(page)
        } else {
            PageButton::Page(page)
        });
        prev = page;
    }
    buttons
}

pub fn paginator(paginator: &Paginator, window: usize) -> Markup {
    html! {
        nav class="paginator flex j-center a-center gap-2 my-6" aria-label="Pagination" {
            @if paginator.has_previous() {
                a class="btn previous-page" href=(paginator.page_url(paginator.page_number - 1))
                    rel="prev" aria-label="Previous page" { "‹" }
            }
            @for button in page_buttons(paginator, window) {
                @match button {
                    PageButton::Page(n) => {
                        a class="btn" href=(paginator.page_url(n)) { (n) }
                    }
                    PageButton::Current(n) => {
                        span class="btn current-page" aria-current="page" { (n) }
                    }
                    PageButton::Ellipsis => {
                        span class="ellipsis" { "…" }
                    }
                }
            }
            @if paginator.has_next() {
                a class="btn next-page" href=(paginator.page_url(paginator.page_number + 1))
                    rel="next" aria-label="Next page" { "›" }
            }
        }
    }
}
