//! The post query engine: filter, sort, paginate and URL-sync a post list.
//!
//! # Pipeline
//!
//! ```text
//!            parse_state()                visible_posts()            PageView::build()
//! /blog?... ─────────────► QueryState ──────────────────► Vec<&Post> ────────────────► page slice
//!     ▲                        │                                                        + expanded
//!     └────────────────────────┘
//!          serialize_state()
//! ```
//!
//! Every function here is pure and total. Malformed URLs, unknown sort
//! keys and missing dates degrade to defaults; the worst outcome is an
//! empty list.

mod facets;
mod filter;
mod page;
mod state;
mod url;

pub use facets::{Vocabulary, facet_vocabulary};
pub use filter::{matches_facets, matches_search, sort_posts, visible_posts};
pub use page::{DEFAULT_PAGE_SIZE, clamp_page, page_window, total_pages};
pub use state::{Facet, QueryState, Selection, SortKey};
pub use url::{DEFAULT_BASE_PATH, ListingUrl, parse_state, serialize_state};

use crate::post::Post;
use serde::Serialize;

/// Page of `filtered` that contains the post `key`.
///
/// Returns `None` for stale or filtered-out keys; the caller then keeps its
/// current page and shows no expanded post.
pub fn resolve_page_for_expanded_post(
    filtered: &[&Post],
    key: &str,
    page_size: usize,
) -> Option<usize> {
    page::page_for_key(filtered, key, page_size, |p| p.key.as_str())
}

/// One rendered page of the listing.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    /// Current page after clamping, 1-based
    pub page: usize,
    pub total_pages: usize,
    /// Number of posts passing the filters
    pub total: usize,
    pub page_size: usize,
    pub posts: Vec<&'a Post>,
    /// The expanded post, only when it is part of the filtered list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<&'a Post>,
}

impl<'a> PageView<'a> {
    /// Slice `filtered` for `state`, clamping the page into range.
    pub fn build(filtered: &[&'a Post], state: &QueryState, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let page = clamp_page(state.page_number, filtered.len(), page_size);
        let expanded = state
            .expanded_post_key
            .as_deref()
            .and_then(|key| filtered.iter().find(|p| p.key == key))
            .copied();

        Self {
            page,
            total_pages: total_pages(filtered.len(), page_size),
            total: filtered.len(),
            page_size,
            posts: page_window(filtered, page, page_size).to_vec(),
            expanded,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
