//! Filtering and ordering of the post collection.
//!
//! A post is visible when it passes the search and every active facet:
//!
//! ```text
//! visible = search ∧ tags ∧ authors ∧ values ∧ vendors ∧ tech ∧ other
//! facet   = selection empty ∨ (post values ∩ selection ≠ ∅)
//! ```

use super::state::{Facet, QueryState, SortKey};
use crate::{
    post::Post,
    utils::{
        date::sort_timestamp,
        text::{collate, md_to_plain, normalize},
    },
};

/// Filter and sort `posts` for `state`. Pagination is left to the caller.
///
/// `fallback_author` is the name searched for posts without an author. It
/// does not make such posts match an author facet selection.
pub fn visible_posts<'a>(
    posts: &'a [Post],
    state: &QueryState,
    fallback_author: Option<&str>,
) -> Vec<&'a Post> {
    let needle = normalize(&state.search_text);

    let mut list: Vec<&Post> = posts
        .iter()
        .filter(|post| matches_search(post, &needle, fallback_author))
        .filter(|post| matches_facets(post, state))
        .collect();

    sort_posts(&mut list, state.sort_key);
    list
}

/// Substring search over text fields, the (fallback) author and facet values.
///
/// `needle` must already be normalized; an empty needle matches everything.
pub fn matches_search(post: &Post, needle: &str, fallback_author: Option<&str>) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |s: &str| normalize(s).contains(needle);

    let author = if post.is_attributed() {
        post.author.as_str()
    } else {
        fallback_author.unwrap_or_default()
    };

    hit(&post.title)
        || hit(&post.excerpt)
        || hit(author)
        || Facet::ALL
            .into_iter()
            .filter(|f| *f != Facet::Authors)
            .any(|f| post.facet_values(f).iter().any(|v| hit(v)))
        || hit(&md_to_plain(&post.content_md))
}

/// Every active facet must share at least one value with the post.
pub fn matches_facets(post: &Post, state: &QueryState) -> bool {
    state.active_facets().all(|(facet, selection)| {
        post.facet_values(facet)
            .iter()
            .any(|value| selection.contains(value))
    })
}

/// Stable in-place sort. Missing or unparseable dates order as the epoch.
pub fn sort_posts(list: &mut [&Post], key: SortKey) {
    match key {
        SortKey::DateDesc => {
            list.sort_by_cached_key(|p| std::cmp::Reverse(sort_timestamp(p.date.as_deref())))
        }
        SortKey::DateAsc => list.sort_by_cached_key(|p| sort_timestamp(p.date.as_deref())),
        SortKey::TitleAsc => list.sort_by(|a, b| collate(&a.title, &b.title)),
        SortKey::TitleDesc => list.sort_by(|a, b| collate(&b.title, &a.title)),
    }
}
