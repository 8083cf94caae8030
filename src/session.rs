//! Page controller binding the query engine to a URL location.
//!
//! The URL is the single source of truth: every event writes a new URL
//! through the [`Location`], then [`BlogSession::sync`] re-derives the
//! state from it. Reloading a URL therefore reproduces the exact view.
//!
//! ```text
//! event ──► next QueryState ──► serialize_state ──► Location::navigate
//!                                                        │
//!        view() ◄── QueryState ◄── parse_state ◄── sync ◄┘
//! ```

use crate::{
    config::BlogConfig,
    location::{Location, NavigationMode},
    post::{Post, Roster},
    query::{
        Facet, PageView, QueryState, Selection, SortKey, Vocabulary, clamp_page, parse_state,
        resolve_page_for_expanded_post, serialize_state, visible_posts,
    },
    store::{FLAG_COMPACT, FlagStore},
};
use serde::Serialize;
use std::sync::Arc;

/// Everything a listing renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView<'a> {
    pub url: &'a str,
    pub state: &'a QueryState,
    #[serde(flatten)]
    pub page: PageView<'a>,
}

/// One blog listing bound to a location and a flag store.
pub struct BlogSession<L: Location, S: FlagStore> {
    posts: Arc<Vec<Post>>,
    roster: Roster,
    vocabulary: Vocabulary,
    page_size: usize,
    base_path: String,
    location: L,
    flags: S,
    state: QueryState,
}

impl<L: Location, S: FlagStore> BlogSession<L, S> {
    /// Create a session and sync it with the location's current URL.
    pub fn new(posts: Arc<Vec<Post>>, roster: Roster, blog: &BlogConfig, location: L, flags: S) -> Self {
        let vocabulary = Vocabulary::collect(&posts);
        let mut session = Self {
            posts,
            roster,
            vocabulary,
            page_size: blog.page_size.max(1),
            base_path: blog.base_path.trim_end_matches('/').to_owned(),
            location,
            flags,
            state: QueryState::default(),
        };
        session.sync();
        session
    }

    /// Re-derive the state from the current URL.
    ///
    /// The page is clamped into range. When the fragment names a post of the
    /// filtered list that lives on another page, the URL is replaced with
    /// that page. A fragment naming an unknown or filtered-out post is left
    /// alone and nothing is shown expanded.
    pub fn sync(&mut self) {
        let mut state = parse_state(self.location.current());

        let jump = {
            let filtered = visible_posts(&self.posts, &state, self.roster.default_author());
            state.page_number = clamp_page(state.page_number, filtered.len(), self.page_size);
            state
                .expanded_post_key
                .as_deref()
                .and_then(|key| resolve_page_for_expanded_post(&filtered, key, self.page_size))
                .filter(|&target| target != state.page_number)
        };

        if let Some(target) = jump {
            state.page_number = target;
            let url = serialize_state(&state, self.location.current());
            self.location.navigate(&url, NavigationMode::Replace);
        }
        self.state = state;
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Typing in the search box: replaces the history entry.
    pub fn set_search(&mut self, text: &str) {
        let mut next = self.filtered_state();
        next.search_text = text.to_owned();
        self.apply(&next, NavigationMode::Replace);
    }

    pub fn set_facet(&mut self, facet: Facet, selection: Selection) {
        let mut next = self.filtered_state();
        *next.selected_mut(facet) = selection;
        self.apply(&next, NavigationMode::Push);
    }

    /// Select `value` if absent, deselect it otherwise.
    pub fn toggle_facet(&mut self, facet: Facet, value: &str) {
        let mut selection = self.state.selected(facet).clone();
        if !selection.remove(value) {
            selection.insert(value.to_owned());
        }
        self.set_facet(facet, selection);
    }

    pub fn set_sort(&mut self, key: SortKey) {
        let mut next = self.filtered_state();
        next.sort_key = key;
        self.apply(&next, NavigationMode::Push);
    }

    /// Clear search, facets, sort and expansion.
    pub fn reset(&mut self) {
        self.apply(&QueryState::default(), NavigationMode::Push);
    }

    /// Change page, keeping the expanded post.
    pub fn set_page(&mut self, page: usize) {
        let next = self.state.with_page(page);
        self.apply(&next, NavigationMode::Push);
    }

    /// Expand a post in place, or open its article page in compact view.
    pub fn open_post(&mut self, key: &str) {
        if self.flags.flag(FLAG_COMPACT) {
            let url = self.article_path(key);
            self.navigate(&url, NavigationMode::Push);
            return;
        }

        let mut next = self.state.clone();
        next.expanded_post_key = Some(key.to_owned());
        self.apply(&next, NavigationMode::Push);
    }

    pub fn close_post(&mut self) {
        let mut next = self.state.clone();
        next.expanded_post_key = None;
        self.apply(&next, NavigationMode::Push);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn url(&self) -> &str {
        self.location.current()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Mutable access for external navigation (back/forward). Call
    /// [`sync`](Self::sync) afterwards.
    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn flags(&self) -> &S {
        &self.flags
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Facet options over the whole collection.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The full filtered and sorted list.
    pub fn visible(&self) -> Vec<&Post> {
        visible_posts(&self.posts, &self.state, self.roster.default_author())
    }

    /// The current page of the listing.
    pub fn view(&self) -> ListingView<'_> {
        let filtered = self.visible();
        ListingView {
            url: self.location.current(),
            state: &self.state,
            page: PageView::build(&filtered, &self.state, self.page_size),
        }
    }

    /// Post shown when the location is an article page.
    pub fn article(&self) -> Option<&Post> {
        let prefix = format!("{}/article/", self.base_path);
        let rest = self.location.current().strip_prefix(&prefix)?;
        let raw = rest.split(['?', '#']).next().unwrap_or_default();
        let key = urlencoding::decode(raw).ok()?;
        self.posts.iter().find(|p| p.key == key)
    }

    pub fn article_path(&self, key: &str) -> String {
        format!("{}/article/{}", self.base_path, urlencoding::encode(key))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Current filters on page 1 with no expansion, the base of every
    /// filter-changing event.
    fn filtered_state(&self) -> QueryState {
        QueryState {
            page_number: 1,
            expanded_post_key: None,
            ..self.state.clone()
        }
    }

    fn apply(&mut self, next: &QueryState, mode: NavigationMode) {
        let url = serialize_state(next, self.location.current());
        self.navigate(&url, mode);
    }

    fn navigate(&mut self, url: &str, mode: NavigationMode) {
        if url == self.location.current() {
            return;
        }
        self.location.navigate(url, mode);
        self.sync();
    }
}
