//! Two-way mapping between [`QueryState`] and shareable listing URLs.
//!
//! # URL Shape
//!
//! ```text
//! /blog?q=zero+trust&tags=Security,Web&sort=title-asc&page=2#hardening-guide
//! ^^^^^ ^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^ ^^^^^^ ^^^^^^^^^^^^^^^
//! path  search       facet (comma list) sort           page   expanded post
//! ```
//!
//! | Parameter | State field                | Default (omitted) |
//! |-----------|----------------------------|-------------------|
//! | `q`       | `search_text`              | empty             |
//! | `tags`    | `selected_tags`            | empty             |
//! | `authors` | `selected_authors`         | empty             |
//! | `values`  | `selected_values`          | empty             |
//! | `vendors` | `selected_vendors`         | empty             |
//! | `tech`    | `selected_technologies`    | empty             |
//! | `other`   | `selected_other`           | empty             |
//! | `sort`    | `sort_key`                 | `date-desc`       |
//! | `page`    | `page_number`              | always written    |
//!
//! Parsing is total: anything malformed degrades to the default.
//! Unrecognized parameters survive serialization untouched.

use super::state::{Facet, QueryState, Selection, SortKey};
use std::borrow::Cow;

/// Listing path used when a URL carries no path of its own
pub const DEFAULT_BASE_PATH: &str = "/blog";

/// A URL split into its path, raw query pairs and decoded fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingUrl {
    pub path: String,
    /// Raw (still percent-encoded) `key=value` segments in order
    pub pairs: Vec<(String, String)>,
    pub fragment: Option<String>,
}

impl ListingUrl {
    /// Split a relative or absolute URL. Never fails.
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, frag)) => (rest, Some(decode_fragment(frag).into_owned())),
            None => (url, None),
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        let pairs = query
            .split('&')
            .filter(|seg| !seg.is_empty())
            .map(|seg| {
                let (k, v) = seg.split_once('=').unwrap_or((seg, ""));
                (k.to_owned(), v.to_owned())
            })
            .collect();

        Self {
            path: path.to_owned(),
            pairs,
            fragment: fragment.filter(|f| !f.is_empty()),
        }
    }

    /// First decoded value of a parameter, like `URLSearchParams.get`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(k, _)| decode(k) == key)
            .map(|(_, v)| decode(v).into_owned())
    }
}

/// Read the listing state from a URL.
pub fn parse_state(url: &str) -> QueryState {
    let url = ListingUrl::parse(url);
    let mut state = QueryState {
        search_text: url.get("q").unwrap_or_default(),
        ..QueryState::default()
    };

    for facet in Facet::ALL {
        if let Some(raw) = url.get(facet.param()) {
            *state.selected_mut(facet) = split_list(&raw);
        }
    }

    state.sort_key = url
        .get("sort")
        .and_then(|s| SortKey::parse(&s))
        .unwrap_or_default();
    state.page_number = url.get("page").map_or(1, |p| parse_page(&p));
    state.expanded_post_key = url.fragment;

    state
}

/// Write `state` into `current_url`, returning the new relative URL.
///
/// Parameters equal to their default are removed, `page` is always written,
/// and the fragment is exactly `state.expanded_post_key`. Callers that must
/// drop an expansion (filter changes) clear it on the state first.
pub fn serialize_state(state: &QueryState, current_url: &str) -> String {
    let current = ListingUrl::parse(current_url);

    let mut updates: Vec<(&str, Option<String>)> = Vec::with_capacity(9);
    updates.push(("q", non_empty(&state.search_text).map(encode_value)));
    for facet in Facet::ALL {
        updates.push((facet.param(), join_list(state.selected(facet))));
    }
    updates.push((
        "sort",
        (state.sort_key != SortKey::default()).then(|| state.sort_key.as_str().to_owned()),
    ));
    updates.push(("page", Some(state.page_number.max(1).to_string())));

    let mut written = [false; 9];
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(current.pairs.len() + updates.len());

    for (key, value) in current.pairs {
        match updates.iter().position(|(name, _)| *name == decode(&key)) {
            // Replace the first occurrence in place, drop any repeats
            Some(idx) if !written[idx] => {
                written[idx] = true;
                if let Some(v) = &updates[idx].1 {
                    pairs.push((updates[idx].0.to_owned(), v.clone()));
                }
            }
            Some(_) => {}
            None => pairs.push((key, value)),
        }
    }
    for (idx, (name, value)) in updates.iter().enumerate() {
        if !written[idx]
            && let Some(v) = value
        {
            pairs.push(((*name).to_owned(), v.clone()));
        }
    }

    let path = if current.path.is_empty() {
        DEFAULT_BASE_PATH
    } else {
        current.path.as_str()
    };

    let mut url = String::from(path);
    if !pairs.is_empty() {
        url.push('?');
        let query: Vec<String> = pairs.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
        url.push_str(&query.join("&"));
    }
    if let Some(key) = state.expanded_post_key.as_deref().and_then(non_empty) {
        url.push('#');
        url.push_str(&urlencoding::encode(key));
    }
    url
}

/// Split a comma list into a trimmed set, discarding empty entries.
fn split_list(raw: &str) -> Selection {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn join_list(selection: &Selection) -> Option<String> {
    if selection.is_empty() {
        return None;
    }
    let items: Vec<String> = selection.iter().map(|s| encode_value(s)).collect();
    Some(items.join(","))
}

/// Numeric page parameter. Exponent forms and oversized integers are read
/// as large numbers (saturating) and left for [`clamp_page`] to bound;
/// non-numbers, fractions, non-finite values and pages below 1 become 1.
///
/// [`clamp_page`]: super::page::clamp_page
fn parse_page(raw: &str) -> usize {
    match raw.trim().parse::<f64>() {
        Ok(page) if page.is_finite() && page >= 1.0 && page.fract() == 0.0 => page as usize,
        _ => 1,
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn encode_value(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Form-style decoding: `+` is a space, invalid escapes are kept verbatim.
fn decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['+', '%']) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Owned(spaced),
    }
}

/// Fragments are percent-encoded only; `+` stays literal.
fn decode_fragment(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') {
        return Cow::Borrowed(raw);
    }
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
