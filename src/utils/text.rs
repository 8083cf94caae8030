//! Text normalization for search and ordering.

use deunicode::deunicode;
use regex::Regex;
use std::{cmp::Ordering, sync::LazyLock};

static RE_FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());

/// Markup characters replaced by spaces when flattening markdown
const MARKUP_CHARS: &[char] = &['*', '_', '~', '>', '#', '-'];

/// Lowercase and trim, the common form for substring search.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Flatten markdown into searchable plain text.
///
/// Fenced code blocks are dropped, inline code and link labels keep their
/// text, emphasis/heading/quote markers become spaces and whitespace runs
/// collapse to one space.
pub fn md_to_plain(md: &str) -> String {
    let text = RE_FENCED_CODE.replace_all(md, " ");
    let text = RE_INLINE_CODE.replace_all(&text, "$1");
    let text = RE_LINK.replace_all(&text, "$1");
    let text = text.replace(MARKUP_CHARS, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Locale-aware-ish string comparison for titles.
///
/// Letters compare by their transliterated, case-folded form first so that
/// `"Écoles"` sorts next to `"ecoles"` rather than after `"zebra"`. Ties fall
/// back to the raw strings to keep the order total.
pub fn collate(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| deunicode(s).to_lowercase();
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}
