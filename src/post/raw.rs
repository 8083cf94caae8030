//! Normalization of loosely-shaped index entries into [`Post`] records.
//!
//! Index files are produced by different tools (note-taking exports, CMS
//! dumps, hand-written JSON), so field names vary:
//!
//! | Post field     | Raw fields, first non-empty wins              |
//! |----------------|-----------------------------------------------|
//! | `key`          | `slug`, `file`, else `post-<index>`           |
//! | `title`        | `title`, `aliases`, `slug`, else `post-<index>` |
//! | `date`         | `posted_date`, `created_date`, `date`         |
//! | `excerpt`      | `summary`                                     |
//! | `content_md`   | `body`                                        |
//! | `author`       | `author` (string, or first of a list)         |
//! | `other`        | `other`, `others`                             |

use super::Post;
use serde_json::Value;
use std::collections::HashSet;

/// Extract the entry list from any supported index document shape.
///
/// - `[...]` → the array
/// - `{ "posts": [...] }` or `{ "entries": [...] }` → the nested array
/// - any other object → a single entry
/// - anything else → nothing
pub fn entries_from_document(doc: Value) -> Vec<Value> {
    match doc {
        Value::Array(entries) => entries,
        Value::Object(mut map) => {
            for field in ["posts", "entries"] {
                if matches!(map.get(field), Some(Value::Array(_)))
                    && let Some(Value::Array(entries)) = map.remove(field)
                {
                    return entries;
                }
            }
            vec![Value::Object(map)]
        }
        _ => Vec::new(),
    }
}

/// Whether a loaded entry list is usable as a post collection.
///
/// Only the first entry is inspected: it must carry a title, slug or body.
pub fn looks_like_posts(entries: &[Value]) -> bool {
    entries
        .first()
        .is_some_and(|first| ["title", "slug", "body"].iter().any(|f| text(first.get(*f)).is_some()))
}

/// Normalize raw entries into posts with unique keys.
///
/// Keys that collide after normalization get `-2`, `-3`, ... suffixes in
/// collection order.
pub fn posts_from_entries(entries: &[Value]) -> Vec<Post> {
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut post = post_from_entry(index, entry);
            if !seen.insert(post.key.clone()) {
                let base = post.key.clone();
                let mut n = 2;
                while !seen.insert(format!("{base}-{n}")) {
                    n += 1;
                }
                post.key = format!("{base}-{n}");
            }
            post
        })
        .collect()
}

fn post_from_entry(index: usize, entry: &Value) -> Post {
    let field = |name: &str| text(entry.get(name));
    let fallback = || format!("post-{index}");

    let key = field("slug").or_else(|| field("file")).unwrap_or_else(fallback);
    let title = field("title")
        .or_else(|| field("aliases"))
        .or_else(|| field("slug"))
        .unwrap_or_else(fallback);
    let date = field("posted_date")
        .or_else(|| field("created_date"))
        .or_else(|| field("date"));

    let other = match entry.get("other") {
        Some(Value::Array(_)) => list(entry.get("other")),
        _ => list(entry.get("others")),
    };

    Post {
        key,
        title,
        date,
        excerpt: field("summary").unwrap_or_default(),
        content_md: field("body").unwrap_or_default(),
        author: field("author").unwrap_or_default(),
        tags: list(entry.get("tags")),
        values: list(entry.get("values")),
        vendors: list(entry.get("vendors")),
        technologies: list(entry.get("technologies")),
        other,
    }
}

/// A non-empty string, or the first non-empty string of an array.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| text(Some(v))),
        _ => None,
    }
}

/// String members of an array, deduplicated in order. Non-arrays yield nothing.
fn list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if let Value::String(s) = item {
            let s = s.trim();
            if !s.is_empty() && !out.iter().any(|o| o == s) {
                out.push(s.to_owned());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_from_document_shapes() {
        assert_eq!(entries_from_document(json!([{"slug": "a"}])).len(), 1);
        assert_eq!(entries_from_document(json!({"posts": [{}, {}]})).len(), 2);
        assert_eq!(entries_from_document(json!({"entries": [{}]})).len(), 1);
        assert_eq!(entries_from_document(json!({"slug": "solo"})).len(), 1);
        assert!(entries_from_document(json!("nope")).is_empty());
        assert!(entries_from_document(json!(null)).is_empty());
    }

    #[test]
    fn test_entries_from_document_non_array_posts_is_single_entry() {
        let entries = entries_from_document(json!({"posts": "not a list", "slug": "x"}));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["slug"], "x");
    }

    #[test]
    fn test_looks_like_posts() {
        assert!(looks_like_posts(&[json!({"title": "Hello"})]));
        assert!(looks_like_posts(&[json!({"body": "text"})]));
        assert!(!looks_like_posts(&[json!({"name": "Hello"})]));
        assert!(!looks_like_posts(&[json!({"title": ""})]));
        assert!(!looks_like_posts(&[]));
    }

    #[test]
    fn test_post_from_entry_full() {
        let entry = json!({
            "slug": "zero-trust",
            "title": "Zero Trust",
            "posted_date": "2025-02-01",
            "created_date": "2025-01-01",
            "summary": "Why it matters",
            "body": "# Heading",
            "author": ["Jane Doe", "Bob"],
            "tags": ["Security", "Security", " Web "],
            "values": "not-a-list",
            "technologies": ["Rust", 42, null],
            "others": ["Misc"]
        });
        let post = post_from_entry(0, &entry);
        assert_eq!(post.key, "zero-trust");
        assert_eq!(post.title, "Zero Trust");
        assert_eq!(post.date.as_deref(), Some("2025-02-01"));
        assert_eq!(post.excerpt, "Why it matters");
        assert_eq!(post.content_md, "# Heading");
        assert_eq!(post.author, "Jane Doe");
        assert_eq!(post.tags, vec!["Security", "Web"]);
        assert!(post.values.is_empty());
        assert_eq!(post.technologies, vec!["Rust"]);
        assert_eq!(post.other, vec!["Misc"]);
    }

    #[test]
    fn test_post_from_entry_fallbacks() {
        let post = post_from_entry(3, &json!({}));
        assert_eq!(post.key, "post-3");
        assert_eq!(post.title, "post-3");
        assert!(post.date.is_none());
        assert_eq!(post.author, "");

        let post = post_from_entry(0, &json!({"file": "notes.md", "aliases": ["Notes"]}));
        assert_eq!(post.key, "notes.md");
        assert_eq!(post.title, "Notes");

        let post = post_from_entry(0, &json!({"slug": "only-slug", "date": "2024-05-05"}));
        assert_eq!(post.title, "only-slug");
        assert_eq!(post.date.as_deref(), Some("2024-05-05"));
    }

    #[test]
    fn test_other_prefers_other_over_others() {
        let post = post_from_entry(0, &json!({"other": ["A"], "others": ["B"]}));
        assert_eq!(post.other, vec!["A"]);
    }

    #[test]
    fn test_posts_from_entries_unique_keys() {
        let entries = vec![
            json!({"slug": "dup"}),
            json!({"slug": "dup"}),
            json!({"slug": "dup-2"}),
            json!({"slug": "dup"}),
        ];
        let keys: Vec<String> = posts_from_entries(&entries).into_iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["dup", "dup-2", "dup-2-2", "dup-3"]);
    }
}
