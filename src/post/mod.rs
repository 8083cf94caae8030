//! Blog post records and their ingestion from index files.
//!
//! ```text
//! index.json ──► entries_from_document() ──► posts_from_entries() ──► Vec<Post>
//!  (any shape)        (Vec<Value>)              (normalized)
//! ```

mod author;
mod raw;

pub use author::{Byline, Roster};
pub use raw::{entries_from_document, looks_like_posts, posts_from_entries};

use crate::query::Facet;
use serde::{Deserialize, Serialize};

/// One content entry.
///
/// Every collection field is always present (possibly empty) so that
/// filtering never has to special-case missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Unique slug, also used as the URL fragment
    pub key: String,
    pub title: String,
    /// ISO-8601 date, if the entry had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub excerpt: String,
    /// Markdown body
    pub content_md: String,
    /// Display name, empty when unattributed
    pub author: String,
    pub tags: Vec<String>,
    pub values: Vec<String>,
    pub vendors: Vec<String>,
    pub technologies: Vec<String>,
    pub other: Vec<String>,
}

impl Post {
    /// Values of `facet` carried by this post.
    ///
    /// The authors facet yields the explicit author only, never the
    /// fallback author.
    pub fn facet_values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Authors if self.author.is_empty() => &[],
            Facet::Authors => std::slice::from_ref(&self.author),
            Facet::Tags => &self.tags,
            Facet::Values => &self.values,
            Facet::Vendors => &self.vendors,
            Facet::Technologies => &self.technologies,
            Facet::Other => &self.other,
        }
    }

    /// Whether the post names an author.
    pub fn is_attributed(&self) -> bool {
        !self.author.is_empty()
    }
}
