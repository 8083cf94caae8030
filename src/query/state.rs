//! User-controlled view parameters for the blog listing.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

/// One independently filterable attribute of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Tags,
    Authors,
    Values,
    Vendors,
    Technologies,
    Other,
}

impl Facet {
    /// All facets, in URL parameter order.
    pub const ALL: [Self; 6] = [
        Self::Tags,
        Self::Authors,
        Self::Values,
        Self::Vendors,
        Self::Technologies,
        Self::Other,
    ];

    /// Query-string parameter carrying this facet's selection.
    pub const fn param(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Authors => "authors",
            Self::Values => "values",
            Self::Vendors => "vendors",
            Self::Technologies => "tech",
            Self::Other => "other",
        }
    }

    /// Field name used in post records and JSON output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Authors => "authors",
            Self::Values => "values",
            Self::Vendors => "vendors",
            Self::Technologies => "technologies",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Facet {
    type Err = String;

    /// Accepts both the field name and the URL parameter (`tech`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == lower || f.param() == lower)
            .ok_or_else(|| {
                format!("unknown facet `{s}` (expected tags, authors, values, vendors, tech or other)")
            })
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first
    #[default]
    DateDesc,
    /// Oldest first
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::DateDesc, Self::DateAsc, Self::TitleAsc, Self::TitleDesc];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
        }
    }

    /// Lenient parse: unknown values yield `None` instead of an error.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("unknown sort `{s}` (expected date-desc, date-asc, title-asc or title-desc)")
        })
    }
}

/// Selected values of one facet. Empty means "no constraint".
pub type Selection = BTreeSet<String>;

/// The complete, URL-reproducible state of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    /// Raw search input; normalized only when matching
    pub search_text: String,
    pub selected_tags: Selection,
    pub selected_authors: Selection,
    pub selected_values: Selection,
    pub selected_vendors: Selection,
    pub selected_technologies: Selection,
    pub selected_other: Selection,
    pub sort_key: SortKey,
    /// 1-based page number
    pub page_number: usize,
    /// Post opened in the detail view, mirrored in the URL fragment
    pub expanded_post_key: Option<String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            selected_tags: Selection::new(),
            selected_authors: Selection::new(),
            selected_values: Selection::new(),
            selected_vendors: Selection::new(),
            selected_technologies: Selection::new(),
            selected_other: Selection::new(),
            sort_key: SortKey::default(),
            page_number: 1,
            expanded_post_key: None,
        }
    }
}

impl QueryState {
    pub fn selected(&self, facet: Facet) -> &Selection {
        match facet {
            Facet::Tags => &self.selected_tags,
            Facet::Authors => &self.selected_authors,
            Facet::Values => &self.selected_values,
            Facet::Vendors => &self.selected_vendors,
            Facet::Technologies => &self.selected_technologies,
            Facet::Other => &self.selected_other,
        }
    }

    pub fn selected_mut(&mut self, facet: Facet) -> &mut Selection {
        match facet {
            Facet::Tags => &mut self.selected_tags,
            Facet::Authors => &mut self.selected_authors,
            Facet::Values => &mut self.selected_values,
            Facet::Vendors => &mut self.selected_vendors,
            Facet::Technologies => &mut self.selected_technologies,
            Facet::Other => &mut self.selected_other,
        }
    }

    /// Facets with a non-empty selection.
    pub fn active_facets(&self) -> impl Iterator<Item = (Facet, &Selection)> {
        Facet::ALL
            .into_iter()
            .map(|f| (f, self.selected(f)))
            .filter(|(_, sel)| !sel.is_empty())
    }

    /// True when search, facets and sort are all at their defaults.
    ///
    /// Page and expansion are navigation, not filtering, and are ignored.
    pub fn is_unfiltered(&self) -> bool {
        self.search_text.is_empty()
            && self.active_facets().next().is_none()
            && self.sort_key == SortKey::default()
    }

    /// Same filters, different page; the expanded post is kept.
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page_number: page.max(1),
            ..self.clone()
        }
    }
}
