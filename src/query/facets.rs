//! Facet vocabularies for filter widgets.

use super::state::Facet;
use crate::{post::Post, utils::text::collate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Every distinct value of `facet` across the whole collection, sorted.
///
/// Computed from the unfiltered collection, so options never disappear
/// while other filters are active.
pub fn facet_vocabulary(posts: &[Post], facet: Facet) -> Vec<String> {
    let distinct: BTreeSet<&str> = posts
        .iter()
        .flat_map(|p| p.facet_values(facet))
        .map(String::as_str)
        .collect();

    let mut values: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
    values.sort_by(|a, b| collate(a, b));
    values
}

/// Vocabularies of all six facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub values: Vec<String>,
    pub vendors: Vec<String>,
    pub technologies: Vec<String>,
    pub other: Vec<String>,
}

impl Vocabulary {
    pub fn collect(posts: &[Post]) -> Self {
        Self {
            tags: facet_vocabulary(posts, Facet::Tags),
            authors: facet_vocabulary(posts, Facet::Authors),
            values: facet_vocabulary(posts, Facet::Values),
            vendors: facet_vocabulary(posts, Facet::Vendors),
            technologies: facet_vocabulary(posts, Facet::Technologies),
            other: facet_vocabulary(posts, Facet::Other),
        }
    }

    pub fn get(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Tags => &self.tags,
            Facet::Authors => &self.authors,
            Facet::Values => &self.values,
            Facet::Vendors => &self.vendors,
            Facet::Technologies => &self.technologies,
            Facet::Other => &self.other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts() -> Vec<Post> {
        vec![
            Post {
                key: "a".into(),
                author: "Jane".into(),
                tags: vec!["web".into(), "Security".into()],
                ..Post::default()
            },
            Post {
                key: "b".into(),
                tags: vec!["Security".into(), "Éthique".into()],
                vendors: vec!["Acme".into()],
                ..Post::default()
            },
        ]
    }

    #[test]
    fn test_vocabulary_sorted_and_distinct() {
        let posts = posts();
        assert_eq!(
            facet_vocabulary(&posts, Facet::Tags),
            ["Éthique", "Security", "web"]
        );
        assert_eq!(facet_vocabulary(&posts, Facet::Vendors), ["Acme"]);
        assert!(facet_vocabulary(&posts, Facet::Other).is_empty());
    }

    #[test]
    fn test_author_vocabulary_skips_unattributed() {
        assert_eq!(facet_vocabulary(&posts(), Facet::Authors), ["Jane"]);
    }

    #[test]
    fn test_vocabulary_collect_matches_single_facets() {
        let posts = posts();
        let vocab = Vocabulary::collect(&posts);
        for facet in Facet::ALL {
            assert_eq!(vocab.get(facet), facet_vocabulary(&posts, facet).as_slice());
        }
    }
}
