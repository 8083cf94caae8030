//! Author roster lookup.

use super::Post;
use crate::config::AuthorConfig;
use serde::Serialize;
use std::collections::HashMap;

/// Known team members plus the fallback author for unattributed posts.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<AuthorConfig>,
    by_name: HashMap<String, usize>,
    default_author: Option<String>,
}

/// Resolved author information for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Byline {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// False when the name comes from the fallback author
    pub attributed: bool,
}

impl Roster {
    /// Build a roster. Without an explicit default, the first member is used.
    pub fn new(members: Vec<AuthorConfig>, default_author: Option<String>) -> Self {
        let by_name = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        let default_author = default_author
            .filter(|name| !name.trim().is_empty())
            .or_else(|| members.first().map(|m| m.name.clone()));

        Self {
            members,
            by_name,
            default_author,
        }
    }

    /// Name substituted for posts without an author, if any.
    pub fn default_author(&self) -> Option<&str> {
        self.default_author.as_deref()
    }

    pub fn member(&self, name: &str) -> Option<&AuthorConfig> {
        self.by_name.get(name).map(|&i| &self.members[i])
    }

    /// Display author for a post, or `None` when the post is unattributed
    /// and no fallback exists.
    pub fn byline(&self, post: &Post) -> Option<Byline> {
        let (name, attributed) = if post.is_attributed() {
            (post.author.as_str(), true)
        } else {
            (self.default_author()?, false)
        };

        let member = self.member(name);
        Some(Byline {
            name: name.to_owned(),
            role: member.and_then(|m| m.role.clone()),
            avatar: member.and_then(|m| m.avatar.clone()),
            attributed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, role: &str) -> AuthorConfig {
        AuthorConfig {
            name: name.into(),
            role: Some(role.into()),
            avatar: Some(format!("/team/{}.png", name.to_lowercase())),
        }
    }

    #[test]
    fn test_default_author_is_first_member() {
        let roster = Roster::new(vec![member("Jane", "Founder"), member("Bob", "Engineer")], None);
        assert_eq!(roster.default_author(), Some("Jane"));
    }

    #[test]
    fn test_explicit_default_author_wins() {
        let roster = Roster::new(vec![member("Jane", "Founder")], Some("Editorial Team".into()));
        assert_eq!(roster.default_author(), Some("Editorial Team"));

        let roster = Roster::new(vec![member("Jane", "Founder")], Some("  ".into()));
        assert_eq!(roster.default_author(), Some("Jane"));
    }

    #[test]
    fn test_byline_known_member() {
        let roster = Roster::new(vec![member("Jane", "Founder")], None);
        let post = Post {
            author: "Jane".into(),
            ..Post::default()
        };
        let byline = roster.byline(&post).unwrap();
        assert_eq!(byline.role.as_deref(), Some("Founder"));
        assert_eq!(byline.avatar.as_deref(), Some("/team/jane.png"));
        assert!(byline.attributed);
    }

    #[test]
    fn test_byline_unknown_and_unattributed() {
        let roster = Roster::new(vec![member("Jane", "Founder")], None);

        let guest = Post {
            author: "Guest Writer".into(),
            ..Post::default()
        };
        let byline = roster.byline(&guest).unwrap();
        assert_eq!(byline.name, "Guest Writer");
        assert!(byline.role.is_none());

        let byline = roster.byline(&Post::default()).unwrap();
        assert_eq!(byline.name, "Jane");
        assert!(!byline.attributed);

        assert!(Roster::default().byline(&Post::default()).is_none());
    }
}
