//! `[blog]` section and `[[authors]]` roster configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[blog]` section in postq.toml - listing behavior.
///
/// # Example
/// ```toml
/// [blog]
/// base_path = "/blog"
/// page_size = 4
/// default_author = "Jane Doe"
/// compact = false
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BlogConfig {
    /// Path of the listing page. Articles live under `<base_path>/article/`.
    #[serde(default = "defaults::blog::base_path")]
    #[educe(Default = defaults::blog::base_path())]
    pub base_path: String,

    /// Posts per page.
    #[serde(default = "defaults::blog::page_size")]
    #[educe(Default = defaults::blog::page_size())]
    pub page_size: usize,

    /// Shown (and searched) for posts without an author.
    /// Falls back to the first `[[authors]]` entry when unset.
    #[serde(default)]
    pub default_author: Option<String>,

    /// Initial value of the `view.compact` flag: open posts on their own
    /// article page instead of expanding them in the listing.
    #[serde(default)]
    pub compact: bool,
}

/// One `[[authors]]` roster entry.
///
/// ```toml
/// [[authors]]
/// name = "Jane Doe"
/// role = "Founder"
/// avatar = "/team/jane.png"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorConfig {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::super::PostqConfig;

    #[test]
    fn test_blog_config_defaults() {
        let config: PostqConfig = toml::from_str("").unwrap();
        assert_eq!(config.blog.base_path, "/blog");
        assert_eq!(config.blog.page_size, 4);
        assert!(config.blog.default_author.is_none());
        assert!(!config.blog.compact);
    }

    #[test]
    fn test_blog_config() {
        let config: PostqConfig = toml::from_str(
            r#"
            [blog]
            base_path = "/news"
            page_size = 10
            default_author = "Jane Doe"
            compact = true
        "#,
        )
        .unwrap();

        assert_eq!(config.blog.base_path, "/news");
        assert_eq!(config.blog.page_size, 10);
        assert_eq!(config.blog.default_author.as_deref(), Some("Jane Doe"));
        assert!(config.blog.compact);
    }

    #[test]
    fn test_authors_roster() {
        let config: PostqConfig = toml::from_str(
            r#"
            [[authors]]
            name = "Jane Doe"
            role = "Founder"
            avatar = "/team/jane.png"

            [[authors]]
            name = "Sam Lee"
        "#,
        )
        .unwrap();

        assert_eq!(config.authors.len(), 2);
        assert_eq!(config.authors[0].role.as_deref(), Some("Founder"));
        assert!(config.authors[1].avatar.is_none());
    }

    #[test]
    fn test_author_requires_name() {
        let result: Result<PostqConfig, _> = toml::from_str("[[authors]]\nrole = \"Editor\"");
        assert!(result.is_err());
    }
}
