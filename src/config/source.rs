//! `[source]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// `[source]` section in postq.toml - where posts come from.
///
/// # Example
/// ```toml
/// [source]
/// index = "content/blogs.json"
/// cache_ttl_secs = 300
/// bundled_fallback = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// JSON posts index, relative to the project root. `~` is expanded.
    #[serde(default)]
    pub index: Option<PathBuf>,

    /// How long a loaded collection is reused before reading it again.
    #[serde(default = "defaults::source::cache_ttl_secs")]
    #[educe(Default = defaults::source::cache_ttl_secs())]
    pub cache_ttl_secs: u64,

    /// Use the collection compiled into the binary when the index fails.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub bundled_fallback: bool,
}

impl SourceConfig {
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::super::PostqConfig;
    use std::{path::PathBuf, time::Duration};

    #[test]
    fn test_source_config_defaults() {
        let config: PostqConfig = toml::from_str("").unwrap();
        assert!(config.source.index.is_none());
        assert_eq!(config.source.cache_ttl(), Duration::from_secs(300));
        assert!(config.source.bundled_fallback);
    }

    #[test]
    fn test_source_config() {
        let config: PostqConfig = toml::from_str(
            r#"
            [source]
            index = "content/blogs.json"
            cache_ttl_secs = 0
            bundled_fallback = false
        "#,
        )
        .unwrap();

        assert_eq!(config.source.index, Some(PathBuf::from("content/blogs.json")));
        assert_eq!(config.source.cache_ttl_secs, 0);
        assert!(!config.source.bundled_fallback);
    }
}
