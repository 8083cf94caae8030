//! Configuration management for `postq.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                         |
//! |---------------|-------------------------------------------------|
//! | `[blog]`      | Listing path, page size, fallback author        |
//! | `[source]`    | Posts index location, cache TTL, fallback       |
//! | `[serve]`     | JSON server interface and port                  |
//! | `[[authors]]` | Team roster used for bylines                    |
//!
//! # Example
//!
//! ```toml
//! [blog]
//! page_size = 6
//!
//! [source]
//! index = "content/blogs.json"
//!
//! [[authors]]
//! name = "Jane Doe"
//! role = "Founder"
//! ```
//!
//! Every section is optional; a missing config file yields the defaults.

mod blog;
pub mod defaults;
mod error;
mod serve;
mod source;

pub use blog::{AuthorConfig, BlogConfig};
pub use error::ConfigError;
pub use serve::ServeConfig;
pub use source::SourceConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing postq.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PostqConfig {
    /// Project root; relative paths resolve against it (set after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub blog: BlogConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub authors: Vec<AuthorConfig>,
}

impl PostqConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: PostqConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Resolve, read and validate the configuration named by the CLI.
    ///
    /// A missing config file is not an error: all sections have defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.root = normalize_path(&root);
        config.config_path = normalize_path(&config_path);
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(index) = &cli.index {
            self.source.index = Some(index.clone());
        }

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
        if let Commands::Query { page_size, .. } = &cli.command {
            Self::update_option(&mut self.blog.page_size, page_size.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Absolute location of the posts index, with `~` expanded.
    pub fn index_path(&self) -> Option<PathBuf> {
        let index = self.source.index.as_ref()?;
        let expanded = PathBuf::from(shellexpand::tilde(&index.to_string_lossy()).into_owned());
        Some(if expanded.is_relative() {
            normalize_path(&self.root.join(expanded))
        } else {
            expanded
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.blog.page_size == 0 {
            bail!(ConfigError::Validation(
                "[blog.page_size] must be at least 1".into()
            ));
        }

        if !self.blog.base_path.starts_with('/') {
            bail!(ConfigError::Validation(
                "[blog.base_path] must start with `/`".into()
            ));
        }

        let mut seen = HashSet::new();
        for author in &self.authors {
            let name = author.name.trim();
            if name.is_empty() {
                bail!(ConfigError::Validation(
                    "[[authors]] entries need a non-empty name".into()
                ));
            }
            if !seen.insert(name) {
                bail!(ConfigError::Validation(format!(
                    "[[authors]] lists `{name}` more than once"
                )));
            }
        }

        if !self.source.bundled_fallback && self.source.index.is_none() {
            bail!(ConfigError::Validation(
                "[source.index] is required when [source.bundled_fallback] = false".into()
            ));
        }

        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("postq").chain(args.iter().copied()))
    }

    #[test]
    fn test_from_str() {
        let config = PostqConfig::from_str(
            r#"
            [blog]
            page_size = 6
            [[authors]]
            name = "Jane Doe"
        "#,
        )
        .unwrap();

        assert_eq!(config.blog.page_size, 6);
        assert_eq!(config.authors[0].name, "Jane Doe");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let err = PostqConfig::from_str("[blog\npage_size = 4").unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        assert!(PostqConfig::from_str("[build]\nminify = true").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PostqConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.serve.port, 5278);
        assert_eq!(config.source.cache_ttl_secs, 300);
    }

    #[test]
    fn test_validate_page_size() {
        let config = PostqConfig::from_str("[blog]\npage_size = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_validate_base_path() {
        let config = PostqConfig::from_str("[blog]\nbase_path = \"blog\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_authors() {
        let config = PostqConfig::from_str(
            r#"
            [[authors]]
            name = "Jane"
            [[authors]]
            name = " Jane "
        "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Jane"));
    }

    #[test]
    fn test_validate_blank_author() {
        let config = PostqConfig::from_str("[[authors]]\nname = \"  \"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_some_source() {
        let config = PostqConfig::from_str("[source]\nbundled_fallback = false").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_update_with_cli_serve() {
        let mut config = PostqConfig::default();
        config.update_with_cli(&cli(&["serve", "--port", "9000"]));
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.serve.interface, "127.0.0.1");
    }

    #[test]
    fn test_update_with_cli_index_and_page_size() {
        let mut config = PostqConfig::default();
        config.update_with_cli(&cli(&["-i", "posts.json", "query", "--page-size", "2"]));
        assert_eq!(config.source.index, Some(PathBuf::from("posts.json")));
        assert_eq!(config.blog.page_size, 2);
    }

    #[test]
    fn test_index_path_resolves_against_root() {
        let mut config = PostqConfig::from_str("[source]\nindex = \"content/blogs.json\"").unwrap();
        config.root = PathBuf::from("/srv/site");
        assert_eq!(
            config.index_path(),
            Some(PathBuf::from("/srv/site/content/blogs.json"))
        );
        assert!(PostqConfig::default().index_path().is_none());
    }

    #[test]
    fn test_load_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        let config = PostqConfig::load(&cli(&["--root", &root, "facets"])).unwrap();
        assert_eq!(config.blog.page_size, 4);
        assert!(config.config_path.ends_with("postq.toml"));
    }

    #[test]
    fn test_load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("postq.toml"), "[blog]\npage_size = 3\n").unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        let config = PostqConfig::load(&cli(&["--root", &root, "facets"])).unwrap();
        assert_eq!(config.blog.page_size, 3);
    }
}
