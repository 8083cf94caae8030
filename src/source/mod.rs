//! Where post collections come from.
//!
//! A [`ContentSource`] yields raw index entries; [`IndexLoader`] tries its
//! sources in order, normalizes the first usable result into posts and
//! caches it for a configurable time.

mod loader;

pub use loader::{EMPTY_ORIGIN, IndexLoader, Loaded};

use crate::post::entries_from_document;
use serde_json::Value;
use std::{fs, path::PathBuf};
use thiserror::Error;

/// Posts index compiled into the binary, used when nothing else loads.
const BUNDLED_INDEX: &str = include_str!("../../assets/blogs.json");

/// Errors raised while reading a posts index.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not valid JSON")]
    Json(String, #[source] serde_json::Error),

    #[error("{0} does not look like a posts index")]
    Shape(String),
}

/// A provider of raw posts-index entries.
pub trait ContentSource: Send + Sync {
    /// Read the raw entries.
    fn load(&self) -> Result<Vec<Value>, SourceError>;

    /// Human-readable description, e.g. `file:content/blogs.json`.
    fn origin(&self) -> String;
}

/// A JSON posts index on disk.
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for IndexFile {
    fn load(&self) -> Result<Vec<Value>, SourceError> {
        let content =
            fs::read_to_string(&self.path).map_err(|err| SourceError::Io(self.path.clone(), err))?;
        parse_index(&content, &self.origin())
    }

    fn origin(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// The collection shipped inside the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bundled;

impl ContentSource for Bundled {
    fn load(&self) -> Result<Vec<Value>, SourceError> {
        parse_index(BUNDLED_INDEX, &self.origin())
    }

    fn origin(&self) -> String {
        "bundled".into()
    }
}

/// Parse an index document of any supported shape into raw entries.
pub fn parse_index(content: &str, origin: &str) -> Result<Vec<Value>, SourceError> {
    let doc: Value =
        serde_json::from_str(content).map_err(|err| SourceError::Json(origin.to_owned(), err))?;
    Ok(entries_from_document(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::looks_like_posts;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_index_file_loads_entries() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"posts":[{{"slug":"a","title":"A"}},{{"slug":"b"}}]}}"#).unwrap();

        let source = IndexFile::new(file.path());
        let entries = source.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(source.origin().starts_with("file:"));
    }

    #[test]
    fn test_index_file_missing() {
        let source = IndexFile::new("/nonexistent/postq/blogs.json");
        assert!(matches!(source.load(), Err(SourceError::Io(..))));
    }

    #[test]
    fn test_index_file_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[{{").unwrap();
        let err = IndexFile::new(file.path()).load().unwrap_err();
        assert!(matches!(err, SourceError::Json(..)));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_bundled_collection_is_usable() {
        let entries = Bundled.load().unwrap();
        assert!(entries.len() > 4);
        assert!(looks_like_posts(&entries));
    }

    #[test]
    fn test_parse_index_single_object() {
        let entries = parse_index(r#"{"title":"Only"}"#, "test").unwrap();
        assert_eq!(entries.len(), 1);
    }
}
