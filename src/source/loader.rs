//! Source fallback chain with a time-bounded in-memory cache.

use super::{Bundled, ContentSource, IndexFile, SourceError};
use crate::{
    config::PostqConfig,
    log,
    post::{Post, looks_like_posts, posts_from_entries},
};
use parking_lot::RwLock;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Origin reported when no source produced a usable collection
pub const EMPTY_ORIGIN: &str = "empty";

/// A loaded post collection.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub posts: Arc<Vec<Post>>,
    /// Source that produced the collection (`file:<path>`, `bundled`, `empty`)
    pub origin: String,
    /// True when served from the cache without touching any source
    pub cached: bool,
}

#[derive(Debug)]
struct CacheEntry {
    posts: Arc<Vec<Post>>,
    origin: String,
    stored_at: Instant,
}

/// Loads posts from an ordered list of sources.
///
/// The first source whose entries look like posts wins. Failures are logged
/// and the next source is tried; when all fail the collection is empty.
/// The outcome, whatever it is, is cached for `ttl`.
pub struct IndexLoader {
    sources: Vec<Box<dyn ContentSource>>,
    ttl: Duration,
    cache: RwLock<Option<CacheEntry>>,
}

impl IndexLoader {
    pub fn new(sources: Vec<Box<dyn ContentSource>>, ttl: Duration) -> Self {
        Self {
            sources,
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Index file from `[source.index]`, then the bundled collection if enabled.
    pub fn from_config(config: &PostqConfig) -> Self {
        let mut sources: Vec<Box<dyn ContentSource>> = Vec::new();
        if let Some(path) = config.index_path() {
            sources.push(Box::new(IndexFile::new(path)));
        }
        if config.source.bundled_fallback {
            sources.push(Box::new(Bundled));
        }
        Self::new(sources, config.source.cache_ttl())
    }

    /// Current collection. `force` bypasses the cache.
    pub fn load(&self, force: bool) -> Loaded {
        if !force && let Some(hit) = self.cached() {
            return hit;
        }

        let (posts, origin) = self.load_fresh();
        let posts = Arc::new(posts);
        *self.cache.write() = Some(CacheEntry {
            posts: Arc::clone(&posts),
            origin: origin.clone(),
            stored_at: Instant::now(),
        });

        Loaded {
            posts,
            origin,
            cached: false,
        }
    }

    /// Drop the cached collection so the next load reads the sources.
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    fn cached(&self) -> Option<Loaded> {
        let cache = self.cache.read();
        let entry = cache.as_ref()?;
        (entry.stored_at.elapsed() < self.ttl).then(|| Loaded {
            posts: Arc::clone(&entry.posts),
            origin: entry.origin.clone(),
            cached: true,
        })
    }

    fn load_fresh(&self) -> (Vec<Post>, String) {
        for source in &self.sources {
            let origin = source.origin();
            let entries = source.load().and_then(|entries| {
                if looks_like_posts(&entries) {
                    Ok(entries)
                } else {
                    Err(SourceError::Shape(origin.clone()))
                }
            });

            match entries {
                Ok(entries) => {
                    let posts = posts_from_entries(&entries);
                    log!("load"; "{} posts from {}", posts.len(), origin);
                    return (posts, origin);
                }
                Err(err) => log!("error"; "{err}, trying next source"),
            }
        }

        log!("error"; "no usable posts index, serving an empty collection");
        (Vec::new(), EMPTY_ORIGIN.into())
    }
}
