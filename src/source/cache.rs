use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::article::{FetchedArticle, SearchHit};
use crate::error::Result;
use crate::source::ArticleSource;

/// Thread-safe LRU cache for fetched articles
///
/// Recursive exploration keeps coming back to the same topics; caching the
/// fetches keeps node clicks snappy and spares the API. Uses LRU eviction to
/// maintain bounded memory usage.
pub struct ArticleCache {
    cache: Mutex<LruCache<String, FetchedArticle>>,
}

impl ArticleCache {
    /// Create a new article cache with the specified capacity
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0 (LRU cache requires non-zero capacity)
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).expect("Cache capacity must be at least 1");

        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Get a cached article by id
    pub fn get(&self, id: &str) -> Option<FetchedArticle> {
        self.cache.lock().unwrap().get(id).cloned()
    }

    /// Store a fetched article in the cache
    pub fn put(&self, id: String, article: FetchedArticle) {
        self.cache.lock().unwrap().put(id, article);
    }

    /// Get the current number of cached entries
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().unwrap().is_empty()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        self.cache.lock().unwrap().clear();
    }
}

/// An [`ArticleSource`] wrapper that caches `fetch_article` responses.
///
/// Searches always pass through: result rankings change and are cheap
/// relative to full article fetches.
pub struct CachedSource<S> {
    inner: S,
    cache: ArticleCache,
}

impl<S: ArticleSource> CachedSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            cache: ArticleCache::new(capacity),
        }
    }
}

impl<S: ArticleSource> ArticleSource for CachedSource<S> {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.inner.search(query).await
    }

    async fn fetch_article(&self, id: &str) -> Result<FetchedArticle> {
        if let Some(cached) = self.cache.get(id) {
            log::debug!("Article cache hit for '{}'", id);
            return Ok(cached);
        }

        let fetched = self.inner.fetch_article(id).await?;
        self.cache.put(id.to_string(), fetched.clone());
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{Article, Section};
    use crate::error::KnowmapError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fetched(title: &str) -> FetchedArticle {
        FetchedArticle {
            article: Article {
                title: title.to_string(),
                summary: String::new(),
            },
            sections: vec![Section::hierarchy("s1", "History", 1)],
        }
    }

    /// Counts fetches so tests can assert cache behaviour.
    struct CountingSource {
        fetches: AtomicUsize,
    }

    impl ArticleSource for CountingSource {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>> {
            Ok(vec![])
        }

        async fn fetch_article(&self, id: &str) -> Result<FetchedArticle> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if id == "missing" {
                return Err(KnowmapError::Network("no such page".to_string()));
            }
            Ok(fetched(id))
        }
    }

    #[test]
    fn test_cache_put_and_get() {
        let cache = ArticleCache::new(10);
        cache.put("9629".to_string(), fetched("Osmosis"));

        let retrieved = cache.get("9629");
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().article.title, "Osmosis");
    }

    #[test]
    fn test_cache_miss() {
        let cache = ArticleCache::new(10);
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = ArticleCache::new(2);

        cache.put("a".to_string(), fetched("A"));
        cache.put("b".to_string(), fetched("B"));
        cache.put("c".to_string(), fetched("C"));

        assert!(cache.get("a").is_none()); // Evicted
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_cache_clear() {
        let cache = ArticleCache::new(10);
        cache.put("a".to_string(), fetched("A"));
        assert!(!cache.is_empty());

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.get("a").is_none());
    }

    #[tokio::test]
    async fn test_cached_source_fetches_once() {
        let source = CachedSource::new(
            CountingSource {
                fetches: AtomicUsize::new(0),
            },
            10,
        );

        let first = source.fetch_article("Osmosis").await.unwrap();
        let second = source.fetch_article("Osmosis").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.inner.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_source_does_not_cache_failures() {
        let source = CachedSource::new(
            CountingSource {
                fetches: AtomicUsize::new(0),
            },
            10,
        );

        assert!(source.fetch_article("missing").await.is_err());
        assert!(source.fetch_article("missing").await.is_err());
        assert_eq!(source.inner.fetches.load(Ordering::SeqCst), 2);
    }
}
