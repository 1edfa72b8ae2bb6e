//! Article sources: search and full-article fetch.
//!
//! The controller is generic over [`ArticleSource`] so tests can drive it
//! with an in-memory mock while production wires up the MediaWiki-backed
//! [`WikipediaSource`] (optionally wrapped in a [`CachedSource`]).

mod cache;
mod wiki;

pub use cache::{ArticleCache, CachedSource};
pub use wiki::WikipediaSource;

use crate::article::{FetchedArticle, SearchHit};
use crate::error::Result;

/// Supplier of search results and full article content.
///
/// `fetch_article` must return hierarchy sections before related-topic
/// sections, with ids unique within the returned payload.
#[allow(async_fn_in_trait)]
pub trait ArticleSource {
    /// Search for articles matching a non-empty query. An empty result list
    /// is a valid response; failures surface as
    /// [`KnowmapError::Network`](crate::KnowmapError::Network).
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Fetch one article with its ordered section outline. `id` is the
    /// opaque reference a [`SearchHit`] or topic node carries.
    async fn fetch_article(&self, id: &str) -> Result<FetchedArticle>;
}
