//! Article data model: the payload an [`ArticleSource`](crate::source::ArticleSource)
//! delivers and the input the graph builder consumes.

use serde::{Deserialize, Serialize};

/// One encyclopedia entry: title plus lead summary. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
}

/// One outline entry of an article.
///
/// Ordering is significant: hierarchy sections come first in natural document
/// order, related-topic sections are appended after them. `id` uniqueness
/// within one fetch is a precondition supplied by the article source; the
/// graph builder does not deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique within one article fetch.
    pub id: String,
    pub title: String,
    /// Outline depth, 1-based. Related-topic entries are always level 1.
    pub level: u32,
    /// True for cross-reference entries discovered via article links.
    pub is_related_topic: bool,
    /// Opaque reference to the linked article; set only for related topics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

impl Section {
    /// Hierarchy section at the given outline depth.
    pub fn hierarchy(id: impl Into<String>, title: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            is_related_topic: false,
            related_id: None,
        }
    }

    /// Related-topic entry pointing at another article.
    pub fn related(
        id: impl Into<String>,
        title: impl Into<String>,
        related_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level: 1,
            is_related_topic: true,
            related_id: Some(related_id.into()),
        }
    }
}

/// One row of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub snippet: String,
}

/// Full article payload: the article itself plus its ordered outline,
/// hierarchy sections preceding related-topic sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedArticle {
    pub article: Article,
    pub sections: Vec<Section>,
}
