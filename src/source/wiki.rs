//! MediaWiki Action API article source.
//!
//! Search uses `list=search`; a fetch combines `action=parse&prop=sections`
//! for the outline with `prop=extracts|links` for the lead summary and the
//! related-topic candidates. Outgoing mainspace links become related-topic
//! sections, appended after the hierarchy sections.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::article::{Article, FetchedArticle, SearchHit, Section};
use crate::config::SourceConfig;
use crate::error::{KnowmapError, Result};
use crate::graph::clean_label;
use crate::source::ArticleSource;

/// Boilerplate outline entries that never make useful roadmap nodes.
const SKIPPED_SECTIONS: &[&str] = &[
    "References",
    "External links",
    "Further reading",
    "Notes",
    "Bibliography",
    "See also",
    "Sources",
];

/// Response envelope for `list=search`.
#[derive(Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Deserialize)]
struct SearchQuery {
    search: Vec<SearchRow>,
}

#[derive(Deserialize)]
struct SearchRow {
    pageid: u64,
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Response envelope for `action=parse&prop=sections`.
#[derive(Deserialize)]
struct ParseResponse {
    parse: Option<ParsePayload>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ParsePayload {
    title: String,
    #[serde(default)]
    sections: Vec<OutlineRow>,
}

#[derive(Deserialize)]
struct OutlineRow {
    #[serde(default)]
    toclevel: u32,
    line: String,
    index: String,
}

/// Response envelope for `prop=extracts|links`.
#[derive(Deserialize)]
struct PagesResponse {
    query: Option<PagesQuery>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct PagesQuery {
    pages: HashMap<String, PageRow>,
}

#[derive(Deserialize)]
struct PageRow {
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    links: Vec<LinkRow>,
}

#[derive(Deserialize)]
struct LinkRow {
    ns: i32,
    title: String,
}

#[derive(Deserialize)]
struct ApiError {
    info: String,
}

/// Article source backed by a MediaWiki Action API endpoint.
///
/// Article ids are opaque to callers: search hits carry numeric page ids,
/// related-topic references carry article titles. Both resolve through
/// `fetch_article`.
pub struct WikipediaSource {
    client: Client,
    endpoint: String,
    related_limit: usize,
    max_retries: usize,
}

impl WikipediaSource {
    /// Create a source from configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// normal operation).
    pub fn new(config: &SourceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: config.api_endpoint.clone(),
            related_limit: config.related_limit,
            max_retries: config.max_retries,
        }
    }

    /// Issue one GET against the Action API with retry on 429/5xx,
    /// deserializing the JSON body into `T`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            let response = self
                .client
                .get(&self.endpoint)
                .query(params)
                .send()
                .await
                .map_err(|e| KnowmapError::Network(format!("Request failed: {}", e)))?;

            let status = response.status();
            if status.is_success() {
                let parsed = response
                    .json::<T>()
                    .await
                    .map_err(|e| KnowmapError::Parse(format!("Malformed API response: {}", e)))?;
                log::debug!(
                    "API call took {:?} (attempt {})",
                    start.elapsed(),
                    attempt + 1
                );
                return Ok(parsed);
            }

            let retryable = status.as_u16() == 429 || status.is_server_error();
            if retryable && attempt < self.max_retries {
                log::warn!(
                    "Retry {}/{} after API status {}",
                    attempt + 1,
                    self.max_retries,
                    status
                );
                tokio::time::sleep(delay).await;
                delay *= 2; // Exponential backoff
                attempt += 1;
                continue;
            }

            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(KnowmapError::Network(format!(
                "API error {}: {}",
                status, body
            )));
        }
    }

    async fn fetch_outline(&self, id: &str) -> Result<ParsePayload> {
        let (key, value) = page_param(id, "pageid", "page");
        let response: ParseResponse = self
            .get_json(&[
                ("action", "parse"),
                ("prop", "sections"),
                ("format", "json"),
                ("redirects", "1"),
                (key, value),
            ])
            .await?;

        if let Some(err) = response.error {
            return Err(KnowmapError::Network(format!("API error: {}", err.info)));
        }
        response
            .parse
            .ok_or_else(|| KnowmapError::Parse("Missing parse payload".to_string()))
    }

    async fn fetch_page(&self, id: &str) -> Result<PageRow> {
        let (key, value) = page_param(id, "pageids", "titles");
        let limit = self.related_limit.to_string();
        let response: PagesResponse = self
            .get_json(&[
                ("action", "query"),
                ("prop", "extracts|links"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("plnamespace", "0"),
                ("pllimit", limit.as_str()),
                ("format", "json"),
                ("redirects", "1"),
                (key, value),
            ])
            .await?;

        if let Some(err) = response.error {
            return Err(KnowmapError::Network(format!("API error: {}", err.info)));
        }
        response
            .query
            .and_then(|q| q.pages.into_values().next())
            .ok_or_else(|| KnowmapError::Parse("Missing page payload".to_string()))
    }
}

impl ArticleSource for WikipediaSource {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response: SearchResponse = self
            .get_json(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "10"),
                ("format", "json"),
            ])
            .await?;

        let rows = response.query.map(|q| q.search).unwrap_or_default();
        Ok(rows.into_iter().map(hit_from_row).collect())
    }

    async fn fetch_article(&self, id: &str) -> Result<FetchedArticle> {
        let outline = self.fetch_outline(id).await?;
        let page = self.fetch_page(id).await?;

        let article = Article {
            title: outline.title.clone(),
            summary: page.extract.unwrap_or_default(),
        };
        let sections = assemble_sections(outline.sections, page.links, self.related_limit);

        log::debug!(
            "Fetched '{}': {} sections",
            article.title,
            sections.len()
        );
        Ok(FetchedArticle { article, sections })
    }
}

/// Numeric ids address pages by page id, anything else by title.
fn page_param<'a>(id: &'a str, id_key: &'a str, title_key: &'a str) -> (&'a str, &'a str) {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        (id_key, id)
    } else {
        (title_key, id)
    }
}

fn hit_from_row(row: SearchRow) -> SearchHit {
    SearchHit {
        id: row.pageid.to_string(),
        title: row.title,
        // Search snippets come back with match-highlight markup.
        snippet: clean_label(&row.snippet),
    }
}

/// Merge the hierarchy outline and the related-topic link list into one
/// ordered section slice: hierarchy first (boilerplate entries dropped),
/// related topics appended after them.
fn assemble_sections(
    outline: Vec<OutlineRow>,
    links: Vec<LinkRow>,
    related_limit: usize,
) -> Vec<Section> {
    let mut sections: Vec<Section> = outline
        .into_iter()
        .filter(|row| !SKIPPED_SECTIONS.iter().any(|s| s.eq_ignore_ascii_case(&row.line)))
        .map(|row| Section {
            id: format!("s{}", row.index),
            title: row.line,
            level: row.toclevel.max(1),
            is_related_topic: false,
            related_id: None,
        })
        .collect();

    sections.extend(
        links
            .into_iter()
            .filter(|l| l.ns == 0)
            .take(related_limit)
            .enumerate()
            .map(|(i, l)| Section {
                id: format!("r{}", i),
                title: l.title.clone(),
                level: 1,
                is_related_topic: true,
                related_id: Some(l.title),
            }),
    );

    sections
}
