//! Roadmap controller: the search -> select -> display -> re-explore state
//! machine.
//!
//! The controller owns all interaction state explicitly (no hidden module
//! state) and is generic over its [`ArticleSource`] so tests can drive it
//! with an in-memory mock. Builds are two-phase: `begin_build` hands out a
//! generation ticket, `complete_build` discards stale tickets, so a slow
//! fetch can never overwrite a later, faster one (last-request-wins).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::article::{Article, FetchedArticle, SearchHit};
use crate::error::{KnowmapError, Result};
use crate::graph::{build_graph, Graph, NodeKind};
use crate::source::ArticleSource;

/// Interaction phase. `Error` is always recoverable via
/// [`RoadmapController::dismiss_error`]; no phase is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Searching,
    /// Holds the (possibly empty) search hit list.
    ResultsReady(Vec<SearchHit>),
    Building,
    Displaying,
    /// Transient, user-visible error message. The displayed roadmap, if any,
    /// is retained underneath.
    Error(String),
}

/// The committed `{article, graph}` snapshot currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Displayed {
    pub article: Article,
    pub graph: Graph,
}

/// Opaque generation ticket for one `Building` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket(u64);

/// Result of completing a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The graph was committed and is now displayed.
    Committed,
    /// A newer build superseded this one; its result was discarded.
    Superseded,
}

/// Result of a node click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click targeted a related-topic node and the roadmap was rebuilt.
    Rebuilt,
    /// Main and section nodes are not navigable; nothing happened.
    Ignored,
    /// A concurrent build superseded this click.
    Superseded,
}

/// Orchestrates search, selection, graph builds and re-exploration clicks.
pub struct RoadmapController<S, R = StdRng> {
    source: S,
    rng: R,
    phase: Phase,
    display: Option<Displayed>,
    generation: u64,
}

impl<S: ArticleSource> RoadmapController<S> {
    /// Controller with an OS-seeded RNG for the related-topic interlinks.
    pub fn new(source: S) -> Self {
        Self::with_rng(source, StdRng::from_os_rng())
    }
}

impl<S: ArticleSource, R: Rng> RoadmapController<S, R> {
    /// Controller with an injected RNG; tests pin a seed here to assert
    /// exact link sets.
    pub fn with_rng(source: S, rng: R) -> Self {
        Self {
            source,
            rng,
            phase: Phase::Idle,
            display: None,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The roadmap currently on screen, if any. Retained across transient
    /// errors; replaced wholesale on every successful build.
    pub fn displayed(&self) -> Option<&Displayed> {
        self.display.as_ref()
    }

    /// Current search hits, when in `ResultsReady`.
    pub fn results(&self) -> &[SearchHit] {
        match &self.phase {
            Phase::ResultsReady(hits) => hits,
            _ => &[],
        }
    }

    /// Run a search. Blank queries are rejected before any network call and
    /// leave the phase untouched.
    pub async fn search(&mut self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Err(KnowmapError::Validation(
                "Search query must not be blank".to_string(),
            ));
        }

        self.phase = Phase::Searching;
        match self.source.search(query).await {
            Ok(hits) => {
                log::debug!("Search '{}' returned {} hits", query, hits.len());
                self.phase = Phase::ResultsReady(hits);
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Transition to `Building`: clears any pending hit list immediately so
    /// a stale list cannot be acted on twice, and hands out the generation
    /// ticket for this build.
    pub fn begin_build(&mut self) -> BuildTicket {
        self.generation += 1;
        self.phase = Phase::Building;
        BuildTicket(self.generation)
    }

    /// Complete a build with the fetch outcome for `ticket`.
    ///
    /// Stale tickets are discarded without touching any state
    /// (last-request-wins). A fetch error moves to `Error` but keeps the
    /// previously displayed roadmap.
    pub fn complete_build(
        &mut self,
        ticket: BuildTicket,
        outcome: Result<FetchedArticle>,
    ) -> Result<BuildOutcome> {
        if ticket.0 != self.generation {
            log::debug!(
                "Discarding superseded build (ticket {} < generation {})",
                ticket.0,
                self.generation
            );
            return Ok(BuildOutcome::Superseded);
        }

        match outcome {
            Ok(fetched) => {
                let graph = build_graph(&fetched.article, &fetched.sections, &mut self.rng);
                self.display = Some(Displayed {
                    article: fetched.article,
                    graph,
                });
                self.phase = Phase::Displaying;
                Ok(BuildOutcome::Committed)
            }
            Err(e) => {
                self.phase = Phase::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Select a search result and build its roadmap.
    pub async fn select_result(&mut self, id: &str) -> Result<BuildOutcome> {
        let ticket = self.begin_build();
        let outcome = self.source.fetch_article(id).await;
        self.complete_build(ticket, outcome)
    }

    /// Handle a renderer click event.
    ///
    /// Only related-topic nodes carrying an external reference trigger a
    /// rebuild; clicks on the main node or section nodes are no-ops.
    pub async fn click_node(&mut self, node_id: &str) -> Result<ClickOutcome> {
        let Some(displayed) = &self.display else {
            return Ok(ClickOutcome::Ignored);
        };
        let target = displayed
            .graph
            .node(node_id)
            .filter(|n| n.kind == NodeKind::Topic)
            .and_then(|n| n.external_ref.clone());
        let Some(article_ref) = target else {
            return Ok(ClickOutcome::Ignored);
        };

        log::debug!("Node click -> re-exploring '{}'", article_ref);
        match self.select_result(&article_ref).await? {
            BuildOutcome::Committed => Ok(ClickOutcome::Rebuilt),
            BuildOutcome::Superseded => Ok(ClickOutcome::Superseded),
        }
    }

    /// Export the rendered surface as a PNG named after the displayed
    /// article (or `roadmap.png` when none is displayed).
    ///
    /// Side effect only: the phase and the displayed graph are untouched,
    /// even on failure.
    pub fn export(
        &self,
        surface: &crate::render::RasterSurface,
        dir: &std::path::Path,
    ) -> Result<std::path::PathBuf> {
        let title = self.display.as_ref().map(|d| d.article.title.as_str());
        crate::export::export_png(surface, dir, title)
    }

    /// Acknowledge a transient error, returning to the last stable phase:
    /// `Displaying` when a roadmap is on screen, `Idle` otherwise.
    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, Phase::Error(_)) {
            self.phase = if self.display.is_some() {
                Phase::Displaying
            } else {
                Phase::Idle
            };
        }
    }
}
