pub mod article;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod graph;
pub mod keywords;
pub mod render;
pub mod source;

pub use article::{Article, FetchedArticle, SearchHit, Section};
pub use config::Config;
pub use controller::{BuildOutcome, BuildTicket, ClickOutcome, Displayed, Phase, RoadmapController};
pub use error::{KnowmapError, Result};
pub use graph::{build_graph, Graph, Link, LinkKind, Node, NodeKind};
pub use keywords::KeywordExtractor;
pub use render::{GraphRenderer, NodeClick, RasterSurface, Theme};
pub use source::{ArticleSource, CachedSource, WikipediaSource};

/// Initialize logging from the RUST_LOG environment variable, defaulting to
/// info level. Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info"),
    )
    .try_init();
}
