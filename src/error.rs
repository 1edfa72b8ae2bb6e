use thiserror::Error;

/// Main error type for Knowmap
///
/// All variants are recoverable: the controller reverts to its last stable
/// state when one surfaces, and a failed export leaves the displayed graph
/// untouched.
#[derive(Error, Debug)]
pub enum KnowmapError {
    /// Rejected input (e.g. blank search query); raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Search or article-fetch failure against the article source
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed or unexpected article-source response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rendering or export serialization failure
    #[error("Render error: {0}")]
    Render(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type using KnowmapError
pub type Result<T> = std::result::Result<T, KnowmapError>;
