//! Error types for the metasearch-core crate.
//!
//! All errors use stable string messages suitable for display to users
//! and for embedding in the `msg` field of a response envelope.

/// Errors that can occur while resolving, running or encoding a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// One or more requested engine names are not registered.
    #[error("unsupported search engine: {}", .0.join(","))]
    UnsupportedEngine(Vec<String>),

    /// An HTTP request to a search engine failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse search engine response HTML.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The response envelope could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend was told to stop before it finished.
    #[error("search cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for metasearch-core results.
pub type Result<T> = std::result::Result<T, SearchError>;
