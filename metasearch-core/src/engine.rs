//! Trait definition for pluggable search backends.
//!
//! Each search engine (Baidu, Bing, Google, Wx) implements
//! [`SearchBackend`]. A backend is constructed per request by an
//! [`EngineRegistry`](crate::registry::EngineRegistry) factory, so it already
//! knows the query it has to answer.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::EntityList;

/// Everything a backend factory needs to build a backend for one request.
#[derive(Debug, Clone)]
pub struct BackendContext {
    /// The raw query string. May be empty.
    pub query: String,
    /// Shared, immutable search configuration.
    pub config: Arc<SearchConfig>,
}

impl BackendContext {
    /// Create a context for `query`.
    pub fn new(query: impl Into<String>, config: Arc<SearchConfig>) -> Self {
        Self {
            query: query.into(),
            config,
        }
    }
}

/// A pluggable search backend.
///
/// Implementors handle their own:
///
/// - URL construction with query encoding
/// - HTTP request with appropriate headers, bounded by their own timeout
/// - HTML parsing via CSS selectors
///
/// Implementations should stop early and return [`SearchError::Cancelled`]
/// once `cancel` fires. All implementations must be `Send + Sync` so they
/// can run on their own task.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search the configured query.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails, the response cannot
    /// be parsed, or the search was cancelled.
    async fn search(&self, cancel: &CancellationToken) -> Result<EntityList, SearchError>;

    /// The engine name stamped into [`Entity::from`](crate::types::Entity::from).
    fn name(&self) -> &str;
}
