//! Search orchestrator: resolve, fan out, collect, score, rank, assemble.
//!
//! The pipeline for one request:
//!
//! 1. Resolve requested engine names through the
//!    [`EngineRegistry`](crate::registry::EngineRegistry) (all-or-nothing)
//! 2. Spawn one task per backend and collect lists until the deadline
//! 3. Score every collected entity against its own list
//! 4. Merge, stable-sort by score and wrap in an [`AggregateResult`]

pub mod dispatch;
pub mod rank;
pub mod response;
pub mod scoring;

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::registry::EngineRegistry;

pub use response::AggregateResult;

/// One incoming search.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// The query string. May be empty; backends receive it as-is.
    pub query: String,
    /// Engines to query. `None` means the configured default set.
    pub engines: Option<Vec<String>>,
    /// Collection deadline. `None` means the configured default.
    pub timeout: Option<Duration>,
}

impl SearchRequest {
    /// A request for `query` using every default.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Restrict the request to `engines`.
    pub fn with_engines<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engines = Some(engines.into_iter().map(Into::into).collect());
        self
    }

    /// Override the collection deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Run `request` against the backends in `registry`.
///
/// Backends that miss the deadline or fail simply contribute nothing; the
/// result still has status [`response::CODE_OK`].
///
/// # Errors
///
/// Returns [`SearchError::UnsupportedEngine`] before any backend is
/// constructed if a requested engine is not registered.
pub async fn orchestrate_search(
    registry: &EngineRegistry,
    request: &SearchRequest,
) -> Result<AggregateResult, SearchError> {
    let started = Instant::now();
    let config = registry.config();

    let engines: &[String] = request.engines.as_deref().unwrap_or(&config.engines);
    let timeout = request.timeout.unwrap_or_else(|| config.default_timeout());

    if config.debug_enabled() {
        tracing::info!(query = %request.query, ?engines, ?timeout, "search request");
    } else {
        tracing::trace!(query = %request.query, ?engines, ?timeout, "search request");
    }

    let backends = registry.resolve(engines, &request.query)?;
    let total = backends.len();

    let outcome = dispatch::dispatch_and_collect(backends, timeout, CancellationToken::new()).await;
    if outcome.timed_out {
        tracing::debug!(
            received = outcome.lists.len(),
            pending = outcome.pending,
            total,
            "deadline reached before every engine reported"
        );
    }

    let mut lists = outcome.lists;
    scoring::score_lists(&mut lists, config);

    let result = AggregateResult::assemble(lists, started);
    tracing::debug!(size = result.data.size, cost_ms = result.cost, "search complete");
    Ok(result)
}
