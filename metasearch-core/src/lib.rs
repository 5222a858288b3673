//! # metasearch-core
//!
//! Concurrent multi-engine search with a hard deadline.
//!
//! ## Design
//!
//! - Engines are looked up by name in an [`EngineRegistry`]; a request naming
//!   any unknown engine is rejected before anything runs
//! - Each resolved backend runs on its own task and reports one
//!   [`EntityList`] over a bounded channel
//! - Collection stops when every backend reported or the deadline fired;
//!   late backends are cancelled and whatever arrived is used
//! - Every entity is scored from its position in its own list, its engine and
//!   its host, then the merged set is stable-sorted by score
//!
//! ## Logging
//!
//! Queries are logged at trace level unless `debug` is enabled in
//! [`SearchConfig`].

pub mod config;
pub mod duration;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod registry;
pub mod types;

pub use config::SearchConfig;
pub use engine::{BackendContext, SearchBackend};
pub use error::{Result, SearchError};
pub use orchestrator::{AggregateResult, SearchRequest};
pub use registry::EngineRegistry;
pub use types::{Entity, EntityList, SearchEngine};

/// Search every engine named in `request` concurrently.
///
/// Collects until all engines reported or the deadline fired, scores and
/// ranks the merged results, and returns the response envelope.
///
/// # Errors
///
/// Returns [`SearchError::UnsupportedEngine`] if `request` names an engine
/// that is not registered. No backend runs in that case.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> metasearch_core::Result<()> {
/// use std::sync::Arc;
/// use metasearch_core::{EngineRegistry, SearchConfig, SearchRequest};
///
/// let registry = EngineRegistry::with_default_engines(Arc::new(SearchConfig::default()));
/// let request = SearchRequest::new("rust programming").with_engines(["Bing", "Baidu"]);
/// let result = metasearch_core::search(&registry, &request).await?;
/// for entity in &result.data.list {
///     println!("{} {}: {}", entity.score, entity.title, entity.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(registry: &EngineRegistry, request: &SearchRequest) -> Result<AggregateResult> {
    orchestrator::orchestrate_search(registry, request).await
}
