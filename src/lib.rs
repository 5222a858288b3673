//! metasearch: one query, many search engines, one ranked list.
//!
//! This crate is the service around [`metasearch_core`]:
//! HTTP request → engine resolution → concurrent backends → deadline →
//! scoring → ranking → JSON envelope
//!
//! # Architecture
//!
//! - **Config**: TOML file loaded once at startup into an immutable
//!   [`AppConfig`], shared through an `Arc`
//! - **Registry**: engine name → backend factory, built from the config
//! - **Server**: axum routes for `/search` and `/health`, static files for
//!   everything else

pub mod config;
pub mod error;
pub mod server;

use std::sync::Arc;

pub use config::{AppConfig, ServerConfig};
pub use error::{AppError, Result};
pub use metasearch_core::{EngineRegistry, SearchConfig};
pub use server::SearchServer;

/// Build the engine registry for `config` and check the config against it.
///
/// # Errors
///
/// Returns [`AppError::Config`] if the configuration is invalid.
pub fn build_registry(config: &AppConfig) -> Result<Arc<EngineRegistry>> {
    let registry = EngineRegistry::with_default_engines(Arc::new(config.search.clone()));
    config.validate(&registry)?;
    Ok(Arc::new(registry))
}
