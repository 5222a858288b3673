//! Engine registry: maps engine names to backend factories.
//!
//! Resolution is all-or-nothing. If any requested name is unknown, nothing is
//! constructed and every unknown name is reported back.

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::engine::{BackendContext, SearchBackend};
use crate::engines::{BaiduEngine, BingEngine, GoogleEngine, WxEngine};
use crate::error::SearchError;
use crate::types::SearchEngine;

/// Builds a backend for one request.
pub type BackendFactory = Arc<dyn Fn(&BackendContext) -> Box<dyn SearchBackend> + Send + Sync>;

/// Name → factory map, in registration order.
#[derive(Clone)]
pub struct EngineRegistry {
    config: Arc<SearchConfig>,
    factories: Vec<(String, BackendFactory)>,
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.names())
            .finish()
    }
}

impl EngineRegistry {
    /// An empty registry. Use [`register`](Self::register) to add backends.
    pub fn new(config: Arc<SearchConfig>) -> Self {
        Self {
            config,
            factories: Vec::new(),
        }
    }

    /// A registry with every built-in engine registered.
    pub fn with_default_engines(config: Arc<SearchConfig>) -> Self {
        let mut registry = Self::new(config);
        for engine in SearchEngine::all() {
            let factory: BackendFactory = match engine {
                SearchEngine::Baidu => {
                    Arc::new(|ctx: &BackendContext| Box::new(BaiduEngine::new(ctx)) as Box<dyn SearchBackend>)
                }
                SearchEngine::Bing => {
                    Arc::new(|ctx: &BackendContext| Box::new(BingEngine::new(ctx)) as Box<dyn SearchBackend>)
                }
                SearchEngine::Google => {
                    Arc::new(|ctx: &BackendContext| Box::new(GoogleEngine::new(ctx)) as Box<dyn SearchBackend>)
                }
                SearchEngine::Wx => {
                    Arc::new(|ctx: &BackendContext| Box::new(WxEngine::new(ctx)) as Box<dyn SearchBackend>)
                }
            };
            registry.factories.push((engine.name().to_owned(), factory));
        }
        registry
    }

    /// Register `factory` under `name`, replacing any existing entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&BackendContext) -> Box<dyn SearchBackend> + Send + Sync + 'static,
    {
        let name = name.into();
        let factory: BackendFactory = Arc::new(factory);
        match self.factories.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = factory,
            None => self.factories.push((name, factory)),
        }
        self
    }

    /// Registered engine names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.iter().any(|(n, _)| n == name)
    }

    /// The configuration handed to every factory.
    pub fn config(&self) -> &Arc<SearchConfig> {
        &self.config
    }

    /// Construct one backend per requested name, preserving request order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedEngine`] listing every unknown name.
    /// No backend is constructed in that case.
    pub fn resolve<S: AsRef<str>>(
        &self,
        names: &[S],
        query: &str,
    ) -> Result<Vec<Box<dyn SearchBackend>>, SearchError> {
        let mut factories = Vec::with_capacity(names.len());
        let mut unsupported = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            match self.factories.iter().find(|(n, _)| n == name) {
                Some((_, factory)) => factories.push(factory),
                None => unsupported.push(name.to_owned()),
            }
        }

        if !unsupported.is_empty() {
            tracing::debug!(?unsupported, "rejecting request with unknown engines");
            return Err(SearchError::UnsupportedEngine(unsupported));
        }

        let ctx = BackendContext::new(query, Arc::clone(&self.config));
        Ok(factories.into_iter().map(|factory| factory(&ctx)).collect())
    }
}

/// Split a comma-separated `engine` parameter into names.
///
/// Whitespace is trimmed and empty segments are dropped. Returns `None` when
/// nothing is left, meaning the default engine set applies.
pub fn parse_engine_param(raw: Option<&str>) -> Option<Vec<String>> {
    let names: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}
