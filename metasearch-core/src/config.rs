//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] is built once at startup and shared read-only between
//! requests. It supplies the default engine set, the collection deadline,
//! backend request bounds, and the three score weight tables.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SearchEngine;

/// Configuration for the search core.
///
/// Use [`Default::default()`] for sensible defaults, or deserialize from the
/// `[search]` table of the application config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Engines queried when a request names none.
    pub engines: Vec<String>,
    /// Collection deadline applied when a request carries no timeout.
    pub default_timeout_ms: u64,
    /// Per-backend HTTP request timeout.
    pub request_timeout_ms: u64,
    /// Upper bound on results parsed from one backend response.
    pub max_results_per_engine: usize,
    /// Log every request's query, engines and timeout at info level.
    pub debug: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list.
    pub user_agent: Option<String>,
    /// Multiplier for the rank-derived score, per engine name.
    pub position_weights: HashMap<String, i64>,
    /// Position weight for engines missing from `position_weights`.
    pub default_position_weight: i64,
    /// Flat credibility score, per engine name. Missing engines score 0.
    pub search_scores: HashMap<String, i64>,
    /// Flat credibility score, per host or parent domain. Missing hosts score 0.
    pub domain_scores: HashMap<String, i64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let engines = SearchEngine::all()
            .iter()
            .map(|e| e.name().to_owned())
            .collect();

        let position_weights = SearchEngine::all()
            .iter()
            .map(|e| (e.name().to_owned(), 10))
            .collect();

        let search_scores = [
            (SearchEngine::Google, 8),
            (SearchEngine::Bing, 6),
            (SearchEngine::Baidu, 5),
            (SearchEngine::Wx, 3),
        ]
        .into_iter()
        .map(|(e, s)| (e.name().to_owned(), s))
        .collect();

        let domain_scores = [
            ("github.com", 10),
            ("stackoverflow.com", 10),
            ("developer.mozilla.org", 8),
            ("wikipedia.org", 6),
            ("csdn.net", -5),
        ]
        .into_iter()
        .map(|(h, s)| (h.to_owned(), s))
        .collect();

        Self {
            engines,
            default_timeout_ms: 3_000,
            request_timeout_ms: 5_000,
            max_results_per_engine: 10,
            debug: false,
            user_agent: None,
            position_weights,
            default_position_weight: 1,
            search_scores,
            domain_scores,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `default_timeout_ms` and `request_timeout_ms` must be greater than 0
    /// - `max_results_per_engine` must be greater than 0
    /// - `engines` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.default_timeout_ms == 0 {
            return Err(SearchError::Config(
                "default_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(SearchError::Config(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.max_results_per_engine == 0 {
            return Err(SearchError::Config(
                "max_results_per_engine must be greater than 0".into(),
            ));
        }
        if self.engines.is_empty() {
            return Err(SearchError::Config(
                "at least one default engine must be configured".into(),
            ));
        }
        Ok(())
    }

    /// Multiplier applied to `(len - index)` for results from `engine`.
    pub fn position_weight(&self, engine: &str) -> i64 {
        self.position_weights
            .get(engine)
            .copied()
            .unwrap_or(self.default_position_weight)
    }

    /// Flat score for every result from `engine`.
    pub fn search_score_weight(&self, engine: &str) -> i64 {
        self.search_scores.get(engine).copied().unwrap_or(0)
    }

    /// Flat score for results hosted on `host`.
    ///
    /// Tries the full host first, then each parent domain, so an entry for
    /// `example.com` also covers `docs.example.com`.
    pub fn domain_score_weight(&self, host: &str) -> i64 {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        let mut candidate = host.as_str();
        loop {
            if let Some(score) = self.domain_scores.get(candidate) {
                return *score;
            }
            match candidate.split_once('.') {
                Some((_, parent)) if !parent.is_empty() => candidate = parent,
                _ => return 0,
            }
        }
    }

    /// Collection deadline for requests that do not specify one.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Per-backend HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Whether per-request diagnostics are logged at info level.
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }
}
