//! Core types for search results and engine identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single search result returned from a backend.
///
/// Backends fill in the descriptive fields and leave every score at zero;
/// the scores are always recomputed by
/// [`score_list`](crate::orchestrator::scoring::score_list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result.
    pub url: String,
    /// Host part of `url`, used for domain weighting.
    pub host: String,
    /// Name of the engine that returned this result.
    pub from: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
    /// Score derived from the result's rank inside its own engine list.
    pub position_score: i64,
    /// Flat per-engine credibility score.
    pub search_score: i64,
    /// Flat per-host credibility score.
    pub domain_score: i64,
    /// `position_score + search_score + domain_score`.
    pub score: i64,
}

impl Entity {
    /// Build an unscored entity, deriving `host` from `url`.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let host = host_of(&url);
        Self {
            title: title.into(),
            url,
            host,
            from: from.into(),
            snippet: snippet.into(),
            position_score: 0,
            search_score: 0,
            domain_score: 0,
            score: 0,
        }
    }
}

/// The output of one backend invocation, in the backend's relevance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityList {
    /// Page offset. Passed through untouched.
    pub index: i64,
    /// Number of results the backend reports.
    pub size: usize,
    /// The results themselves.
    pub list: Vec<Entity>,
}

impl EntityList {
    /// Wrap a backend's results, reporting their count as the size.
    pub fn from_entities(list: Vec<Entity>) -> Self {
        Self {
            index: 0,
            size: list.len(),
            list,
        }
    }

    /// An empty list, used when a backend fails.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Built-in search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchEngine {
    /// Baidu web search.
    Baidu,
    /// Bing web search.
    Bing,
    /// Google web search. Aggressive bot detection, often returns nothing.
    Google,
    /// WeChat official-account articles, searched through Sogou.
    Wx,
}

impl SearchEngine {
    /// Returns the name used in requests and in [`Entity::from`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Baidu => "Baidu",
            Self::Bing => "Bing",
            Self::Google => "Google",
            Self::Wx => "Wx",
        }
    }

    /// Returns all built-in engine variants.
    pub fn all() -> &'static [SearchEngine] {
        &[Self::Baidu, Self::Bing, Self::Google, Self::Wx]
    }

    /// Look up a built-in engine by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|e| e.name() == name)
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extract the lowercased host from a URL, or an empty string if it has none.
pub fn host_of(raw: &str) -> String {
    url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}
