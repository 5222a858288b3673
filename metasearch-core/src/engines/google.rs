//! Google search engine.
//!
//! Google has the best results but employs aggressive bot detection
//! (CAPTCHAs, consent walls). A blocked request usually parses to an empty
//! list rather than an error, which simply contributes nothing.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::{BackendContext, SearchBackend};
use crate::error::SearchError;
use crate::http;
use crate::types::{Entity, EntityList, SearchEngine};

const GOOGLE_URL: &str = "https://www.google.com/search";

/// Google HTML search scraper.
pub struct GoogleEngine {
    query: String,
    config: Arc<SearchConfig>,
    base_url: String,
}

impl GoogleEngine {
    /// Build a backend for the request described by `ctx`.
    pub fn new(ctx: &BackendContext) -> Self {
        Self {
            query: ctx.query.clone(),
            config: Arc::clone(&ctx.config),
            base_url: GOOGLE_URL.to_owned(),
        }
    }

    /// Point the backend at a different results endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchBackend for GoogleEngine {
    async fn search(&self, cancel: &CancellationToken) -> Result<EntityList, SearchError> {
        tracing::trace!(query = %self.query, "Google search");

        let client = http::build_client(&self.config)?;
        let num = self.config.max_results_per_engine.to_string();
        let html = http::until_cancelled(
            cancel,
            http::fetch_html(
                &client,
                self.name(),
                &self.base_url,
                &[("q", self.query.as_str()), ("hl", "zh-CN"), ("num", num.as_str())],
            ),
        )
        .await?;

        tracing::trace!(bytes = html.len(), "Google response received");

        parse_google_html(&html, self.config.max_results_per_engine).map(EntityList::from_entities)
    }

    fn name(&self) -> &str {
        SearchEngine::Google.name()
    }
}

/// Parse a Google results page.
fn parse_google_html(html: &str, max_results: usize) -> Result<Vec<Entity>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse("div.g")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let link_sel = Selector::parse("a[href]")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;
    let title_sel = Selector::parse("h3")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse("div.VwiC3b, span.aCOpRe, div[data-sncf]")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(url) = element
            .select(&link_sel)
            .filter_map(|a| a.value().attr("href"))
            .find_map(unwrap_google_redirect)
        else {
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(Entity::new(title, url, snippet, SearchEngine::Google.name()));

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Google results parsed");
    Ok(results)
}

/// Turn a result `href` into a destination URL.
///
/// Absolute links are kept; `/url?q=<dest>` redirects are unwrapped; anything
/// else (internal navigation) is rejected.
fn unwrap_google_redirect(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with("/url?") {
        let parsed = url::Url::parse(&format!("https://www.google.com{href}")).ok()?;
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "q" || k == "url")
            .map(|(_, v)| v.into_owned())
            .filter(|v| v.starts_with("http"));
    }
    None
}
