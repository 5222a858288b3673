//! Bing search engine, a dependable general-purpose index.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::{BackendContext, SearchBackend};
use crate::error::SearchError;
use crate::http;
use crate::types::{Entity, EntityList, SearchEngine};

const BING_URL: &str = "https://www.bing.com/search";

/// Bing HTML search scraper.
pub struct BingEngine {
    query: String,
    config: Arc<SearchConfig>,
    base_url: String,
}

impl BingEngine {
    /// Build a backend for the request described by `ctx`.
    pub fn new(ctx: &BackendContext) -> Self {
        Self {
            query: ctx.query.clone(),
            config: Arc::clone(&ctx.config),
            base_url: BING_URL.to_owned(),
        }
    }

    /// Point the backend at a different results endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchBackend for BingEngine {
    async fn search(&self, cancel: &CancellationToken) -> Result<EntityList, SearchError> {
        tracing::trace!(query = %self.query, "Bing search");

        let client = http::build_client(&self.config)?;
        let html = http::until_cancelled(
            cancel,
            http::fetch_html(
                &client,
                self.name(),
                &self.base_url,
                &[("q", self.query.as_str()), ("setlang", "zh-Hans")],
            ),
        )
        .await?;

        tracing::trace!(bytes = html.len(), "Bing response received");

        parse_bing_html(&html, self.config.max_results_per_engine).map(EntityList::from_entities)
    }

    fn name(&self) -> &str {
        SearchEngine::Bing.name()
    }
}

/// Parse a Bing results page.
fn parse_bing_html(html: &str, max_results: usize) -> Result<Vec<Entity>, SearchError> {
    let document = Html::parse_document(html);

    // Organic results live in li.b_algo containers.
    let result_sel = Selector::parse("li.b_algo")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse("h2")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let link_sel = Selector::parse("a")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".b_caption p, .b_lineclamp2")
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

        let url = match title_el
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => continue,
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(Entity::new(title, url, snippet, SearchEngine::Bing.name()));

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Bing results parsed");
    Ok(results)
}
