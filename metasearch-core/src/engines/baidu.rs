//! Baidu search engine.
//!
//! Result links point at Baidu's own redirector (`/link?url=...`). The real
//! destination is usually exposed in the container's `mu` attribute, which
//! is preferred when present so that domain weighting sees the real host.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::{BackendContext, SearchBackend};
use crate::error::SearchError;
use crate::http;
use crate::types::{Entity, EntityList, SearchEngine};

const BAIDU_URL: &str = "https://www.baidu.com/s";

/// Baidu HTML search scraper.
pub struct BaiduEngine {
    query: String,
    config: Arc<SearchConfig>,
    base_url: String,
}

impl BaiduEngine {
    /// Build a backend for the request described by `ctx`.
    pub fn new(ctx: &BackendContext) -> Self {
        Self {
            query: ctx.query.clone(),
            config: Arc::clone(&ctx.config),
            base_url: BAIDU_URL.to_owned(),
        }
    }

    /// Point the backend at a different results endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchBackend for BaiduEngine {
    async fn search(&self, cancel: &CancellationToken) -> Result<EntityList, SearchError> {
        tracing::trace!(query = %self.query, "Baidu search");

        let client = http::build_client(&self.config)?;
        let rn = self.config.max_results_per_engine.to_string();
        let html = http::until_cancelled(
            cancel,
            http::fetch_html(
                &client,
                self.name(),
                &self.base_url,
                &[("wd", self.query.as_str()), ("ie", "utf-8"), ("rn", rn.as_str())],
            ),
        )
        .await?;

        tracing::trace!(bytes = html.len(), "Baidu response received");

        parse_baidu_html(&html, self.config.max_results_per_engine).map(EntityList::from_entities)
    }

    fn name(&self) -> &str {
        SearchEngine::Baidu.name()
    }
}

/// Parse a Baidu results page.
fn parse_baidu_html(html: &str, max_results: usize) -> Result<Vec<Entity>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse("div.result, div.c-container")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse("h3 a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".c-abstract, [class^='content-right'], .c-span-last")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results: Vec<Entity> = Vec::new();

    for element in document.select(&result_sel) {
        let Some(link) = element.select(&title_sel).next() else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let url = element
            .value()
            .attr("mu")
            .filter(|mu| mu.starts_with("http"))
            .or_else(|| link.value().attr("href"))
            .unwrap_or_default()
            .to_string();
        if url.is_empty() {
            continue;
        }

        // div.result and div.c-container overlap on the same node.
        if results.iter().any(|r| r.url == url) {
            continue;
        }

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(Entity::new(title, url, snippet, SearchEngine::Baidu.name()));

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Baidu results parsed");
    Ok(results)
}
