//! WeChat official-account articles, searched through Sogou.
//!
//! Sogou only exposes relative `/link?url=...` links that it resolves
//! itself, so result URLs are made absolute against the search endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::engine::{BackendContext, SearchBackend};
use crate::error::SearchError;
use crate::http;
use crate::types::{Entity, EntityList, SearchEngine};

const WX_URL: &str = "https://weixin.sogou.com/weixin";

/// Sogou WeChat article scraper.
pub struct WxEngine {
    query: String,
    config: Arc<SearchConfig>,
    base_url: String,
}

impl WxEngine {
    /// Build a backend for the request described by `ctx`.
    pub fn new(ctx: &BackendContext) -> Self {
        Self {
            query: ctx.query.clone(),
            config: Arc::clone(&ctx.config),
            base_url: WX_URL.to_owned(),
        }
    }

    /// Point the backend at a different results endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchBackend for WxEngine {
    async fn search(&self, cancel: &CancellationToken) -> Result<EntityList, SearchError> {
        tracing::trace!(query = %self.query, "Wx search");

        let client = http::build_client(&self.config)?;
        let html = http::until_cancelled(
            cancel,
            http::fetch_html(
                &client,
                self.name(),
                &self.base_url,
                &[("type", "2"), ("query", self.query.as_str()), ("ie", "utf8")],
            ),
        )
        .await?;

        tracing::trace!(bytes = html.len(), "Wx response received");

        parse_wx_html(&html, &self.base_url, self.config.max_results_per_engine)
            .map(EntityList::from_entities)
    }

    fn name(&self) -> &str {
        SearchEngine::Wx.name()
    }
}

/// Parse a Sogou WeChat results page, resolving links against `base`.
fn parse_wx_html(html: &str, base: &str, max_results: usize) -> Result<Vec<Entity>, SearchError> {
    let base = url::Url::parse(base)
        .map_err(|e| SearchError::Parse(format!("invalid base url {base}: {e}")))?;
    let document = Html::parse_document(html);

    let result_sel = Selector::parse("ul.news-list > li")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse("h3 a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse("p.txt-info")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let Some(link) = element.select(&title_sel).next() else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(url) = link
            .value()
            .attr("href")
            .filter(|h| !h.is_empty())
            .and_then(|h| base.join(h).ok())
        else {
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(Entity::new(title, url.to_string(), snippet, SearchEngine::Wx.name()));

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Wx results parsed");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_WX_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<ul class="news-list">
<li id="sogou_vr_11002601_box_0">
  <div class="txt-box">
    <h3><a target="_blank" href="/link?url=dn9a_-gY295K0Rci">Rust 异步编程实践</a></h3>
    <p class="txt-info">深入理解 tokio 运行时。</p>
  </div>
</li>
<li id="sogou_vr_11002601_box_1">
  <div class="txt-box">
    <h3><a target="_blank" href="https://mp.weixin.qq.com/s/abc">所有权与借用</a></h3>
  </div>
</li>
<li><div class="txt-box"><h3><a href="">空链接</a></h3></div></li>
</ul>
</body>
</html>"#;

    #[test]
    fn parse_mock_html_returns_results() {
        let results = parse_wx_html(MOCK_WX_HTML, WX_URL, 10).expect("should parse");
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "Rust 异步编程实践");
        assert_eq!(results[0].url, "https://weixin.sogou.com/link?url=dn9a_-gY295K0Rci");
        assert_eq!(results[0].host, "weixin.sogou.com");
        assert!(results[0].snippet.contains("tokio"));
        assert_eq!(results[0].from, "Wx");

        assert_eq!(results[1].host, "mp.weixin.qq.com");
        assert!(results[1].snippet.is_empty());
    }

    #[test]
    fn parse_respects_max_results() {
        let results = parse_wx_html(MOCK_WX_HTML, WX_URL, 1).expect("should parse");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn parse_rejects_bad_base() {
        assert!(parse_wx_html(MOCK_WX_HTML, "not a url", 10).is_err());
    }

    #[test]
    fn backend_name_is_wx() {
        let ctx = BackendContext::new("q", Arc::new(SearchConfig::default()));
        assert_eq!(WxEngine::new(&ctx).name(), "Wx");
    }
}
