//! Shared HTTP client with User-Agent rotation for backend requests.
//!
//! Provides a configured [`reqwest::Client`] with browser-like headers,
//! cookie support, and rotating User-Agent strings, plus a helper that races
//! a request against the request's cancellation token.

use std::future::Future;

use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Realistic browser User-Agent strings, rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] configured for search engine scraping.
///
/// The client has a cookie store, the configured per-backend timeout, a
/// random User-Agent (or the configured one) and at most 10 redirects.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(config.request_timeout())
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Run `fut` unless `cancel` fires first.
///
/// # Errors
///
/// Returns [`SearchError::Cancelled`] if the token is cancelled before `fut`
/// completes, otherwise whatever `fut` returns.
pub async fn until_cancelled<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, SearchError>
where
    F: Future<Output = Result<T, SearchError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SearchError::Cancelled),
        out = fut => out,
    }
}

/// GET `url` with `query` parameters and return the body as text.
///
/// `engine` only labels error messages.
///
/// # Errors
///
/// Returns [`SearchError::Http`] on transport failure or a non-2xx status.
pub async fn fetch_html(
    client: &reqwest::Client,
    engine: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, SearchError> {
    let response = client
        .get(url)
        .query(query)
        .header("Accept", "text/html,application/xhtml+xml")
        .header("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8")
        .send()
        .await
        .map_err(|e| SearchError::Http(format!("{engine} request failed: {e}")))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("{engine} HTTP error: {e}")))?;

    response
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("{engine} response read failed: {e}")))
}
