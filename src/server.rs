//! HTTP surface: `/search`, `/health` and static files.
//!
//! `/search` translates query parameters into a
//! [`SearchRequest`](metasearch_core::SearchRequest), runs it, and writes the
//! JSON envelope with the status the outcome calls for:
//!
//! | outcome                          | HTTP | `code` |
//! |----------------------------------|------|--------|
//! | complete or partial (deadline)   | 200  | 0      |
//! | unsupported engine name          | 400  | -1     |
//! | envelope could not be encoded    | 500  | -1     |

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use metasearch_core::duration::parse_duration;
use metasearch_core::registry::parse_engine_param;
use metasearch_core::{AggregateResult, EngineRegistry, SearchError, SearchRequest};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    registry: Arc<EngineRegistry>,
}

/// Query parameters of `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Query string. Missing means empty.
    pub q: Option<String>,
    /// Comma-separated engine names.
    pub engine: Option<String>,
    /// Collection deadline, e.g. `800ms` or `2s`.
    pub timeout: Option<String>,
}

impl SearchParams {
    /// Build the core request, applying the parameter defaults.
    ///
    /// An unparsable `timeout` is logged and ignored, so the configured
    /// default deadline applies.
    pub fn into_request(self) -> SearchRequest {
        let timeout = self
            .timeout
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match parse_duration(raw) {
                Ok(timeout) => Some(timeout),
                Err(e) => {
                    tracing::warn!(timeout = raw, error = %e, "ignoring invalid timeout");
                    None
                }
            });

        SearchRequest {
            query: self.q.unwrap_or_default(),
            engines: parse_engine_param(self.engine.as_deref()),
            timeout,
        }
    }
}

/// Build the application router.
///
/// Paths other than the API routes fall through to `static_dir` when given.
pub fn router(registry: Arc<EngineRegistry>, static_dir: Option<&Path>) -> Router {
    let state = AppState { registry };

    let mut app = Router::new()
        .route("/search", get(handle_search))
        .route("/health", get(handle_health))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
}

/// Metasearch HTTP server running on a background task.
pub struct SearchServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start the server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(registry: Arc<EngineRegistry>, config: &ServerConfig) -> Result<Self> {
        let app = router(registry, config.static_dir.as_deref());

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr).await?;
        let addr = listener.local_addr()?;

        info!("metasearch listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("metasearch server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Wait until the server task ends (it only ends on error or abort).
    pub async fn wait(&mut self) {
        let _ = (&mut self.handle).await;
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_health() -> &'static str {
    "ok"
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let started = Instant::now();
    let request = params.into_request();

    match metasearch_core::search(&state.registry, &request).await {
        Ok(result) => encode(StatusCode::OK, &result, started),
        Err(SearchError::UnsupportedEngine(names)) => {
            tracing::info!(engines = ?names, "rejected search request");
            encode(
                StatusCode::BAD_REQUEST,
                &AggregateResult::unsupported(&names, started),
                started,
            )
        }
        Err(err) => {
            tracing::error!(error = %err, "search failed");
            encode(
                StatusCode::INTERNAL_SERVER_ERROR,
                &AggregateResult::from_error(&err, started),
                started,
            )
        }
    }
}

/// Serialize `result` with `status`, degrading to a 500 envelope if encoding fails.
fn encode(status: StatusCode, result: &AggregateResult, started: Instant) -> Response {
    match result.to_json() {
        Ok(body) => json_response(status, body),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode search response");
            let failure = AggregateResult::from_error(&err, started);
            match failure.to_json() {
                Ok(body) => json_response(StatusCode::INTERNAL_SERVER_ERROR, body),
                Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
            }
        }
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
