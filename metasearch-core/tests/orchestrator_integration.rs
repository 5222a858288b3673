//! Integration tests for the search orchestrator pipeline.
//!
//! These exercise resolve → dispatch → collect → score → rank → assemble
//! with mock backends (no network calls), plus one built-in backend against
//! a local mock HTTP server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metasearch_core::engines::BingEngine;
use metasearch_core::orchestrator::scoring::score_list;
use metasearch_core::{
    BackendContext, EngineRegistry, Entity, EntityList, SearchBackend, SearchConfig, SearchError,
    SearchRequest,
};
use tokio_util::sync::CancellationToken;

/// Shared observation points for mock backends.
#[derive(Default)]
struct Probe {
    built: AtomicUsize,
    invoked: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

struct MockBackend {
    name: String,
    query: String,
    delay: Duration,
    urls: Vec<String>,
    probe: Arc<Probe>,
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search(&self, cancel: &CancellationToken) -> Result<EntityList, SearchError> {
        self.probe.invoked.fetch_add(1, Ordering::SeqCst);
        self.probe
            .queries
            .lock()
            .expect("probe lock")
            .push(self.query.clone());
        tokio::select! {
            _ = cancel.cancelled() => return Err(SearchError::Cancelled),
            _ = tokio::time::sleep(self.delay) => {}
        }
        Ok(EntityList::from_entities(
            self.urls
                .iter()
                .map(|u| Entity::new(format!("{} {u}", self.name), u.clone(), "", self.name.clone()))
                .collect(),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn register_mock(
    registry: &mut EngineRegistry,
    name: &str,
    delay_ms: u64,
    urls: &[&str],
    probe: &Arc<Probe>,
) {
    let name = name.to_owned();
    let urls: Vec<String> = urls.iter().map(|u| (*u).to_owned()).collect();
    let probe = Arc::clone(probe);
    registry.register(name.clone(), move |ctx: &BackendContext| {
        probe.built.fetch_add(1, Ordering::SeqCst);
        Box::new(MockBackend {
            name: name.clone(),
            query: ctx.query.clone(),
            delay: Duration::from_millis(delay_ms),
            urls: urls.clone(),
            probe: Arc::clone(&probe),
        }) as Box<dyn SearchBackend>
    });
}

fn test_config() -> SearchConfig {
    SearchConfig {
        engines: vec!["Baidu".into(), "Bing".into()],
        default_timeout_ms: 2_000,
        position_weights: HashMap::from([("Baidu".to_owned(), 10), ("Bing".to_owned(), 10)]),
        search_scores: HashMap::from([("Baidu".to_owned(), 5), ("Bing".to_owned(), 6)]),
        domain_scores: HashMap::from([("github.com".to_owned(), 20)]),
        ..Default::default()
    }
}

fn assert_sorted(list: &[Entity]) {
    for pair in list.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "results not sorted: {} ({}) >= {} ({})",
            pair[0].score,
            pair[0].url,
            pair[1].score,
            pair[1].url
        );
    }
}

#[tokio::test]
async fn two_engines_instant_results_are_merged_and_ranked() {
    let probe = Arc::new(Probe::default());
    let mut registry = EngineRegistry::new(Arc::new(test_config()));
    register_mock(&mut registry, "Baidu", 0, &["https://a.com", "https://b.com"], &probe);
    register_mock(&mut registry, "Bing", 0, &["https://c.com", "https://github.com/x"], &probe);

    let request = SearchRequest::new("rust").with_engines(["Baidu", "Bing"]);
    let result = metasearch_core::search(&registry, &request)
        .await
        .expect("known engines");

    assert_eq!(result.code, 0);
    assert!(result.msg.is_none());
    assert_eq!(result.data.size, 4);
    assert_eq!(result.data.list.len(), 4);
    assert_sorted(&result.data.list);

    // Bing: c = 2*10+6 = 26, github = 1*10+6+20 = 36. Baidu: a = 25, b = 15.
    let scores: Vec<i64> = result.data.list.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![36, 26, 25, 15]);
    for e in &result.data.list {
        assert_eq!(e.score, e.position_score + e.search_score + e.domain_score);
    }
}

#[tokio::test]
async fn unknown_engine_rejects_without_invoking_anything() {
    let probe = Arc::new(Probe::default());
    let mut registry = EngineRegistry::new(Arc::new(test_config()));
    register_mock(&mut registry, "Baidu", 0, &["https://a.com"], &probe);
    register_mock(&mut registry, "Bing", 0, &["https://b.com"], &probe);

    let request = SearchRequest::new("rust").with_engines(["Baidu", "Yahoo"]);
    let err = metasearch_core::search(&registry, &request)
        .await
        .expect_err("Yahoo is unknown");

    match err {
        SearchError::UnsupportedEngine(names) => assert_eq!(names, vec!["Yahoo"]),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(probe.built.load(Ordering::SeqCst), 0);
    assert_eq!(probe.invoked.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn deadline_drops_slow_engine() {
    let probe = Arc::new(Probe::default());
    let mut registry = EngineRegistry::new(Arc::new(test_config()));
    register_mock(&mut registry, "Baidu", 0, &["https://a.com", "https://b.com"], &probe);
    register_mock(&mut registry, "Bing", 100, &["https://c.com"], &probe);

    let request = SearchRequest::new("rust")
        .with_engines(["Baidu", "Bing"])
        .with_timeout(Duration::from_millis(10));
    let started = Instant::now();
    let result = metasearch_core::search(&registry, &request)
        .await
        .expect("partial results are not an error");

    assert!(started.elapsed() < Duration::from_millis(90));
    assert_eq!(result.code, 0);
    assert_eq!(result.data.size, 2);
    assert!(result.data.list.iter().all(|e| e.from == "Baidu"));
}

#[tokio::test]
async fn size_counts_only_lists_that_arrived() {
    let probe = Arc::new(Probe::default());
    let mut registry = EngineRegistry::new(Arc::new(test_config()));
    register_mock(&mut registry, "A", 0, &["https://a1.com"], &probe);
    register_mock(&mut registry, "B", 0, &["https://b1.com", "https://b2.com", "https://b3.com"], &probe);
    register_mock(&mut registry, "C", 1_000, &["https://c1.com", "https://c2.com"], &probe);

    let request = SearchRequest::new("q")
        .with_engines(["A", "B", "C"])
        .with_timeout(Duration::from_millis(100));
    let result = metasearch_core::search(&registry, &request)
        .await
        .expect("known engines");

    assert_eq!(result.data.size, 4);
    assert_eq!(result.data.list.len(), 4);
    assert_sorted(&result.data.list);
}

#[tokio::test]
async fn empty_query_uses_default_engines() {
    let probe = Arc::new(Probe::default());
    let mut registry = EngineRegistry::new(Arc::new(test_config()));
    register_mock(&mut registry, "Baidu", 0, &[], &probe);
    register_mock(&mut registry, "Bing", 0, &[], &probe);

    let result = metasearch_core::search(&registry, &SearchRequest::new(""))
        .await
        .expect("empty query is fine");

    assert_eq!(result.code, 0);
    assert_eq!(result.data.size, 0);
    assert_eq!(probe.invoked.load(Ordering::SeqCst), 2);
    let queries = probe.queries.lock().expect("probe lock");
    assert!(queries.iter().all(String::is_empty));
}

#[tokio::test]
async fn equal_scores_keep_arrival_then_list_order() {
    let config = SearchConfig {
        position_weights: HashMap::new(),
        default_position_weight: 0,
        search_scores: HashMap::new(),
        domain_scores: HashMap::new(),
        ..test_config()
    };
    let probe = Arc::new(Probe::default());
    let mut registry = EngineRegistry::new(Arc::new(config));
    register_mock(&mut registry, "Late", 60, &["https://l1.com", "https://l2.com"], &probe);
    register_mock(&mut registry, "Early", 0, &["https://e1.com", "https://e2.com"], &probe);

    let request = SearchRequest::new("q").with_engines(["Late", "Early"]);
    let result = metasearch_core::search(&registry, &request)
        .await
        .expect("known engines");

    let urls: Vec<&str> = result.data.list.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://e1.com", "https://e2.com", "https://l1.com", "https://l2.com"]
    );
}

#[test]
fn rescoring_is_idempotent() {
    let config = test_config();
    let raw = EntityList::from_entities(vec![
        Entity::new("a", "https://github.com/a", "", "Bing"),
        Entity::new("b", "https://b.com", "", "Bing"),
    ]);
    let mut once = raw.clone();
    score_list(&mut once, &config);
    let mut twice = raw;
    score_list(&mut twice, &config);
    score_list(&mut twice, &config);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn bing_backend_parses_mock_server_response() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    let body = r#"<html><body><ol id="b_results">
<li class="b_algo"><h2><a href="https://github.com/tokio-rs/tokio">tokio-rs/tokio</a></h2>
<div class="b_caption"><p>A runtime for writing reliable asynchronous applications.</p></div></li>
<li class="b_algo"><h2><a href="https://tokio.rs/">Tokio</a></h2></li>
</ol></body></html>"#;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "tokio runtime"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let ctx = BackendContext::new("tokio runtime", Arc::new(SearchConfig::default()));
    let engine = BingEngine::new(&ctx).with_base_url(format!("{}/search", server.uri()));
    let list = engine
        .search(&CancellationToken::new())
        .await
        .expect("mock server responds");

    assert_eq!(list.size, 2);
    assert_eq!(list.list[0].host, "github.com");
    assert_eq!(list.list[1].title, "Tokio");
}

#[tokio::test]
async fn bing_backend_reports_http_errors() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let ctx = BackendContext::new("q", Arc::new(SearchConfig::default()));
    let engine = BingEngine::new(&ctx).with_base_url(format!("{}/search", server.uri()));
    let err = engine
        .search(&CancellationToken::new())
        .await
        .expect_err("503 is an error");
    assert!(matches!(err, SearchError::Http(_)));
}
