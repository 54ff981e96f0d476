// tests/providers_http.rs
//
// HTTP providers against a local axum server serving fixture bodies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use cockpit_news::config::NewsConfig;
use cockpit_news::ingest::providers::newsapi::NewsApiProvider;
use cockpit_news::ingest::providers::newsdata::NewsDataProvider;
use cockpit_news::NewsProvider;

const NEWSDATA_BODY: &str = include_str!("fixtures/newsdata_latest.json");
const NEWSAPI_BODY: &str = include_str!("fixtures/newsapi_everything.json");

#[derive(Clone, Default)]
struct Seen {
    params: Arc<Mutex<Vec<HashMap<String, String>>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn keyed_config() -> NewsConfig {
    NewsConfig {
        newsdata_api_key: Some("nd-test-key".into()),
        newsapi_api_key: Some("na-test-key".into()),
        ..NewsConfig::default()
    }
}

async fn newsdata_ok(
    State(seen): State<Seen>,
    Query(q): Query<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    seen.params.lock().unwrap().push(q);
    (StatusCode::OK, NEWSDATA_BODY)
}

async fn newsapi_ok(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    if let Some(k) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        seen.api_keys.lock().unwrap().push(k.to_string());
    }
    seen.params.lock().unwrap().push(q);
    (StatusCode::OK, NEWSAPI_BODY)
}

#[tokio::test]
async fn newsdata_sends_query_params_and_truncates() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/1/latest", get(newsdata_ok))
        .with_state(seen.clone());
    let base = spawn_server(app).await;

    let p = NewsDataProvider::new(&keyed_config())
        .unwrap()
        .with_base_url(format!("{base}/api/1/latest"));
    assert!(p.is_configured());

    let articles = p.search("port congestion", 5).await.expect("search ok");
    assert_eq!(articles.len(), 5);
    assert_eq!(articles[0].id, "nd-001");
    assert_eq!(articles[0].source_categories, vec!["business".to_string()]);
    assert_eq!(
        articles[0].description,
        "A dockworker strike has caused severe congestion at Europe's largest port."
    );
    assert_eq!(articles[1].description, "Carriers reroute around the Cape as Suez transits fall.");

    let params = seen.params.lock().unwrap();
    let q = &params[0];
    assert_eq!(q.get("apikey").map(String::as_str), Some("nd-test-key"));
    assert_eq!(q.get("q").map(String::as_str), Some("port congestion"));
    assert_eq!(q.get("language").map(String::as_str), Some("en"));
    assert_eq!(q.get("size").map(String::as_str), Some("5"));
}

#[tokio::test]
async fn newsdata_http_error_does_not_leak_key() {
    let app = Router::new().route(
        "/api/1/latest",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                r#"{"status":"error","results":{"message":"API key invalid"}}"#,
            )
        }),
    );
    let base = spawn_server(app).await;
    let p = NewsDataProvider::new(&keyed_config())
        .unwrap()
        .with_base_url(format!("{base}/api/1/latest"));

    let err = format!("{:#}", p.search("tariffs", 10).await.unwrap_err());
    assert!(err.contains("401"), "{err}");
    assert!(!err.contains("nd-test-key"), "{err}");
}

#[tokio::test]
async fn unreachable_provider_is_an_error() {
    // Nothing listens on port 9 locally
    let p = NewsDataProvider::new(&keyed_config())
        .unwrap()
        .with_base_url("http://127.0.0.1:9/api/1/latest");
    let err = format!("{:#}", p.search("tariffs", 10).await.unwrap_err());
    assert!(!err.contains("nd-test-key"), "{err}");
}

#[tokio::test]
async fn newsapi_uses_header_key_and_maps_articles() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/v2/everything", get(newsapi_ok))
        .with_state(seen.clone());
    let base = spawn_server(app).await;

    let p = NewsApiProvider::new(&keyed_config())
        .unwrap()
        .with_base_url(format!("{base}/v2/everything"));
    let articles = p.search("rail strike", 10).await.expect("search ok");

    // the [Removed] placeholder is dropped; syndicated copies share a title id
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].id, articles[1].id);
    assert_eq!(articles[0].source_name, "Supply Chain Dive");
    assert!(articles[0].published_at.is_some());

    assert_eq!(seen.api_keys.lock().unwrap().as_slice(), ["na-test-key".to_string()]);
    let params = seen.params.lock().unwrap();
    let q = &params[0];
    assert!(q.get("apiKey").is_none() && q.get("apikey").is_none());
    assert_eq!(q.get("sortBy").map(String::as_str), Some("publishedAt"));
    assert_eq!(q.get("pageSize").map(String::as_str), Some("10"));
    assert!(q.contains_key("from"));
}

#[tokio::test]
async fn missing_key_is_unconfigured() {
    let p = NewsDataProvider::new(&NewsConfig::default()).unwrap();
    assert!(!p.is_configured());
    assert!(p.search("tariffs", 10).await.is_err());

    let p = NewsApiProvider::new(&NewsConfig::default()).unwrap();
    assert!(!p.is_configured());
}
