//! Integration Tests for the Cached Client
//!
//! Runs a local axum upstream that counts the requests it serves, and drives
//! it through the real reqwest transport.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use cached_client::{
    CacheConfig, CacheStats, CacheStore, Client, HttpRequest, MemoryCache, MemoryCacheOptions,
    RequestCacheOptions,
};
use serde_json::{json, Value};

// == Helper Functions ==

#[derive(Clone, Default)]
struct Upstream {
    hits: Arc<AtomicUsize>,
}

impl Upstream {
    fn served(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn zen(State(upstream): State<Upstream>, headers: HeaderMap) -> Json<Value> {
    let n = upstream.hits.fetch_add(1, Ordering::SeqCst) + 1;
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    Json(json!({ "serial": n, "auth": auth }))
}

async fn flaky(State(upstream): State<Upstream>) -> (StatusCode, String) {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::SERVICE_UNAVAILABLE, "try later".to_string())
}

async fn spawn_upstream() -> (String, Upstream) {
    let upstream = Upstream::default();
    let app = Router::new()
        .route("/zen", get(zen).post(zen))
        .route("/flaky", get(flaky))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), upstream)
}

fn enabled() -> RequestCacheOptions {
    RequestCacheOptions::enabled(Duration::from_secs(60))
}

async fn cached_client(base_url: &str) -> (Client, Arc<MemoryCache>) {
    let store = Arc::new(MemoryCache::new(MemoryCacheOptions::default().with_max_size(10)));
    let config = CacheConfig::new(store.clone()).with_default_ttl(Duration::from_secs(300));
    (Client::with_cache(base_url, config), store)
}

// == Hit / Miss Path ==

#[tokio::test]
async fn test_second_request_served_from_cache() {
    let (base, upstream) = spawn_upstream().await;
    let (client, _store) = cached_client(&base).await;

    let first = client
        .request(HttpRequest::get("/zen").cache(enabled()))
        .await
        .unwrap();
    let second = client
        .request(HttpRequest::get("/zen").cache(enabled()))
        .await
        .unwrap();

    assert_eq!(upstream.served(), 1);
    assert!(second.from_cache);
    assert_eq!(first.json::<Value>().unwrap(), second.json::<Value>().unwrap());
    assert_eq!(second.header("content-type"), Some("application/json"));
    assert_eq!(client.cache_stats(), Some(CacheStats::new(1, 1, 1)));
}

#[tokio::test]
async fn test_no_cache_options_always_hits_network() {
    let (base, upstream) = spawn_upstream().await;
    let (client, store) = cached_client(&base).await;

    for _ in 0..3 {
        client.request(HttpRequest::get("/zen")).await.unwrap();
    }

    assert_eq!(upstream.served(), 3);
    assert_eq!(store.stats().size, 0);
}

#[tokio::test]
async fn test_post_not_cached() {
    let (base, upstream) = spawn_upstream().await;
    let (client, store) = cached_client(&base).await;

    for _ in 0..2 {
        client
            .request(HttpRequest::post("/zen").json(&json!({})).unwrap().cache(enabled()))
            .await
            .unwrap();
    }

    assert_eq!(upstream.served(), 2);
    assert_eq!(store.stats().size, 0);
}

#[tokio::test]
async fn test_force_refresh_replaces_cached_entry() {
    let (base, upstream) = spawn_upstream().await;
    let (client, _store) = cached_client(&base).await;

    client
        .request(HttpRequest::get("/zen").cache(enabled()))
        .await
        .unwrap();
    let refreshed = client
        .request(HttpRequest::get("/zen").cache(enabled().with_force_refresh()))
        .await
        .unwrap();
    let cached = client
        .request(HttpRequest::get("/zen").cache(enabled()))
        .await
        .unwrap();

    assert_eq!(upstream.served(), 2);
    assert_eq!(refreshed.json::<Value>().unwrap()["serial"], 2);
    assert!(cached.from_cache);
    assert_eq!(cached.json::<Value>().unwrap()["serial"], 2);
}

#[tokio::test]
async fn test_custom_key_readable_from_store() {
    let (base, _upstream) = spawn_upstream().await;
    let (client, store) = cached_client(&base).await;

    client
        .request(HttpRequest::get("/zen").cache(enabled().with_custom_key("my-zen-cache")))
        .await
        .unwrap();

    let entry = store.get("my-zen-cache").expect("entry under custom key");
    assert_eq!(entry.status_code, 200);
}

#[tokio::test]
async fn test_key_fn_separates_auth_headers() {
    let (base, upstream) = spawn_upstream().await;
    let store = Arc::new(MemoryCache::default());
    let config = CacheConfig::new(store.clone())
        .with_default_ttl(Duration::from_secs(300))
        .with_key_fn(|method, url, headers| {
            let auth = headers.get("Authorization").cloned().unwrap_or_default();
            format!("{method}:{url}:auth={auth}")
        });
    let client = Client::with_cache(&base, config);

    for token in ["", "Bearer a", "Bearer a"] {
        let mut request = HttpRequest::get("/zen").cache(enabled());
        if !token.is_empty() {
            request = request.header("Authorization", token);
        }
        client.request(request).await.unwrap();
    }

    assert_eq!(upstream.served(), 2);
    assert_eq!(store.stats().size, 2);
}

// == Failure Handling ==

#[tokio::test]
async fn test_error_status_not_cached() {
    let (base, upstream) = spawn_upstream().await;
    let (client, store) = cached_client(&base).await;

    for _ in 0..2 {
        let response = client
            .request(HttpRequest::get("/flaky").cache(enabled()))
            .await
            .unwrap();
        assert_eq!(response.status_code, 503);
        assert_eq!(response.text(), "try later");
    }

    assert_eq!(upstream.served(), 2);
    assert_eq!(store.stats().size, 0);
}

#[tokio::test]
async fn test_expired_entry_refetched() {
    let (base, upstream) = spawn_upstream().await;
    let (client, _store) = cached_client(&base).await;
    let short = RequestCacheOptions::enabled(Duration::from_millis(50));

    client
        .request(HttpRequest::get("/zen").cache(short.clone()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let response = client
        .request(HttpRequest::get("/zen").cache(short))
        .await
        .unwrap();

    assert!(!response.from_cache);
    assert_eq!(upstream.served(), 2);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let (base, upstream) = spawn_upstream().await;
    let (client, store) = cached_client(&base).await;

    client
        .request(HttpRequest::get("/zen").cache(enabled()))
        .await
        .unwrap();
    client.clear_cache();
    client
        .request(HttpRequest::get("/zen").cache(enabled()))
        .await
        .unwrap();

    assert_eq!(upstream.served(), 2);
    assert_eq!(store.stats().misses, 2);
    store.shutdown();
}
