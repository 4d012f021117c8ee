//! Cached Client demo
//!
//! Fetches every URL given on the command line twice through a caching
//! client, then prints the cache statistics as JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cached_client::{Client, Config, HttpRequest, MemoryCache, RequestCacheOptions};

/// Main entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the memory cache and a client bound to it
/// 4. Fetch each URL twice; the second fetch is served from the cache
/// 5. Print statistics and stop the background sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cached_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        bail!("usage: cached_client <url-or-path>...");
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}s, cleanup_interval={}s",
        config.max_entries, config.default_ttl, config.cleanup_interval
    );

    let store = Arc::new(MemoryCache::new(config.memory_options()));
    let client = Client::with_cache(
        config.base_url.clone().unwrap_or_default(),
        config.cache_config(store.clone()),
    );

    for url in &urls {
        for attempt in 1..=2 {
            // Zero TTL defers to DEFAULT_TTL
            let request = HttpRequest::get(url).cache(RequestCacheOptions::enabled(Duration::ZERO));
            let response = client
                .request(request)
                .await
                .with_context(|| format!("request to {url} failed"))?;
            info!(
                url = %url,
                attempt,
                status = response.status_code,
                bytes = response.body.len(),
                from_cache = response.from_cache,
                content_type = response.header("content-type").unwrap_or("-"),
                "Fetched"
            );
        }
    }

    if let Some(stats) = client.cache_stats() {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        info!("Lookups: {}, hit rate: {:.2}", stats.lookups(), stats.hit_rate());
    }

    store.shutdown();
    Ok(())
}
