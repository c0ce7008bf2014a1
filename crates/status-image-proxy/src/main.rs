//! Status Image Proxy - caching relay for HTTP status code images
//!
//! Serves `GET /<code>` from a local disk cache, filling it from the upstream
//! origin on a miss. `PUT` and `DELETE` seed and evict entries by hand.

mod config;
mod error;
mod handlers;
mod server;

use crate::config::ProxyConfig;
use crate::error::Result;
use crate::server::{start_server, ServerState, SharedState};
use clap::Parser;
use file_image_cache::ImageCache;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use upstream_image_fetcher::UpstreamFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ProxyConfig::parse();

    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("status_image_proxy=info".parse()?);

    // Use JSON format for Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Status Image Proxy...");

    // Create cache and fetcher
    let cache = ImageCache::new(config.cache_dir.clone());
    cache.init().await?;
    info!("Cache dir: {:?}", cache.cache_dir());

    let fetcher = UpstreamFetcher::new(config.upstream_origin.as_str(), config.upstream_timeout())?
        .with_max_body_bytes(config.max_body_bytes);
    info!("Upstream: {}", fetcher.origin());
    info!("Upstream timeout: {} seconds", config.upstream_timeout_secs);
    info!("Max image size: {} bytes", config.max_body_bytes);

    let state: SharedState = Arc::new(ServerState::new(cache, fetcher, config.max_body_bytes));

    // Start HTTP server (blocking)
    start_server(state, &config.host, config.port).await?;

    Ok(())
}
