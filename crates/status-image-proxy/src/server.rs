//! HTTP server and request dispatch
//!
//! One resource family, `/<code>`. The request target is validated as sent,
//! before any decoding and before anything else happens; GET, PUT and DELETE
//! are routed to their handlers and every other method is refused.

use crate::error::ProxyError;
use crate::handlers::{handle_evict, handle_fetch, handle_store, HandlerResult};
use axum::{
    body::Body,
    extract::State,
    http::{Method, Uri},
    Router,
};
use file_image_cache::{ImageCache, ImageKey};
use std::sync::Arc;
use tracing::{debug, info};
use upstream_image_fetcher::UpstreamFetcher;

/// Shared state for the HTTP server
pub struct ServerState {
    pub cache: ImageCache,
    pub fetcher: UpstreamFetcher,
    /// Largest PUT body accepted, in bytes
    pub max_body_bytes: usize,
}

impl ServerState {
    pub fn new(cache: ImageCache, fetcher: UpstreamFetcher, max_body_bytes: usize) -> Self {
        Self {
            cache,
            fetcher,
            max_body_bytes,
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router.
///
/// Every request reaches `dispatch`; there is no route table to match
/// against, since the key check has to see the raw target.
pub fn create_router(state: SharedState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

/// Bind `host:port` and serve until the listener fails
pub async fn start_server(state: SharedState, host: &str, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("Starting HTTP server on {}", listener.local_addr()?);

    axum::serve(listener, router).await
}

async fn dispatch(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    body: Body,
) -> HandlerResult {
    let key = key_from_target(&uri)?;

    debug!(method = %method, key = %key, "Dispatching request");

    match method {
        Method::GET => handle_fetch(&state, &key).await,
        Method::PUT => handle_store(&state, &key, body).await,
        Method::DELETE => handle_evict(&state, &key).await,
        other => Err(ProxyError::MethodNotSupported(other)),
    }
}

/// The key is everything after the leading `/` of the target as sent, query
/// included, so `/%32%30%30`, `/12/3` and `/200?x=1` are all rejected.
fn key_from_target(uri: &Uri) -> Result<ImageKey, ProxyError> {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let raw = target.strip_prefix('/').unwrap_or(target);

    raw.parse().map_err(|_| {
        debug!(target = %target, "Rejecting request target");
        ProxyError::InvalidKey(raw.to_string())
    })
}
