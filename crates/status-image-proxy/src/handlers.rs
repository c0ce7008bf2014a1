//! Per-method handlers for a validated image key

use crate::error::ProxyError;
use crate::server::ServerState;
use axum::body::Body;
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use file_image_cache::ImageKey;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, info, warn};
use upstream_image_fetcher::UpstreamImage;

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");
const IMAGE_JPEG: &str = "image/jpeg";

pub type HandlerResult = Result<Response, ProxyError>;

/// GET: serve from cache, or fetch from upstream and write through
pub async fn handle_fetch(state: &ServerState, key: &ImageKey) -> HandlerResult {
    match state.cache.read(key).await {
        Ok(Some(data)) => {
            info!(key = %key, size = data.len(), "Serving image from cache");
            return Ok(image_response(data, "HIT"));
        }
        Ok(None) => {}
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read cached image, treating as miss");
        }
    }

    info!(
        key = %key,
        url = %state.fetcher.image_url(key.as_str()),
        "Cache miss, fetching from upstream"
    );

    let upstream = state
        .fetcher
        .fetch(key.as_str())
        .await
        .map_err(|source| {
            if source.is_timeout() {
                warn!(key = %key, "Upstream fetch timed out");
            }
            ProxyError::Transport {
                key: key.clone(),
                source,
            }
        })?;

    match upstream {
        UpstreamImage::Found(data) => {
            state
                .cache
                .write(key, &data)
                .await
                .map_err(|source| ProxyError::Storage {
                    key: key.clone(),
                    source,
                })?;
            info!(key = %key, size = data.len(), "Cached image from upstream");
            Ok(image_response(data, "MISS"))
        }
        UpstreamImage::NotFound(status) => {
            info!(key = %key, upstream_status = %status, "Upstream has no image");
            Err(ProxyError::NotFound(key.clone()))
        }
    }
}

/// PUT: replace the entry with the request body
pub async fn handle_store(state: &ServerState, key: &ImageKey, body: Body) -> HandlerResult {
    let limit = state.max_body_bytes;
    let data = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                ProxyError::PayloadTooLarge { limit }
            } else {
                ProxyError::BodyRead(e.to_string())
            }
        })?
        .to_bytes();

    let storage_error = |source| ProxyError::Storage {
        key: key.clone(),
        source,
    };

    let existed = state.cache.exists(key).await.map_err(storage_error)?;
    state.cache.write(key, &data).await.map_err(storage_error)?;

    if existed {
        info!(key = %key, size = data.len(), "Image updated manually");
        Ok((StatusCode::OK, format!("Image for code {} updated", key)).into_response())
    } else {
        info!(key = %key, size = data.len(), "Image created manually");
        Ok((StatusCode::CREATED, format!("Image for code {} created", key)).into_response())
    }
}

/// DELETE: remove the entry
pub async fn handle_evict(state: &ServerState, key: &ImageKey) -> HandlerResult {
    let removed = state
        .cache
        .delete(key)
        .await
        .map_err(|source| ProxyError::Storage {
            key: key.clone(),
            source,
        })?;

    if !removed {
        debug!(key = %key, "No cached image to delete");
        return Err(ProxyError::NotFound(key.clone()));
    }

    info!(key = %key, "Image deleted from cache");
    Ok((
        StatusCode::OK,
        format!("Image for code {} deleted from cache", key),
    )
        .into_response())
}

fn image_response(data: Vec<u8>, cache_status: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, IMAGE_JPEG), (X_CACHE, cache_status)],
        data,
    )
        .into_response()
}
