//! Error types for the status image proxy

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use file_image_cache::{CacheError, ImageKey};
use std::fmt;
use tracing::error;
use upstream_image_fetcher::UpstreamError;

/// Failure while handling a single request. Every variant becomes a
/// plain-text response; none of them outlives the request.
#[derive(Debug)]
pub enum ProxyError {
    InvalidKey(String),
    MethodNotSupported(Method),
    /// No cache entry, or no upstream image, for the key
    NotFound(ImageKey),
    Transport {
        key: ImageKey,
        source: UpstreamError,
    },
    Storage {
        key: ImageKey,
        source: CacheError,
    },
    PayloadTooLarge {
        limit: usize,
    },
    BodyRead(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidKey(_) | ProxyError::BodyRead(_) => StatusCode::BAD_REQUEST,
            ProxyError::MethodNotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::Transport { .. } | ProxyError::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Text sent to the client. Internal causes stay in the logs.
    fn client_message(&self) -> String {
        match self {
            ProxyError::InvalidKey(_) => "Invalid HTTP status code".to_string(),
            ProxyError::MethodNotSupported(_) => "Method not supported".to_string(),
            ProxyError::NotFound(key) => format!("Image for code {} not found", key),
            ProxyError::Transport { .. } => "Failed to fetch image from upstream".to_string(),
            ProxyError::Storage { .. } => "Failed to access image cache".to_string(),
            ProxyError::PayloadTooLarge { limit } => {
                format!("Image exceeds the {} byte limit", limit)
            }
            ProxyError::BodyRead(_) => "Failed to read request body".to_string(),
        }
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::InvalidKey(raw) => write!(f, "Invalid code: {:?}", raw),
            ProxyError::MethodNotSupported(method) => write!(f, "Method not supported: {}", method),
            ProxyError::NotFound(key) => write!(f, "Image not found: {}", key),
            ProxyError::Transport { key, source } => {
                write!(f, "Upstream fetch for {} failed: {}", key, source)
            }
            ProxyError::Storage { key, source } => {
                write!(f, "Cache storage for {} failed: {}", key, source)
            }
            ProxyError::PayloadTooLarge { limit } => {
                write!(f, "Request body exceeds {} bytes", limit)
            }
            ProxyError::BodyRead(msg) => write!(f, "Failed to read request body: {}", msg),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Transport { source, .. } => Some(source),
            ProxyError::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, self.client_message()).into_response()
    }
}

/// Failure that prevents the proxy from starting
#[derive(Debug)]
pub enum StartupError {
    Cache(CacheError),
    Upstream(UpstreamError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Cache(err) => write!(f, "Cache error: {}", err),
            StartupError::Upstream(err) => write!(f, "Upstream error: {}", err),
            StartupError::Io(err) => write!(f, "IO error: {}", err),
            StartupError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Cache(err) => Some(err),
            StartupError::Upstream(err) => Some(err),
            StartupError::Io(err) => Some(err.as_ref()),
            StartupError::Config(_) => None,
        }
    }
}

impl From<CacheError> for StartupError {
    fn from(err: CacheError) -> Self {
        StartupError::Cache(err)
    }
}

impl From<UpstreamError> for StartupError {
    fn from(err: UpstreamError) -> Self {
        StartupError::Upstream(err)
    }
}

impl From<std::io::Error> for StartupError {
    fn from(err: std::io::Error) -> Self {
        StartupError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for StartupError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        StartupError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StartupError>;
