//! Error types for the upstream fetcher

use std::fmt;

#[derive(Debug)]
pub enum UpstreamError {
    /// Connection failure, timeout or body read error
    Http(Box<reqwest::Error>),
    /// Origin sent more than the configured number of bytes
    TooLarge { limit: usize },
    /// The HTTP client could not be constructed
    Client(String),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        match self {
            UpstreamError::Http(err) => err.is_timeout(),
            UpstreamError::TooLarge { .. } | UpstreamError::Client(_) => false,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Http(err) => write!(f, "HTTP error: {}", err),
            UpstreamError::TooLarge { limit } => {
                write!(f, "Upstream body exceeds {} bytes", limit)
            }
            UpstreamError::Client(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Http(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;
