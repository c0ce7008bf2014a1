//! Image retrieval from the upstream origin

use crate::error::{Result, UpstreamError};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ORIGIN: &str = "https://http.cat";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const USER_AGENT: &str = concat!("upstream-image-fetcher/", env!("CARGO_PKG_VERSION"));

/// Result of a completed upstream exchange
#[derive(Debug, PartialEq, Eq)]
pub enum UpstreamImage {
    /// Origin answered 200; the full response body
    Found(Vec<u8>),
    /// Origin answered with any other status
    NotFound(StatusCode),
}

/// HTTP client for fetching images from the fixed origin
pub struct UpstreamFetcher {
    client: Client,
    origin: String,
    /// Largest image accepted from the origin, in bytes
    max_body_bytes: usize,
}

impl UpstreamFetcher {
    /// Create a fetcher for `origin` whose requests give up after `timeout`
    pub fn new(origin: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Refuse upstream bodies larger than `limit` bytes
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// URL of the image for `code` on the origin
    pub fn image_url(&self, code: &str) -> String {
        format!("{}/{}.jpg", self.origin, code)
    }

    /// Fetch the image for `code`. Makes exactly one request, no retries.
    pub async fn fetch(&self, code: &str) -> Result<UpstreamImage> {
        let url = self.image_url(code);
        debug!(url = %url, "Fetching image from upstream");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Upstream request failed");
            e
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(url = %url, status = %status, "Upstream has no image");
            return Ok(UpstreamImage::NotFound(status));
        }

        let data = self.read_body(response).await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read upstream body");
            e
        })?;

        debug!(url = %url, size = data.len(), "Fetched image from upstream");
        Ok(UpstreamImage::Found(data))
    }

    /// Collect the body chunk by chunk, stopping once it passes the limit
    async fn read_body(&self, mut response: Response) -> Result<Vec<u8>> {
        let limit = self.max_body_bytes;
        let too_large = || UpstreamError::TooLarge { limit };

        let declared = response.content_length().unwrap_or(0);
        if declared > limit as u64 {
            return Err(too_large());
        }

        let mut data = Vec::with_capacity(declared as usize);
        while let Some(chunk) = response.chunk().await? {
            if data.len() + chunk.len() > limit {
                return Err(too_large());
            }
            data.extend_from_slice(&chunk);
        }
        Ok(data)
    }
}
