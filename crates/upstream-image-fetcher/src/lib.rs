//! Upstream Image Fetcher
//!
//! Retrieves `<origin>/<code>.jpg` from a single fixed origin and reports one
//! of three outcomes: the image, "not found" (any non-200 status), or a
//! transport failure (connection error, timeout, truncated or oversized body).

pub mod error;
pub mod fetcher;

pub use error::{Result, UpstreamError};
pub use fetcher::{
    UpstreamFetcher, UpstreamImage, DEFAULT_MAX_BODY_BYTES, DEFAULT_ORIGIN, DEFAULT_TIMEOUT,
};
