//! File-based image cache keyed by numeric codes
//!
//! Stores one blob per key directly under a single cache directory. Writes go
//! through a temporary sibling file and an atomic rename, so readers never see
//! a partially written image and concurrent writers cannot interleave.

mod cache;
mod error;
mod key;

pub use cache::ImageCache;
pub use error::{CacheError, Result};
pub use key::ImageKey;
