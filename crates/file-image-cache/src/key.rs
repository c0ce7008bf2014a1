//! Cache keys

use crate::error::CacheError;
use std::fmt;
use std::str::FromStr;

/// A validated cache key: one or more ASCII digits.
///
/// The digits are kept verbatim rather than parsed into an integer, so there
/// is no upper bound and `007` addresses a different entry than `7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the entry for this key inside the cache directory
    pub fn file_name(&self) -> String {
        format!("{}.jpg", self.0)
    }
}

impl FromStr for ImageKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(CacheError::InvalidKey(s.to_string()))
        }
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
