//! File-based image storage

use crate::error::Result;
use crate::key::ImageKey;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, info, warn};

const TEMP_SUFFIX: &str = ".tmp";

/// Image cache storing one `<key>.jpg` file per entry under a single directory
pub struct ImageCache {
    /// Directory where cached images are stored
    cache_dir: PathBuf,
    /// Sequence number for temporary file names
    temp_seq: AtomicU64,
}

impl ImageCache {
    /// Create a new image cache rooted at `cache_dir`
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Directory holding the cached images
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Initialize the cache by ensuring the cache directory exists.
    ///
    /// Temporary files left behind by an interrupted write are removed.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;
        let swept = self.sweep_temp_files().await?;
        info!(cache_dir = ?self.cache_dir, swept, "Cache initialized");
        Ok(())
    }

    /// Location of the entry for `key`
    pub fn path_for(&self, key: &ImageKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    /// Check whether an entry for `key` is persisted
    pub async fn exists(&self, key: &ImageKey) -> Result<bool> {
        match fs::metadata(self.path_for(key)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the entry for `key`, `None` if there is none
    pub async fn read(&self, key: &ImageKey) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)).await {
            Ok(data) => {
                debug!(key = %key, size = data.len(), "Cache hit");
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Store `data` under `key`, replacing any previous content
    pub async fn write(&self, key: &ImageKey, data: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = self.temp_path();

        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(key = %key, size = data.len(), "Stored image");
        Ok(())
    }

    /// Remove the entry for `key`. Returns `false` if there was none.
    pub async fn delete(&self, key: &ImageKey) -> Result<bool> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => {
                debug!(key = %key, "Deleted image");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Unique per write, and no longer than any final name the key permits
    fn temp_path(&self) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        self.cache_dir
            .join(format!(".{}.{}{}", seq, std::process::id(), TEMP_SUFFIX))
    }

    async fn sweep_temp_files(&self) -> Result<usize> {
        let mut swept = 0;
        let mut dir = fs::read_dir(&self.cache_dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_temp_file_name(name) {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => swept += 1,
                Err(e) => warn!(file = name, error = %e, "Failed to remove stale temp file"),
            }
        }

        Ok(swept)
    }
}

fn is_temp_file_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}
