//! Cache manager for persisting normalized items to disk
//!
//! Provides a `CacheManager` that stores each item as a JSON file named by its
//! identifier. Entries never expire; removing them is left to whoever operates
//! the cache directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::data::Item;

/// Errors that can occur when reading or writing cache entries
///
/// Callers treat all of these as recoverable: a failed read is a miss and a
/// failed write is only logged.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem read or write failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The entry exists but does not hold a serialized item
    #[error("corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The identifier cannot be used as a file name
    #[error("identifier cannot be used as a cache key: {0:?}")]
    InvalidKey(String),
}

/// A successfully read cache entry
#[derive(Debug, Clone)]
pub struct CachedItem {
    /// The decoded item
    pub item: Item,
    /// The entry exactly as stored on disk
    pub bytes: Vec<u8>,
}

/// Manages reading and writing cached items in a single directory
///
/// Layout is flat: one file per identifier, the file name is the identifier
/// itself and the content is the JSON-serialized `Item`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager rooted at the given directory
    ///
    /// The directory does not need to exist yet; it is created on first write.
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Returns the directory backing this cache
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns true if `key` is a single, plain path component
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0'])
    }

    /// Returns the path to the cache file for the given key
    fn cache_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        if !Self::is_valid_key(key) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.cache_dir.join(key))
    }

    /// Reads the cache entry for `key`
    ///
    /// # Returns
    /// * `Ok(Some(CachedItem))` if the entry exists and decodes as an `Item`
    /// * `Ok(None)` if there is no entry
    /// * `Err(CacheError)` if the entry is unreadable or corrupt
    pub async fn read(&self, key: &str) -> Result<Option<CachedItem>, CacheError> {
        let path = self.cache_path(key)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let item: Item = serde_json::from_slice(&bytes)?;
        Ok(Some(CachedItem { item, bytes }))
    }

    /// Writes `item` to the cache entry for `key`, replacing any previous entry
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(CacheError)` if the key is invalid, or directory creation or
    ///   file writing fails
    pub async fn write(&self, key: &str, item: &Item) -> Result<(), CacheError> {
        let path = self.cache_path(key)?;

        let mut json = serde_json::to_vec(item)?;
        json.push(b'\n');

        fs::create_dir_all(&self.cache_dir).await?;
        fs::write(path, json).await?;
        Ok(())
    }
}
