//! Cache-or-fetch lookup service
//!
//! `LookupService` turns an identifier into a serialized normalized record,
//! serving it from the file cache when possible and from the catalog
//! otherwise. Cache problems are never surfaced to the caller.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::catalog::{normalize, Catalog, CatalogError, LookupRequest};
use crate::data::{Item, ResponseGroup};

/// Errors surfaced to callers of [`LookupService::lookup`]
#[derive(Debug, Error)]
pub enum LookupError {
    /// The identifier is missing or blank
    #[error("invalid item id: {0}")]
    BadRequest(String),

    /// The request parameters could not be decoded
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// The catalog call failed
    #[error("failed to get item information: {0}")]
    Upstream(#[source] CatalogError),

    /// The catalog answered but matched nothing
    #[error("failed to get item from response: empty catalog items")]
    EmptyResult,

    /// The normalized record could not be serialized
    #[error("failed to marshal item to json: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl LookupError {
    /// HTTP status reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LookupError::BadRequest(_) | LookupError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            LookupError::Upstream(_) | LookupError::EmptyResult | LookupError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Where a lookup result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Catalog,
}

/// A successful lookup
#[derive(Debug, Clone)]
pub struct Lookup {
    /// The normalized record
    pub item: Item,
    /// JSON body to return; for cache hits, the entry exactly as stored
    pub body: Vec<u8>,
    pub source: LookupSource,
}

/// Request handler core shared by every connection
///
/// Cloning is cheap: the catalog client is shared behind an `Arc` and the
/// cache is just a directory path. No mutable state is shared between
/// requests.
#[derive(Clone)]
pub struct LookupService {
    catalog: Arc<dyn Catalog>,
    cache: Option<CacheManager>,
    response_group: ResponseGroup,
    cache_writes: TaskTracker,
}

impl LookupService {
    /// Creates a service; `cache` of `None` disables caching entirely
    pub fn new(
        catalog: Arc<dyn Catalog>,
        cache: Option<CacheManager>,
        response_group: ResponseGroup,
    ) -> Self {
        Self {
            catalog,
            cache,
            response_group,
            cache_writes: TaskTracker::new(),
        }
    }

    /// Returns true if lookups read from and write to a cache directory
    pub fn caching_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Looks up `raw_id`, serving from the cache when an entry exists
    ///
    /// The identifier is trimmed before use. On a catalog hit with caching
    /// enabled, the cache entry is written in the background and the result
    /// of that write never affects the returned value.
    pub async fn lookup(&self, raw_id: &str) -> Result<Lookup, LookupError> {
        let item_id = raw_id.trim();
        if item_id.is_empty() {
            return Err(LookupError::BadRequest(raw_id.to_string()));
        }

        let cache = self.cache_for(item_id);

        if let Some(cache) = cache {
            match cache.read(item_id).await {
                Ok(Some(cached)) => {
                    info!(item_id, "hit cache");
                    return Ok(Lookup {
                        item: cached.item,
                        body: cached.bytes,
                        source: LookupSource::Cache,
                    });
                }
                Ok(None) => debug!(item_id, "cache miss"),
                Err(e) => warn!(item_id, error = %e, "failed to get a cache"),
            }
        }

        let request = LookupRequest::asin(item_id, self.response_group);
        let items = self
            .catalog
            .item_lookup(&request)
            .await
            .map_err(LookupError::Upstream)?;
        let first = items.first().ok_or(LookupError::EmptyResult)?;

        let item = normalize(first, item_id);
        let body = serde_json::to_vec(&item).map_err(LookupError::Serialization)?;

        if let Some(cache) = cache {
            self.spawn_cache_write(cache.clone(), item_id.to_string(), item.clone());
        }

        Ok(Lookup {
            item,
            body,
            source: LookupSource::Catalog,
        })
    }

    /// Waits for every cache write spawned so far to finish
    pub async fn flush_cache_writes(&self) {
        self.cache_writes.close();
        self.cache_writes.wait().await;
        self.cache_writes.reopen();
    }

    fn cache_for(&self, item_id: &str) -> Option<&CacheManager> {
        let cache = self.cache.as_ref()?;
        if CacheManager::is_valid_key(item_id) {
            Some(cache)
        } else {
            debug!(item_id, "identifier is not usable as a cache key, skipping cache");
            None
        }
    }

    fn spawn_cache_write(&self, cache: CacheManager, item_id: String, item: Item) {
        self.cache_writes.spawn(async move {
            match cache.write(&item_id, &item).await {
                Ok(()) => debug!(item_id = %item_id, "saved cache"),
                Err(e) => warn!(item_id = %item_id, error = %e, "failed to save a cache"),
            }
        });
    }
}
