//! Typed cache operations over the store adapter.

use super::{CachePattern, CacheStore, Cached, ClearOutcome, Lookup, WriteOutcome};
use civic_config::CacheConfig;
use civic_core::CivicResult;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default TTL for cached items (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// How long a stored value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// The configured default.
    #[default]
    Default,
    /// A fixed duration.
    After(Duration),
    /// No expiry.
    Never,
}

impl Expiry {
    /// Converts a number of seconds; zero or negative means no expiry.
    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        match u64::try_from(secs) {
            Ok(secs) if secs > 0 => Self::After(Duration::from_secs(secs)),
            _ => Self::Never,
        }
    }
}

/// JSON cache operations.
#[derive(Debug, Clone)]
pub struct CacheOps {
    store: Arc<CacheStore>,
    default_ttl: Option<Duration>,
}

impl CacheOps {
    /// Creates operations using the configured default TTL.
    #[must_use]
    pub fn new(store: Arc<CacheStore>, config: &CacheConfig) -> Self {
        Self::with_default_ttl(store, config.default_ttl())
    }

    /// Creates operations with an explicit default TTL; `None` stores
    /// without expiry.
    #[must_use]
    pub fn with_default_ttl(store: Arc<CacheStore>, default_ttl: Option<Duration>) -> Self {
        Self { store, default_ttl }
    }

    /// The underlying store adapter.
    #[must_use]
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// The TTL applied by [`Expiry::Default`].
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Resolves an expiry to what is sent to the backend.
    #[must_use]
    pub fn ttl_for(&self, expiry: Expiry) -> Option<Duration> {
        match expiry {
            Expiry::Default => self.default_ttl,
            Expiry::After(ttl) if ttl.is_zero() => None,
            Expiry::After(ttl) => Some(ttl),
            Expiry::Never => None,
        }
    }

    /// Reads and decodes `key`.
    ///
    /// Returns `None` on a miss. A stored value that does not decode as `T`
    /// also counts as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let Lookup::Hit(json) = self.store.get(key).await else {
            debug!("Cache miss for key '{}'", key);
            return None;
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                debug!("Cache hit for key '{}'", key);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    /// Encodes and stores `value`.
    ///
    /// Encoding errors are returned; backend errors are reported as
    /// [`WriteOutcome::Skipped`].
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expiry: Expiry,
    ) -> CivicResult<WriteOutcome> {
        let json = serde_json::to_string(value)?;
        Ok(self.store.set(key, &json, self.ttl_for(expiry)).await)
    }

    /// Deletes one key.
    pub async fn delete_cache(&self, key: &str) -> WriteOutcome {
        self.store.delete(key).await
    }

    /// Deletes every key matching `pattern`.
    pub async fn clear_cache_pattern(&self, pattern: &CachePattern) -> ClearOutcome {
        let outcome = self.store.scan_and_delete(pattern).await;
        if let ClearOutcome::Cleared(count) = outcome {
            debug!("Cleared {} cache entries matching '{}'", count, pattern);
        }
        outcome
    }

    /// Deletes every key.
    pub async fn clear_all(&self) -> ClearOutcome {
        let outcome = self.clear_cache_pattern(&CachePattern::all()).await;
        info!("Cache clear-all finished: {:?}", outcome);
        outcome
    }

    /// Starts a memoization wrapper for operations in `namespace`.
    #[must_use]
    pub fn cached(&self, expiry: Expiry, namespace: impl Into<String>) -> Cached {
        Cached::new(self.clone(), expiry, namespace.into())
    }
}
