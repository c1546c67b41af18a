//! Storage backend trait behind the cache adapter.

use super::CachePattern;
use async_trait::async_trait;
use civic_core::CivicResult;
use std::time::Duration;

/// A key-value store holding JSON text.
///
/// Implementations report transport failures as `CivicError::Cache`;
/// [`CacheStore`](super::CacheStore) is what turns those into misses and
/// skipped writes.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name used in logs and status reports.
    fn name(&self) -> &'static str;

    /// Returns true for a backend reached over the network.
    fn is_networked(&self) -> bool {
        false
    }

    /// Get a raw JSON value.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> CivicResult<Option<String>>;

    /// Set a raw JSON value, replacing any previous one. `None` stores the
    /// value without expiry.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CivicResult<()>;

    /// Delete a value.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> CivicResult<bool>;

    /// Delete every key matching `pattern`.
    ///
    /// Returns the number of keys deleted.
    async fn delete_pattern(&self, pattern: &CachePattern) -> CivicResult<u64>;
}
