//! In-process fallback cache.

use super::{CacheBackend, CachePattern};
use async_trait::async_trait;
use civic_core::CivicResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// In-memory cache used when Redis is disabled or unreachable.
///
/// Expiry is not enforced: entries live until they are deleted or the
/// process exits. The TTL passed to [`CacheBackend::set_raw`] is ignored.
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCacheBackend {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_raw(&self, key: &str) -> CivicResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str, _ttl: Option<Duration>) -> CivicResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CivicResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn delete_pattern(&self, pattern: &CachePattern) -> CivicResult<u64> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !pattern.matches(key));
        let deleted = (before - entries.len()) as u64;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCacheBackend::new();

        cache.set_raw("k", "\"v\"", None).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("\"v\""));

        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert!(cache.get_raw("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCacheBackend::new();

        cache.set_raw("k", "1", None).await.unwrap();
        cache.set_raw("k", "2", Some(Duration::from_secs(1))).await.unwrap();

        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_pattern_matches_literal_prefix() {
        let cache = MemoryCacheBackend::new();
        for key in ["ns:a", "ns:b", "other:c", "ns"] {
            cache.set_raw(key, "1", None).await.unwrap();
        }

        let deleted = cache.delete_pattern(&CachePattern::prefix("ns:")).await.unwrap();

        assert_eq!(deleted, 2);
        assert!(cache.get_raw("other:c").await.unwrap().is_some());
        assert!(cache.get_raw("ns").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_pattern_wildcard_only_clears_everything() {
        let cache = MemoryCacheBackend::new();
        cache.set_raw("a", "1", None).await.unwrap();
        cache.set_raw("b", "2", None).await.unwrap();

        let deleted = cache.delete_pattern(&CachePattern::all()).await.unwrap();

        assert_eq!(deleted, 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_question_mark_is_literal() {
        let cache = MemoryCacheBackend::new();
        cache.set_raw("a?:1", "1", None).await.unwrap();
        cache.set_raw("ab:1", "1", None).await.unwrap();

        let deleted = cache.delete_pattern(&CachePattern::prefix("a?")).await.unwrap();

        assert_eq!(deleted, 1);
        assert!(cache.get_raw("ab:1").await.unwrap().is_some());
    }
}
