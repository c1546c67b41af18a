//! Cache store adapter.
//!
//! The backend is chosen once, in [`CacheStore::connect`]: Redis when it is
//! enabled and answers `PING`, otherwise the in-process map for the rest of
//! the process lifetime. Backend errors stop here and come out as explicit
//! outcomes.

use super::{CacheBackend, CachePattern, MemoryCacheBackend, RedisCacheBackend};
use civic_config::CacheConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The stored JSON text.
    Hit(String),
    /// Absent, expired, or the backend failed.
    Miss,
}

impl Lookup {
    /// Returns the stored text, if any.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss => None,
        }
    }

    /// Returns true for a hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Result of a `set` or `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The backend accepted the write.
    Applied,
    /// The backend failed; the write did not happen.
    Skipped,
}

impl WriteOutcome {
    /// Returns true if the write reached the backend.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Result of a pattern clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The number of keys removed.
    Cleared(u64),
    /// The backend failed part way or up front. Keys deleted before the
    /// failure stay deleted.
    Failed,
}

impl ClearOutcome {
    /// Returns true if the clear ran to completion.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Cleared(_))
    }
}

/// The key-value store adapter.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
}

impl CacheStore {
    /// Selects the backend for this process.
    ///
    /// Never fails: a disabled cache or an unreachable server yields the
    /// in-memory fallback. There is no later reconnect.
    pub async fn connect(config: &CacheConfig) -> Self {
        if !config.enabled {
            info!("Redis cache disabled, using in-memory cache");
            return Self::in_memory();
        }

        match RedisCacheBackend::connect(config).await {
            Ok(redis) => {
                info!("Using Redis cache at {}", config.url);
                Self::with_backend(Arc::new(redis))
            }
            Err(e) => {
                warn!("Redis unavailable ({}), falling back to in-memory cache", e);
                Self::in_memory()
            }
        }
    }

    /// A store over a fresh in-memory map.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryCacheBackend::new()))
    }

    /// A store over an explicit backend.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Name of the active backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Returns true when the networked backend is in use.
    #[must_use]
    pub fn is_networked(&self) -> bool {
        self.backend.is_networked()
    }

    /// Looks up `key`. Backend failures are reported as a miss.
    pub async fn get(&self, key: &str) -> Lookup {
        match self.backend.get_raw(key).await {
            Ok(Some(value)) => Lookup::Hit(value),
            Ok(None) => Lookup::Miss,
            Err(e) => {
                warn!("Cache get failed for key '{}': {}", key, e);
                Lookup::Miss
            }
        }
    }

    /// Stores `value` under `key`; `None` means no expiry.
    pub async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> WriteOutcome {
        match self.backend.set_raw(key, value, ttl).await {
            Ok(()) => WriteOutcome::Applied,
            Err(e) => {
                warn!("Cache set failed for key '{}': {}", key, e);
                WriteOutcome::Skipped
            }
        }
    }

    /// Removes `key`. Deleting an absent key is still `Applied`.
    pub async fn delete(&self, key: &str) -> WriteOutcome {
        match self.backend.delete(key).await {
            Ok(existed) => {
                debug!("Cache delete for key '{}' (existed: {})", key, existed);
                WriteOutcome::Applied
            }
            Err(e) => {
                warn!("Cache delete failed for key '{}': {}", key, e);
                WriteOutcome::Skipped
            }
        }
    }

    /// Removes every key matching `pattern`.
    pub async fn scan_and_delete(&self, pattern: &CachePattern) -> ClearOutcome {
        match self.backend.delete_pattern(pattern).await {
            Ok(deleted) => ClearOutcome::Cleared(deleted),
            Err(e) => {
                warn!("Cache clear failed for pattern '{}': {}", pattern, e);
                ClearOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cache::{CacheOps, Expiry, DEFAULT_TTL};
    use async_trait::async_trait;
    use civic_core::{CivicError, CivicResult};

    /// A backend whose every call fails, standing in for a dropped connection.
    pub(crate) struct FailingBackend;

    #[async_trait]
    impl CacheBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn get_raw(&self, _key: &str) -> CivicResult<Option<String>> {
            Err(CivicError::Cache("connection reset".to_string()))
        }

        async fn set_raw(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> CivicResult<()> {
            Err(CivicError::Cache("connection reset".to_string()))
        }

        async fn delete(&self, _key: &str) -> CivicResult<bool> {
            Err(CivicError::Cache("connection reset".to_string()))
        }

        async fn delete_pattern(&self, _pattern: &CachePattern) -> CivicResult<u64> {
            Err(CivicError::Cache("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_backend_errors_become_outcomes() {
        let store = CacheStore::with_backend(Arc::new(FailingBackend));

        assert_eq!(store.get("k").await, Lookup::Miss);
        assert_eq!(store.set("k", "1", None).await, WriteOutcome::Skipped);
        assert_eq!(store.delete("k").await, WriteOutcome::Skipped);
        assert_eq!(store.scan_and_delete(&CachePattern::all()).await, ClearOutcome::Failed);
    }

    #[tokio::test]
    async fn test_disabled_config_selects_memory() {
        let store = CacheStore::connect(&CacheConfig::disabled()).await;

        assert_eq!(store.backend_name(), "memory");
        assert!(!store.is_networked());
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        let config = CacheConfig {
            url: "redis://127.0.0.1:1/0".to_string(),
            ..CacheConfig::default()
        };

        let store = CacheStore::connect(&config).await;

        assert_eq!(store.backend_name(), "memory");
        assert_eq!(store.set("ns:a", "1", None).await, WriteOutcome::Applied);
        assert_eq!(store.get("ns:a").await, Lookup::Hit("1".to_string()));
        assert_eq!(store.delete("ns:a").await, WriteOutcome::Applied);
        assert_eq!(store.get("ns:a").await, Lookup::Miss);

        let cache = CacheOps::with_default_ttl(Arc::new(store), Some(DEFAULT_TTL));
        for key in ["ns:a", "ns:b", "other:c"] {
            cache.set(key, "value", Expiry::Default).await.unwrap();
        }

        let outcome = cache.clear_cache_pattern(&"ns:*".parse().unwrap()).await;

        assert_eq!(outcome, ClearOutcome::Cleared(2));
        assert_eq!(cache.get::<String>("ns:a").await, None);
        assert_eq!(cache.get::<String>("ns:b").await, None);
        assert_eq!(cache.get::<String>("other:c").await.as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_scan_and_delete_reports_count() {
        let store = CacheStore::in_memory();
        store.set("ns:a", "1", None).await;
        store.set("ns:b", "2", None).await;
        store.set("other:c", "3", None).await;

        let outcome = store.scan_and_delete(&"ns:*".parse().unwrap()).await;

        assert_eq!(outcome, ClearOutcome::Cleared(2));
        assert!(store.get("other:c").await.is_hit());
    }
}
