//! Administrative operations.

use crate::cache::{CacheOps, ClearOutcome};
use crate::dto::{CacheStatusResponse, ClearCacheReport};
use tracing::{info, warn};

/// Operational commands for the cache.
#[derive(Debug, Clone)]
pub struct AdminService {
    cache: CacheOps,
}

impl AdminService {
    /// Creates a new admin service.
    #[must_use]
    pub fn new(cache: CacheOps) -> Self {
        Self { cache }
    }

    /// Deletes every cache entry.
    ///
    /// Always reports success. Entries the backend failed to delete expire
    /// on their own.
    pub async fn clear_cache(&self) -> ClearCacheReport {
        let keys_removed = match self.cache.clear_all().await {
            ClearOutcome::Cleared(count) => {
                info!("Cache cleared by administrator ({} keys)", count);
                Some(count)
            }
            ClearOutcome::Failed => {
                warn!("Cache clear requested by administrator did not complete");
                None
            }
        };

        ClearCacheReport {
            message: "Cache cleared".to_string(),
            keys_removed,
        }
    }

    /// Reports the active backend.
    #[must_use]
    pub fn cache_status(&self) -> CacheStatusResponse {
        let store = self.cache.store();
        CacheStatusResponse {
            backend: store.backend_name().to_string(),
            networked: store.is_networked(),
            default_ttl_secs: self.cache.default_ttl().map(|ttl| ttl.as_secs()),
        }
    }
}
