//! Administrative DTOs.

use serde::{Deserialize, Serialize};

/// Outcome of clearing the whole cache.
///
/// Clearing never fails the caller; `keys_removed` is `None` when the
/// backend could not complete the clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCacheReport {
    pub message: String,
    pub keys_removed: Option<u64>,
}

/// Which cache backend this process is using.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatusResponse {
    pub backend: String,
    pub networked: bool,
    /// `None` means entries are stored without expiry.
    pub default_ttl_secs: Option<u64>,
}
