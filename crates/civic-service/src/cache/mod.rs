//! Caching infrastructure for the service layer.
//!
//! Layered bottom-up:
//!
//! - [`CacheBackend`]: Redis ([`RedisCacheBackend`]) or the in-process
//!   fallback ([`MemoryCacheBackend`]).
//! - [`CacheStore`]: picks the backend once at start-up and absorbs its
//!   failures into [`Lookup`], [`WriteOutcome`] and [`ClearOutcome`].
//! - [`CacheOps`]: JSON encoding, default TTL, pattern clears.
//! - [`Memoized`]: cache-aside wrapper around a read operation.

mod backend;
pub mod cache_keys;
mod memoize;
mod memory_cache;
mod operations;
mod redis_cache;
pub(crate) mod store;

pub use backend::CacheBackend;
pub use cache_keys::{CacheKey, CachePattern};
pub use memoize::{Cached, Memoized};
pub use memory_cache::MemoryCacheBackend;
pub use operations::{CacheOps, Expiry, DEFAULT_TTL};
pub use redis_cache::{RedisCacheBackend, SCAN_BATCH_SIZE};
pub use store::{CacheStore, ClearOutcome, Lookup, WriteOutcome};
