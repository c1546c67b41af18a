//! Redis-based cache implementation.

use super::{CacheBackend, CachePattern};
use async_trait::async_trait;
use civic_config::CacheConfig;
use civic_core::{CivicError, CivicResult};
use deadpool_redis::{
    redis::{self, AsyncCommands},
    Config, Pool, Runtime,
};
use std::time::Duration;
use tracing::{debug, info};

/// Keys requested per `SCAN` round trip.
pub const SCAN_BATCH_SIZE: usize = 100;

/// How long to wait for a new connection before giving up.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-based cache backend.
#[derive(Clone)]
pub struct RedisCacheBackend {
    /// Redis connection pool.
    pool: Pool,
}

impl RedisCacheBackend {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a pool from configuration and verifies the server answers
    /// `PING`.
    pub async fn connect(config: &CacheConfig) -> CivicResult<Self> {
        info!("Creating Redis connection pool...");

        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| CivicError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size as usize)
            .runtime(Runtime::Tokio1)
            .create_timeout(Some(CONNECT_TIMEOUT))
            .wait_timeout(Some(CONNECT_TIMEOUT))
            .build()
            .map_err(|e| CivicError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        let backend = Self::new(pool);
        backend.ping().await?;

        info!("Redis connection pool created successfully");
        Ok(backend)
    }

    /// Round-trips a `PING`.
    pub async fn ping(&self) -> CivicResult<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|e| CivicError::Cache(format!("PING failed: {}", e)))?;
        Ok(())
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> CivicResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CivicError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn is_networked(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> CivicResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CivicError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CivicResult<()> {
        let mut conn = self.get_conn().await?;

        let result = match ttl {
            Some(ttl) => {
                let ttl_secs = ttl.as_secs().max(1);
                debug!("Caching key '{}' with TTL {}s", key, ttl_secs);
                conn.set_ex::<_, _, ()>(key, value, ttl_secs).await
            }
            None => {
                debug!("Caching key '{}' without expiry", key);
                conn.set::<_, _, ()>(key, value).await
            }
        };

        result.map_err(|e| CivicError::Cache(format!("Failed to set key '{}': {}", key, e)))
    }

    async fn delete(&self, key: &str) -> CivicResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CivicError::Cache(format!("Failed to delete key '{}': {}", key, e)))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &CachePattern) -> CivicResult<u64> {
        if let CachePattern::Exact(key) = pattern {
            return self.delete(key).await.map(u64::from);
        }

        let glob = pattern.to_redis_glob();
        let mut conn = self.get_conn().await?;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        // Each batch is deleted as it arrives; a key is either gone or untouched.
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&glob)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut *conn)
                .await
                .map_err(|e| CivicError::Cache(format!("Failed to scan keys: {}", e)))?;

            if !keys.is_empty() {
                let removed: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| CivicError::Cache(format!("Failed to delete keys: {}", e)))?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }
}
