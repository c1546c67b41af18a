//! Database connection pool management.

use civic_config::DatabaseConfig;
use civic_core::{CivicError, CivicResult};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tracing::{info, warn};

/// Database pool wrapper.
#[derive(Clone)]
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn new(config: &DatabaseConfig) -> CivicResult<Self> {
        info!("Connecting to SQLite database...");

        let mut options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout());

        // An in-memory database lives exactly as long as its connection.
        if config.url.contains(":memory:") {
            options = options.min_connections(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = options.connect(&config.url).await.map_err(|e| {
            warn!("Failed to connect to database: {}", e);
            CivicError::Database(format!("Failed to connect: {}", e))
        })?;

        info!("SQLite connection pool established");
        Ok(Self { pool })
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn inner(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database connection is healthy.
    pub async fn health_check(&self) -> CivicResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CivicError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Runs database migrations.
    pub async fn run_migrations(&self) -> CivicResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CivicError::Database(format!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Closes the database pool.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Creates a shared database pool, running migrations when configured to.
pub async fn create_pool(config: &DatabaseConfig) -> CivicResult<Arc<DatabasePool>> {
    let pool = DatabasePool::new(config).await?;
    if config.run_migrations {
        pool.run_migrations().await?;
    }
    Ok(Arc::new(pool))
}
