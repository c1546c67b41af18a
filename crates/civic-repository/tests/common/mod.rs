//! Common test infrastructure for database integration tests.

use civic_config::DatabaseConfig;
use civic_core::NewServiceRequest;
use civic_repository::{create_pool, DatabasePool};
use std::sync::Arc;

/// Test database wrapper.
///
/// Each instance owns a private in-memory SQLite database with the schema
/// already migrated.
pub struct TestDatabase {
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a new, empty test database.
    pub async fn new() -> Self {
        let pool = create_pool(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to create in-memory database");

        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }
}

/// A submission with every required field filled in.
pub fn submission(title: &str) -> NewServiceRequest {
    NewServiceRequest::new(title, "Descricao do problema", "pavimentacao", "Centro")
}
