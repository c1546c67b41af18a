//! Dependency wiring.
//!
//! Components are built once per process and handed to each other through
//! constructors:
//!
//! ```text
//! DatabasePool ─► SqliteServiceRequestRepository ─┐
//!                                                 ├─► ServiceRequestServiceImpl
//! CacheStore ─► CacheOps ─────────────────────────┤
//!                                                 └─► AdminService
//! ```

use civic_config::{AppConfig, CacheConfig, DatabaseConfig};
use civic_core::CivicResult;
use civic_repository::{create_pool, DatabasePool, SqliteServiceRequestRepository};
use civic_service::{AdminService, CacheOps, CacheStore, ServiceRequestService, ServiceRequestServiceImpl};
use std::sync::Arc;
use tracing::info;

/// The resolved component graph.
pub struct AppModule {
    database_pool: Arc<DatabasePool>,
    cache: CacheOps,
    service_request_service: Arc<dyn ServiceRequestService>,
    admin_service: AdminService,
}

impl AppModule {
    /// The database pool.
    pub fn database_pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.database_pool)
    }

    /// The cache operations shared by every service.
    pub fn cache(&self) -> &CacheOps {
        &self.cache
    }

    /// The service request service.
    pub fn service_request_service(&self) -> Arc<dyn ServiceRequestService> {
        Arc::clone(&self.service_request_service)
    }

    /// The admin service.
    pub fn admin_service(&self) -> &AdminService {
        &self.admin_service
    }

    /// Closes the database pool.
    pub async fn shutdown(&self) {
        self.database_pool.close().await;
    }
}

impl std::fmt::Debug for AppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModule")
            .field("database_pool", &self.database_pool)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppModule`].
pub struct AppModuleBuilder {
    database_pool: Arc<DatabasePool>,
    cache_store: Option<CacheStore>,
    cache_config: CacheConfig,
}

impl AppModuleBuilder {
    /// Starts from an open database pool.
    pub fn new(database_pool: Arc<DatabasePool>) -> Self {
        Self {
            database_pool,
            cache_store: None,
            cache_config: CacheConfig::default(),
        }
    }

    /// Sets the cache configuration (default TTL).
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Uses an already selected cache store.
    pub fn with_cache_store(mut self, store: CacheStore) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Wires the services.
    ///
    /// Without an explicit store the in-memory backend is used.
    pub fn build(self) -> AppModule {
        let store = Arc::new(self.cache_store.unwrap_or_else(CacheStore::in_memory));
        let cache = CacheOps::new(store, &self.cache_config);

        let repository = Arc::new(SqliteServiceRequestRepository::new(Arc::clone(
            &self.database_pool,
        )));
        let service_request_service: Arc<dyn ServiceRequestService> =
            Arc::new(ServiceRequestServiceImpl::new(repository, cache.clone()));

        AppModule {
            database_pool: self.database_pool,
            admin_service: AdminService::new(cache.clone()),
            cache,
            service_request_service,
        }
    }
}

/// Connects every external resource named in `config` and wires the
/// services.
///
/// A database failure is fatal. The cache store never is: an unreachable
/// Redis leaves the process on the in-memory backend.
pub async fn build_app_module(config: &AppConfig) -> CivicResult<Arc<AppModule>> {
    let database_pool = connect_database(&config.database).await?;
    let cache_store = CacheStore::connect(&config.cache).await;

    info!("Cache backend: {}", cache_store.backend_name());

    let module = AppModuleBuilder::new(database_pool)
        .with_cache_config(config.cache.clone())
        .with_cache_store(cache_store)
        .build();

    Ok(Arc::new(module))
}

async fn connect_database(config: &DatabaseConfig) -> CivicResult<Arc<DatabasePool>> {
    let pool = create_pool(config).await?;
    info!("Connected to database");
    Ok(pool)
}
