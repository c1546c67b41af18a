//! SQLite service request repository implementation.

use crate::{traits::ServiceRequestRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use civic_core::{
    CivicError, CivicResult, NewServiceRequest, Page, PageRequest, RequestStatus, ServiceRequest,
    ServiceRequestId,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const SELECT_COLUMNS: &str = r#"
    SELECT id, title, description, category, neighborhood, latitude, longitude,
           status, photo_urls, created_at, updated_at
    FROM service_requests
"#;

/// SQLite service request repository implementation.
#[derive(Clone)]
pub struct SqliteServiceRequestRepository {
    pool: Arc<DatabasePool>,
}

impl SqliteServiceRequestRepository {
    /// Creates a new SQLite service request repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a service request.
#[derive(Debug, FromRow)]
struct ServiceRequestRow {
    id: i64,
    title: String,
    description: String,
    category: String,
    neighborhood: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    status: String,
    photo_urls: Option<String>, // JSON array
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ServiceRequestRow> for ServiceRequest {
    type Error = CivicError;

    fn try_from(row: ServiceRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<RequestStatus>()
            .map_err(|e| CivicError::Internal(format!("Invalid status in database: {}", e)))?;

        let photo_urls = row
            .photo_urls
            .as_deref()
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()
            .map_err(|e| CivicError::Internal(format!("Invalid photo_urls in database: {}", e)))?;

        Ok(ServiceRequest {
            id: ServiceRequestId(row.id),
            title: row.title,
            description: row.description,
            category: row.category,
            neighborhood: row.neighborhood,
            latitude: row.latitude,
            longitude: row.longitude,
            status,
            photo_urls,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ServiceRequestRepository for SqliteServiceRequestRepository {
    async fn find_by_id(&self, id: ServiceRequestId) -> CivicResult<Option<ServiceRequest>> {
        debug!("Finding service request by id: {}", id);

        let row = sqlx::query_as::<_, ServiceRequestRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(ServiceRequest::try_from).transpose()
    }

    async fn find_page(&self, page: PageRequest) -> CivicResult<Page<ServiceRequest>> {
        debug!(
            "Listing service requests: skip={}, limit={}",
            page.skip, page.limit
        );

        // Newer rows always carry larger ids.
        let rows = sqlx::query_as::<_, ServiceRequestRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY id DESC LIMIT ? OFFSET ?"
        ))
        .bind(to_sql_int(page.limit))
        .bind(to_sql_int(page.offset()))
        .fetch_all(self.pool.inner())
        .await?;

        let total = self.count().await?;

        let items = rows
            .into_iter()
            .map(ServiceRequest::try_from)
            .collect::<CivicResult<Vec<_>>>()?;

        Ok(Page::new(items, total))
    }

    async fn count(&self) -> CivicResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_requests")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn create(&self, request: &NewServiceRequest) -> CivicResult<ServiceRequest> {
        debug!("Creating service request: {}", request.title);

        let photo_urls = request
            .photo_urls
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO service_requests (
                title, description, category, neighborhood, latitude, longitude,
                status, photo_urls, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.category)
        .bind(&request.neighborhood)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(RequestStatus::default().as_str())
        .bind(photo_urls)
        .bind(now)
        .bind(now)
        .execute(self.pool.inner())
        .await?;

        let id = ServiceRequestId(result.last_insert_rowid());

        self.find_by_id(id)
            .await?
            .ok_or_else(|| CivicError::internal(format!("Inserted service request {} vanished", id)))
    }

    async fn update_status(
        &self,
        id: ServiceRequestId,
        status: RequestStatus,
    ) -> CivicResult<Option<ServiceRequest>> {
        debug!("Updating service request {} to status {}", id, status);

        let result = sqlx::query(
            r#"
            UPDATE service_requests
            SET status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }
}
