//! Service request DTOs.

use chrono::{DateTime, Utc};
use civic_core::{NewServiceRequest, Page, RequestStatus, ServiceRequest, ServiceRequestId};
use serde::{Deserialize, Serialize};

/// Request to submit a new service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub neighborhood: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub photo_urls: Option<Vec<String>>,
}

impl From<CreateServiceRequest> for NewServiceRequest {
    fn from(request: CreateServiceRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: request.category,
            neighborhood: request.neighborhood,
            latitude: request.latitude,
            longitude: request.longitude,
            photo_urls: request.photo_urls,
        }
    }
}

/// Request to move a service request to another status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
}

/// Service request response DTO.
///
/// This is also the shape stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequestResponse {
    pub id: ServiceRequestId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub neighborhood: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: RequestStatus,
    pub photo_urls: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceRequest> for ServiceRequestResponse {
    fn from(request: ServiceRequest) -> Self {
        Self {
            id: request.id,
            title: request.title,
            description: request.description,
            category: request.category,
            neighborhood: request.neighborhood,
            latitude: request.latitude,
            longitude: request.longitude,
            status: request.status,
            photo_urls: request.photo_urls,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// One page of service requests with the overall count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequestListResponse {
    pub requests: Vec<ServiceRequestResponse>,
    pub total: u64,
}

impl From<Page<ServiceRequest>> for ServiceRequestListResponse {
    fn from(page: Page<ServiceRequest>) -> Self {
        let page = page.map(ServiceRequestResponse::from);
        Self {
            requests: page.items,
            total: page.total,
        }
    }
}
