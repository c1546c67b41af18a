//! Service request entity.

use super::super::value_objects::RequestStatus;
use crate::ServiceRequestId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A citizen's request for a municipal service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Database-assigned identifier.
    pub id: ServiceRequestId,

    /// Short summary, e.g. "Buraco na rua".
    pub title: String,

    /// Free-form description of the problem.
    pub description: String,

    /// Service category (e.g. "pavimentacao").
    pub category: String,

    /// Neighborhood where the service is needed.
    pub neighborhood: String,

    /// Optional latitude of the reported location.
    pub latitude: Option<f64>,

    /// Optional longitude of the reported location.
    pub longitude: Option<f64>,

    /// Current status.
    pub status: RequestStatus,

    /// URLs of photos attached by the citizen.
    pub photo_urls: Option<Vec<String>>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Moves the request to a new status and touches `updated_at`.
    pub fn change_status(&mut self, status: RequestStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// The fields a citizen supplies when submitting a request.
///
/// Status and timestamps are assigned by persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewServiceRequest {
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

impl NewServiceRequest {
    /// Creates a submission without location or photos.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        neighborhood: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            neighborhood: neighborhood.into(),
            latitude: None,
            longitude: None,
            photo_urls: None,
        }
    }

    /// Attaches photo URLs.
    #[must_use]
    pub fn with_photos(mut self, photo_urls: Vec<String>) -> Self {
        self.photo_urls = Some(photo_urls);
        self
    }

    /// Builds the entity as persistence would store it right after insert.
    #[must_use]
    pub fn into_entity(self, id: ServiceRequestId, now: DateTime<Utc>) -> ServiceRequest {
        ServiceRequest {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            neighborhood: self.neighborhood,
            latitude: self.latitude,
            longitude: self.longitude,
            status: RequestStatus::default(),
            photo_urls: self.photo_urls,
            created_at: now,
            updated_at: now,
        }
    }
}
