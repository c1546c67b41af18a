//! Service request service trait definition.

use crate::dto::{
    CreateServiceRequest, ServiceRequestListResponse, ServiceRequestResponse, UpdateStatusRequest,
};
use async_trait::async_trait;
use civic_core::{CivicResult, PageRequest, ServiceRequestId};

/// Service request use cases.
///
/// Reads go through the cache; writes invalidate it once the repository has
/// committed them.
#[async_trait]
pub trait ServiceRequestService: Send + Sync {
    /// Submits a new request with status `pendente`.
    async fn create_request(
        &self,
        request: CreateServiceRequest,
    ) -> CivicResult<ServiceRequestResponse>;

    /// Gets a request by ID.
    async fn get_request(&self, id: ServiceRequestId) -> CivicResult<ServiceRequestResponse>;

    /// Lists requests, newest first.
    async fn list_requests(&self, page: PageRequest) -> CivicResult<ServiceRequestListResponse>;

    /// Changes the status of a request.
    async fn update_request_status(
        &self,
        id: ServiceRequestId,
        request: UpdateStatusRequest,
    ) -> CivicResult<ServiceRequestResponse>;
}
