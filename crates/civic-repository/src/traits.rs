//! Repository trait definitions.

use async_trait::async_trait;
use civic_core::{
    CivicResult, NewServiceRequest, Page, PageRequest, RequestStatus, ServiceRequest,
    ServiceRequestId,
};

/// Service request repository trait.
///
/// Every write method returns only after the change is committed, which is
/// what allows callers to invalidate caches right after it returns.
#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    /// Finds a service request by ID.
    async fn find_by_id(&self, id: ServiceRequestId) -> CivicResult<Option<ServiceRequest>>;

    /// Lists service requests, newest first, with the total count.
    async fn find_page(&self, page: PageRequest) -> CivicResult<Page<ServiceRequest>>;

    /// Counts all service requests.
    async fn count(&self) -> CivicResult<u64>;

    /// Persists a new submission with status `pendente`.
    async fn create(&self, request: &NewServiceRequest) -> CivicResult<ServiceRequest>;

    /// Changes the status of a request. Returns `None` if the ID is unknown.
    async fn update_status(
        &self,
        id: ServiceRequestId,
        status: RequestStatus,
    ) -> CivicResult<Option<ServiceRequest>>;
}
