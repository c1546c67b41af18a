//! Service request service implementation.

use crate::cache::{
    cache_keys::{
        self, GET_SERVICE_REQUEST, LIST_SERVICE_REQUESTS, SERVICE_REQUEST_NAMESPACE,
    },
    CacheOps, ClearOutcome, Expiry, Memoized, WriteOutcome,
};
use crate::dto::{
    CreateServiceRequest, ServiceRequestListResponse, ServiceRequestResponse, UpdateStatusRequest,
};
use crate::service_request_service::ServiceRequestService;
use async_trait::async_trait;
use civic_core::{CivicError, CivicResult, NewServiceRequest, PageRequest, ServiceRequestId};
use civic_repository::ServiceRequestRepository;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cache-backed service request service.
///
/// `get_request` and `list_requests` are memoized under the
/// `service_request` namespace. The repository is captured by the wrapped
/// operations, so cache keys only carry the ID or the page request.
pub struct ServiceRequestServiceImpl<R: ServiceRequestRepository> {
    repository: Arc<R>,
    cache: CacheOps,
    get_cached: Memoized<(ServiceRequestId,), Option<ServiceRequestResponse>>,
    list_cached: Memoized<PageRequest, ServiceRequestListResponse>,
}

impl<R: ServiceRequestRepository + 'static> ServiceRequestServiceImpl<R> {
    /// Creates a new service request service.
    pub fn new(repository: Arc<R>, cache: CacheOps) -> Self {
        let cached = cache.cached(Expiry::Default, SERVICE_REQUEST_NAMESPACE);

        let repo = Arc::clone(&repository);
        let get_cached = cached.clone().wrap(
            GET_SERVICE_REQUEST,
            move |(id,): (ServiceRequestId,)| {
                let repo = Arc::clone(&repo);
                async move {
                    let found = repo.find_by_id(id).await?;
                    Ok::<_, CivicError>(found.map(ServiceRequestResponse::from))
                }
            },
        );

        let repo = Arc::clone(&repository);
        let list_cached = cached.wrap(LIST_SERVICE_REQUESTS, move |page: PageRequest| {
            let repo = Arc::clone(&repo);
            async move {
                let page = repo.find_page(page).await?;
                Ok::<_, CivicError>(ServiceRequestListResponse::from(page))
            }
        });

        Self {
            repository,
            cache,
            get_cached,
            list_cached,
        }
    }

    /// Drops every cached listing page.
    async fn invalidate_lists(&self) {
        let pattern = cache_keys::service_request_list_pattern();
        match self.cache.clear_cache_pattern(&pattern).await {
            ClearOutcome::Cleared(count) => debug!("Invalidated {} cached list pages", count),
            ClearOutcome::Failed => warn!("List cache invalidation incomplete; entries expire by TTL"),
        }
    }

    /// Drops the cached point lookup for `id` and every listing page.
    async fn invalidate_request(&self, id: ServiceRequestId) {
        match cache_keys::service_request_by_id(id) {
            Ok(key) => match self.cache.delete_cache(&key).await {
                WriteOutcome::Applied => debug!("Invalidated cached lookup '{}'", key),
                WriteOutcome::Skipped => {
                    warn!("Point cache invalidation for '{}' skipped; entry expires by TTL", key)
                }
            },
            Err(e) => warn!("Could not derive cache key for service request {}: {}", id, e),
        }
        self.invalidate_lists().await;
    }
}

#[async_trait]
impl<R: ServiceRequestRepository + 'static> ServiceRequestService for ServiceRequestServiceImpl<R> {
    async fn create_request(
        &self,
        request: CreateServiceRequest,
    ) -> CivicResult<ServiceRequestResponse> {
        debug!("Creating service request: {}", request.title);

        let created = self
            .repository
            .create(&NewServiceRequest::from(request))
            .await?;

        self.invalidate_lists().await;

        info!("Service request created: {}", created.id);
        Ok(ServiceRequestResponse::from(created))
    }

    async fn get_request(&self, id: ServiceRequestId) -> CivicResult<ServiceRequestResponse> {
        debug!("Getting service request: {}", id);

        self.get_cached
            .call((id,))
            .await?
            .ok_or_else(|| CivicError::not_found("ServiceRequest", id))
    }

    async fn list_requests(&self, page: PageRequest) -> CivicResult<ServiceRequestListResponse> {
        debug!(
            "Listing service requests, skip: {}, limit: {}",
            page.skip, page.limit
        );

        self.list_cached.call(page).await
    }

    async fn update_request_status(
        &self,
        id: ServiceRequestId,
        request: UpdateStatusRequest,
    ) -> CivicResult<ServiceRequestResponse> {
        debug!("Updating service request status: {} -> {}", id, request.status);

        let updated = self
            .repository
            .update_status(id, request.status)
            .await?
            .ok_or_else(|| CivicError::not_found("ServiceRequest", id))?;

        self.invalidate_request(id).await;

        info!("Service request status updated: {} -> {}", id, updated.status);
        Ok(ServiceRequestResponse::from(updated))
    }
}

impl<R: ServiceRequestRepository> std::fmt::Debug for ServiceRequestServiceImpl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRequestServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::tests::FailingBackend;
    use crate::cache::{CacheStore, DEFAULT_TTL};
    use chrono::Utc;
    use civic_core::{Page, RequestStatus, ServiceRequest};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory repository that counts reads.
    #[derive(Default)]
    struct MockServiceRequestRepository {
        requests: Mutex<BTreeMap<i64, ServiceRequest>>,
        find_by_id_calls: AtomicUsize,
        find_page_calls: AtomicUsize,
    }

    impl MockServiceRequestRepository {
        fn find_by_id_calls(&self) -> usize {
            self.find_by_id_calls.load(Ordering::SeqCst)
        }

        fn find_page_calls(&self) -> usize {
            self.find_page_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ServiceRequestRepository for MockServiceRequestRepository {
        async fn find_by_id(&self, id: ServiceRequestId) -> CivicResult<Option<ServiceRequest>> {
            self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.requests.lock().unwrap().get(&id.into_inner()).cloned())
        }

        async fn find_page(&self, page: PageRequest) -> CivicResult<Page<ServiceRequest>> {
            self.find_page_calls.fetch_add(1, Ordering::SeqCst);
            let requests = self.requests.lock().unwrap();
            let items = requests
                .values()
                .rev()
                .skip(page.skip as usize)
                .take(page.limit as usize)
                .cloned()
                .collect();
            Ok(Page::new(items, requests.len() as u64))
        }

        async fn count(&self) -> CivicResult<u64> {
            Ok(self.requests.lock().unwrap().len() as u64)
        }

        async fn create(&self, request: &NewServiceRequest) -> CivicResult<ServiceRequest> {
            let mut requests = self.requests.lock().unwrap();
            let id = requests.keys().next_back().copied().unwrap_or(0) + 1;
            let created = request
                .clone()
                .into_entity(ServiceRequestId(id), Utc::now());
            requests.insert(id, created.clone());
            Ok(created)
        }

        async fn update_status(
            &self,
            id: ServiceRequestId,
            status: RequestStatus,
        ) -> CivicResult<Option<ServiceRequest>> {
            let mut requests = self.requests.lock().unwrap();
            Ok(requests.get_mut(&id.into_inner()).map(|request| {
                request.change_status(status);
                request.clone()
            }))
        }
    }

    fn create_request(title: &str) -> CreateServiceRequest {
        CreateServiceRequest {
            title: title.to_string(),
            description: "Buraco grande na via".to_string(),
            category: "pavimentacao".to_string(),
            neighborhood: "Centro".to_string(),
            latitude: None,
            longitude: None,
            photo_urls: None,
        }
    }

    fn create_service() -> (
        Arc<MockServiceRequestRepository>,
        CacheOps,
        ServiceRequestServiceImpl<MockServiceRequestRepository>,
    ) {
        let repo = Arc::new(MockServiceRequestRepository::default());
        let cache = CacheOps::with_default_ttl(Arc::new(CacheStore::in_memory()), Some(DEFAULT_TTL));
        let service = ServiceRequestServiceImpl::new(Arc::clone(&repo), cache.clone());
        (repo, cache, service)
    }

    #[tokio::test]
    async fn test_create_defaults_to_pending() {
        let (_repo, _cache, service) = create_service();

        let created = service.create_request(create_request("Buraco na rua")).await.unwrap();

        assert_eq!(created.status, RequestStatus::Pending);
        assert_eq!(created.title, "Buraco na rua");
    }

    #[tokio::test]
    async fn test_get_is_served_from_cache() {
        let (repo, _cache, service) = create_service();
        let created = service.create_request(create_request("Buraco na rua")).await.unwrap();

        let first = service.get_request(created.id).await.unwrap();
        let second = service.get_request(created.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.find_by_id_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found_and_cached() {
        let (repo, _cache, service) = create_service();

        let err = service.get_request(ServiceRequestId(404)).await.unwrap_err();
        assert!(err.is_not_found());

        let err = service.get_request(ServiceRequestId(404)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.find_by_id_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_is_cached_per_page() {
        let (repo, _cache, service) = create_service();
        service.create_request(create_request("a")).await.unwrap();

        service.list_requests(PageRequest::first()).await.unwrap();
        service.list_requests(PageRequest::first()).await.unwrap();
        assert_eq!(repo.find_page_calls(), 1);

        service.list_requests(PageRequest::new(0, 10)).await.unwrap();
        assert_eq!(repo.find_page_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_clears_cached_lists() {
        let (repo, _cache, service) = create_service();
        service.create_request(create_request("a")).await.unwrap();
        let before = service.list_requests(PageRequest::first()).await.unwrap();
        assert_eq!(before.total, 1);

        service.create_request(create_request("b")).await.unwrap();
        let after = service.list_requests(PageRequest::first()).await.unwrap();

        assert_eq!(after.total, 2);
        assert_eq!(after.requests[0].title, "b");
        assert_eq!(repo.find_page_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_keeps_point_lookups() {
        let (repo, _cache, service) = create_service();
        let first = service.create_request(create_request("a")).await.unwrap();
        service.get_request(first.id).await.unwrap();

        service.create_request(create_request("b")).await.unwrap();
        service.get_request(first.id).await.unwrap();

        assert_eq!(repo.find_by_id_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_status_clears_point_lookup_and_lists() {
        let (repo, _cache, service) = create_service();
        let created = service.create_request(create_request("Buraco na rua")).await.unwrap();
        service.get_request(created.id).await.unwrap();
        service.list_requests(PageRequest::first()).await.unwrap();

        let updated = service
            .update_request_status(
                created.id,
                UpdateStatusRequest {
                    status: RequestStatus::InProgress,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, RequestStatus::InProgress);

        let fetched = service.get_request(created.id).await.unwrap();
        let listed = service.list_requests(PageRequest::first()).await.unwrap();

        assert_eq!(fetched.status, RequestStatus::InProgress);
        assert_eq!(listed.requests[0].status, RequestStatus::InProgress);
        assert_eq!(repo.find_by_id_calls(), 2);
        assert_eq!(repo.find_page_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found_and_keeps_cache() {
        let (repo, cache, service) = create_service();
        service.create_request(create_request("a")).await.unwrap();
        service.list_requests(PageRequest::first()).await.unwrap();

        let err = service
            .update_request_status(
                ServiceRequestId(99),
                UpdateStatusRequest {
                    status: RequestStatus::Completed,
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        let list_key = cache_keys::service_request_list(PageRequest::first()).unwrap();
        assert!(cache.get::<ServiceRequestListResponse>(&list_key).await.is_some());
        assert_eq!(repo.find_page_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_status_succeeds_when_invalidation_is_skipped() {
        let repo = Arc::new(MockServiceRequestRepository::default());
        let cache = CacheOps::with_default_ttl(
            Arc::new(CacheStore::with_backend(Arc::new(FailingBackend))),
            Some(DEFAULT_TTL),
        );
        let service = ServiceRequestServiceImpl::new(Arc::clone(&repo), cache);
        let created = service.create_request(create_request("Buraco na rua")).await.unwrap();

        let updated = service
            .update_request_status(
                created.id,
                UpdateStatusRequest {
                    status: RequestStatus::InProgress,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::InProgress);
        let fetched = service.get_request(created.id).await.unwrap();
        assert_eq!(fetched.status, RequestStatus::InProgress);
    }

    #[tokio::test]
    async fn test_invalidation_keys_match_memoized_keys() {
        let (_repo, _cache, service) = create_service();
        let id = ServiceRequestId(5);
        let page = PageRequest::new(20, 10);

        assert_eq!(
            service.get_cached.key_for(&(id,)).unwrap(),
            cache_keys::service_request_by_id(id).unwrap()
        );
        let list_key = service.list_cached.key_for(&page).unwrap();
        assert_eq!(list_key, cache_keys::service_request_list(page).unwrap());
        assert!(cache_keys::service_request_list_pattern().matches(&list_key));
    }
}
