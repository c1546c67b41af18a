//! SQLite repository implementations.

mod service_request_repository;

pub use service_request_repository::SqliteServiceRequestRepository;
