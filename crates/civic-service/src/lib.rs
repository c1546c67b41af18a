//! # Civic Service
//!
//! Use cases for service requests, the cache-aside layer that accelerates
//! their reads, and administrative cache operations.

pub mod admin_service;
pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod service_request_service;

pub use admin_service::AdminService;
pub use cache::*;
pub use dto::*;
pub use r#impl::ServiceRequestServiceImpl;
pub use service_request_service::*;
