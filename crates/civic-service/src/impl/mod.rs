//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `service_request_service.rs`).

pub mod service_request_service_impl;

pub use service_request_service_impl::ServiceRequestServiceImpl;
