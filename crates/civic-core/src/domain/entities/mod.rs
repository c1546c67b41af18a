//! Domain entities.

mod service_request;

pub use service_request::{NewServiceRequest, ServiceRequest};
