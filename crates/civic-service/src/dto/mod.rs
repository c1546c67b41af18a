//! Data Transfer Objects (DTOs).

mod admin_dto;
mod service_request_dto;

pub use admin_dto::*;
pub use service_request_dto::*;
