//! # Civic Core
//!
//! Core types, domain model, and error definitions for Civic Requests.
//! Every other crate in the workspace builds on the abstractions here:
//! the unified error type, typed identifiers, pagination, and the
//! service-request entity.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
