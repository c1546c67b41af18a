//! Result type aliases for Civic Requests.

use crate::CivicError;

/// A specialized `Result` type for Civic operations.
pub type CivicResult<T> = Result<T, CivicError>;

/// A boxed future returning a `CivicResult`.
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = CivicResult<T>> + Send + 'a>>;
