//! # Civic Repository
//!
//! Persistence collaborator for service requests.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ServiceRequestRepository>  (domain interface)
//! SqliteServiceRequestRepository          (SQLx queries)
//!   ↓  DatabasePool
//! SQLite
//! ```
//!
//! The repository knows nothing about caching; invalidation is the
//! service layer's job once a write here has committed.

pub mod pool;
pub mod sqlite;
pub mod traits;

pub use pool::*;
pub use sqlite::SqliteServiceRequestRepository;
pub use traits::*;
