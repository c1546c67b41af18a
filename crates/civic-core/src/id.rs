//! Typed ID wrappers for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

/// A strongly-typed wrapper for service request IDs.
///
/// IDs are assigned by the database on insert, so there is no `new()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRequestId(pub i64);

impl ServiceRequestId {
    /// Returns the raw database value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for ServiceRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceRequestId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i64> for ServiceRequestId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ServiceRequestId> for i64 {
    fn from(id: ServiceRequestId) -> Self {
        id.0
    }
}
