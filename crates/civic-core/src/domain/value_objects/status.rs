//! Service request status value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a service request.
///
/// Wire and storage values are the municipal system's Portuguese codes
/// (`pendente`, `em_andamento`, `concluido`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequestStatus {
    /// Submitted, not yet picked up.
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    /// Being worked on by the municipality.
    #[serde(rename = "em_andamento")]
    InProgress,
    /// Resolved.
    #[serde(rename = "concluido")]
    Completed,
}

impl RequestStatus {
    /// Returns the wire/storage code for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::InProgress => "em_andamento",
            Self::Completed => "concluido",
        }
    }

    /// Checks if the request still awaits resolution.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Completed)
    }

    /// All possible statuses.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Pending, Self::InProgress, Self::Completed]
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown request status '{0}' (expected pendente, em_andamento or concluido)")]
pub struct ParseStatusError(pub String);

impl FromStr for RequestStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}
