//! Per-entity request status.

use serde::{Deserialize, Serialize};

/// Where an entity currently sits in its request lifecycle.
///
/// Transitions happen only through the reducer: `Loading` on a start
/// action, then `Success` or `Error` on settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// No request has been issued since registration.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The most recent committed settlement succeeded.
    Success,
    /// The most recent committed settlement failed.
    Error,
}

impl RequestStatus {
    /// Whether a request is currently in flight.
    #[must_use]
    pub fn is_loading(self) -> bool {
        self == RequestStatus::Loading
    }

    /// Whether the last committed settlement failed.
    #[must_use]
    pub fn is_error(self) -> bool {
        self == RequestStatus::Error
    }
}
