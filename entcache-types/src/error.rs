//! Error information carried in per-entity state.
//!
//! A failing request never crashes the cache or its other entities; the
//! failure is captured here and stored next to the entity's data, which
//! stays at its last good value.

use crate::Verb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of a captured failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The backend reported a failure for the request.
    Adapter,
    /// The entity's adapter does not implement the requested verb.
    Unsupported,
    /// The backend could not be reached at all.
    Transport,
}

/// A failure captured into an entity's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    /// A backend-reported failure.
    #[must_use]
    pub fn adapter(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Adapter,
            message: message.into(),
        }
    }

    /// A missing-verb failure.
    #[must_use]
    pub fn unsupported(verb: Verb) -> Self {
        Self {
            kind: ErrorKind::Unsupported,
            message: format!("verb {verb} not supported by this adapter"),
        }
    }

    /// A transport-level failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: message.into(),
        }
    }
}
