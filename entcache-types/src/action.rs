//! Dispatched actions.
//!
//! An action describes one step of a request lifecycle for one entity:
//! start, success, or error. Actions are immutable, serializable, and are
//! the only way entity state transitions.
//!
//! The generation number records which issue of a (key, verb) request the
//! action belongs to; settlement commits are gated on it so an older
//! in-flight request can never clobber a newer one's outcome.

use crate::{EntityKey, ErrorInfo, Verb};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which lifecycle step an action represents, with its step-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// A request was issued.
    Start {
        /// The request payload, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },

    /// The request settled successfully.
    Success {
        /// The request payload the settlement answers (delete merges
        /// match on it).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
        /// What the backend returned.
        result: Value,
    },

    /// The request settled with a failure.
    Error { error: ErrorInfo },
}

/// One step of a request lifecycle, addressed to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The entity this action applies to.
    pub key: EntityKey,

    /// The verb whose merge semantics apply on success.
    pub verb: Verb,

    /// Which issue of the (key, verb) request this belongs to.
    pub generation: u64,

    /// The lifecycle step.
    pub phase: Phase,
}

impl Action {
    /// Creates a start action.
    #[must_use]
    pub fn start(key: EntityKey, verb: Verb, generation: u64, payload: Option<Value>) -> Self {
        Self {
            key,
            verb,
            generation,
            phase: Phase::Start { payload },
        }
    }

    /// Creates a success action.
    #[must_use]
    pub fn success(
        key: EntityKey,
        verb: Verb,
        generation: u64,
        payload: Option<Value>,
        result: Value,
    ) -> Self {
        Self {
            key,
            verb,
            generation,
            phase: Phase::Success { payload, result },
        }
    }

    /// Creates an error action.
    #[must_use]
    pub fn error(key: EntityKey, verb: Verb, generation: u64, error: ErrorInfo) -> Self {
        Self {
            key,
            verb,
            generation,
            phase: Phase::Error { error },
        }
    }

    /// Short phase name for logging.
    #[must_use]
    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Start { .. } => "start",
            Phase::Success { .. } => "success",
            Phase::Error { .. } => "error",
        }
    }
}
