//! Error types for the client layer.
//!
//! Configuration mistakes (unknown keys, missing verbs) surface here,
//! synchronously to the caller. Runtime adapter failures never do — they
//! are captured into the failing entity's state so one broken backend
//! cannot crash unrelated consumers.

use entcache_types::{EntityKey, Verb};
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Configuration errors surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Operation on a key that was never defined.
    #[error("unknown entity key: {0}")]
    UnknownKey(EntityKey),

    /// The key's adapter does not implement the requested verb.
    #[error("verb {verb} not supported for entity {key}")]
    Unsupported { key: EntityKey, verb: Verb },
}
