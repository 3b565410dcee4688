//! Core type definitions for entcache.
//!
//! This crate defines the fundamental, backend-agnostic types used throughout
//! the cache:
//! - Entity keys and records (opaque name + JSON payload)
//! - The verb set and per-request status enumeration
//! - Dispatched actions (the request-lifecycle vocabulary)
//! - Error information captured into per-entity state
//!
//! Everything backend-specific (HTTP, in-memory, mocks) lives behind the
//! adapter trait in `entcache-client`, not here.

mod action;
mod error;
mod key;
mod record;
mod status;
mod verb;

pub use action::{Action, Phase};
pub use error::{ErrorInfo, ErrorKind};
pub use key::EntityKey;
pub use record::EntityRecord;
pub use status::RequestStatus;
pub use verb::Verb;
