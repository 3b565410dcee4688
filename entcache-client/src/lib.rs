//! Client-side entity cache: adapters, registration, and request
//! orchestration over the reactive store.
//!
//! # Architecture
//!
//! - **Adapter**: the fixed verb interface a backend implements. Partial
//!   adapters leave verbs to the default bodies, which report the verb as
//!   unsupported rather than silently succeeding.
//! - **Registry**: maps each entity key to exactly one registered adapter
//!   plus its merge configuration.
//! - **EntityCache**: the facade. `define` seeds store and registry;
//!   request handles run the per-verb lifecycle; the entity handle layers
//!   optimistic mutation and selection on top.
//! - **Generations**: per (key, verb) monotonic counters. Only the most
//!   recently issued request's settlement commits; older settlements are
//!   dropped silently, which gives last-issued-wins semantics even when
//!   the network completes out of order.
//!
//! # Example
//!
//! ```no_run
//! use entcache_client::{EntityCache, EntityDef, MemoryAdapter};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), entcache_client::CacheError> {
//! let cache = EntityCache::new();
//! cache.define("notes", EntityDef::new(Arc::new(MemoryAdapter::new())));
//!
//! let notes = cache.get("notes");
//! notes.execute(None).await?;
//! println!("{} notes cached", notes.snapshot().data.len());
//! # Ok(())
//! # }
//! ```

mod adapter;
mod cache;
mod entity;
mod error;
mod memory;
mod registry;
mod request;

pub use adapter::{mock, Adapter, AdapterError, AdapterResult};
pub use cache::{CacheConfig, Defined, EntityCache, EntityDef};
pub use entity::{EntityHandle, SaveTask};
pub use error::{CacheError, CacheResult};
pub use memory::MemoryAdapter;
pub use registry::{AdapterRegistry, Registration};
pub use request::{RequestHandle, RequestView, Settlement};
