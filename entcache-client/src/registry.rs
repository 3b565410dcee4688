//! Adapter registry.
//!
//! Pure lookup table from entity key to its registered adapter and merge
//! configuration. Registrations outlive bulk state resets; only an
//! explicit redefine replaces them.

use crate::adapter::Adapter;
use entcache_types::EntityKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A registered entity: its adapter plus merge configuration.
#[derive(Clone)]
pub struct Registration {
    /// Verb implementations for this entity.
    pub adapter: Arc<dyn Adapter>,
    /// Field records are matched on for upsert/delete merges.
    pub ident_field: String,
}

/// Maps each entity key to exactly one registration.
#[derive(Default)]
pub struct AdapterRegistry {
    entries: Mutex<HashMap<EntityKey, Registration>>,
}

impl AdapterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a registration, returning the one it replaced, if any.
    pub fn insert(&self, key: EntityKey, registration: Registration) -> Option<Registration> {
        self.lock_entries().insert(key, registration)
    }

    /// Looks up a key's registration.
    pub fn registration(&self, key: &EntityKey) -> Option<Registration> {
        self.lock_entries().get(key).cloned()
    }

    /// Looks up a key's adapter.
    pub fn adapter(&self, key: &EntityKey) -> Option<Arc<dyn Adapter>> {
        self.lock_entries().get(key).map(|r| Arc::clone(&r.adapter))
    }

    /// Whether the key is registered.
    #[must_use]
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.lock_entries().contains_key(key)
    }

    /// All registered keys, sorted for deterministic iteration.
    #[must_use]
    pub fn keys(&self) -> Vec<EntityKey> {
        let mut keys: Vec<EntityKey> = self.lock_entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Whether no key is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<EntityKey, Registration>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
