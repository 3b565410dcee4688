//! The cache facade.
//!
//! `EntityCache` ties the store, the adapter registry, and the generation
//! table together. It is cheap to clone and never process-global;
//! construct one per application (or per test) for isolation.

use crate::adapter::Adapter;
use crate::entity::EntityHandle;
use crate::registry::{AdapterRegistry, Registration};
use crate::request::RequestHandle;
use entcache_store::{EntityState, Store};
use entcache_types::{EntityKey, EntityRecord, Verb};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Cache-wide configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Identifying field used when a definition does not name one.
    pub default_ident_field: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ident_field: "id".to_string(),
        }
    }
}

/// What a `define` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defined {
    /// The key was new.
    Fresh,
    /// The key existed; its previous adapter was replaced.
    Replaced,
}

impl Defined {
    /// Whether an existing registration was replaced.
    #[must_use]
    pub fn replaced(self) -> bool {
        self == Defined::Replaced
    }
}

/// An entity definition: adapter, initial data, and merge configuration.
pub struct EntityDef {
    adapter: Arc<dyn Adapter>,
    initial_data: Vec<EntityRecord>,
    ident_field: Option<String>,
}

impl EntityDef {
    /// Defines an entity backed by the given adapter, starting empty.
    #[must_use]
    pub fn new(adapter: Arc<dyn Adapter>) -> Self {
        Self {
            adapter,
            initial_data: Vec::new(),
            ident_field: None,
        }
    }

    /// Sets the data the entity starts with.
    #[must_use]
    pub fn with_initial_data(mut self, data: impl IntoIterator<Item = EntityRecord>) -> Self {
        self.initial_data = data.into_iter().collect();
        self
    }

    /// Overrides the identifying field for upsert/delete merges.
    #[must_use]
    pub fn with_ident_field(mut self, field: impl Into<String>) -> Self {
        self.ident_field = Some(field.into());
        self
    }
}

/// Per-(key, verb) monotonic request generations.
///
/// `begin` issues a new generation; `commit_if_latest` runs its commit
/// closure only when the settling generation is still the latest, with
/// the lock held across the commit so a stale settlement can never
/// interleave with a newer one on parallel runtimes.
#[derive(Default)]
pub(crate) struct Generations {
    latest: Mutex<HashMap<(EntityKey, Verb), u64>>,
}

impl Generations {
    pub(crate) fn begin(&self, key: &EntityKey, verb: Verb) -> u64 {
        let mut latest = self.lock_latest();
        let counter = latest.entry((key.clone(), verb)).or_insert(0);
        *counter += 1;
        *counter
    }

    pub(crate) fn commit_if_latest(
        &self,
        key: &EntityKey,
        verb: Verb,
        generation: u64,
        commit: impl FnOnce(),
    ) -> bool {
        let latest = self.lock_latest();
        let current = latest.get(&(key.clone(), verb)).copied().unwrap_or(0);
        if current != generation {
            return false;
        }
        commit();
        true
    }

    fn lock_latest(&self) -> MutexGuard<'_, HashMap<(EntityKey, Verb), u64>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) struct CacheInner {
    pub(crate) store: Store,
    pub(crate) registry: AdapterRegistry,
    pub(crate) generations: Generations,
    pub(crate) config: CacheConfig,
}

/// The cache facade. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct EntityCache {
    pub(crate) inner: Arc<CacheInner>,
}

impl EntityCache {
    /// Creates an empty cache with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates an empty cache with the given configuration.
    #[must_use]
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                store: Store::new(),
                registry: AdapterRegistry::new(),
                generations: Generations::default(),
                config,
            }),
        }
    }

    /// The underlying store. Exposed so tests and middleware can read
    /// snapshots, subscribe, and dispatch directly.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Registers an entity: seeds its state (idle, with the definition's
    /// initial data) and binds its adapter.
    ///
    /// Redefining an existing key replaces the adapter and re-seeds the
    /// state instead of failing, which tolerates hot reload; the returned
    /// [`Defined`] tells callers who care that a replacement happened.
    pub fn define(&self, key: impl Into<EntityKey>, def: EntityDef) -> Defined {
        let key = key.into();
        let ident_field = def
            .ident_field
            .unwrap_or_else(|| self.inner.config.default_ident_field.clone());

        let replaced = self.inner.registry.insert(
            key.clone(),
            Registration {
                adapter: def.adapter,
                ident_field: ident_field.clone(),
            },
        );
        if replaced.is_some() {
            warn!(key = %key, "redefining entity: previous adapter replaced");
        }

        self.inner
            .store
            .seed(key, EntityState::new(def.initial_data, ident_field));

        if replaced.is_some() {
            Defined::Replaced
        } else {
            Defined::Fresh
        }
    }

    /// A request handle for an arbitrary (key, verb) pair.
    #[must_use]
    pub fn request(&self, key: impl Into<EntityKey>, verb: Verb) -> RequestHandle {
        RequestHandle::new(self.clone(), key.into(), verb)
    }

    /// A get-request handle for the key.
    #[must_use]
    pub fn get(&self, key: impl Into<EntityKey>) -> RequestHandle {
        self.request(key, Verb::Get)
    }

    /// A post-request handle for the key.
    #[must_use]
    pub fn post(&self, key: impl Into<EntityKey>) -> RequestHandle {
        self.request(key, Verb::Post)
    }

    /// A put-request handle for the key.
    #[must_use]
    pub fn put(&self, key: impl Into<EntityKey>) -> RequestHandle {
        self.request(key, Verb::Put)
    }

    /// A patch-request handle for the key.
    #[must_use]
    pub fn patch(&self, key: impl Into<EntityKey>) -> RequestHandle {
        self.request(key, Verb::Patch)
    }

    /// A delete-request handle for the key.
    #[must_use]
    pub fn delete(&self, key: impl Into<EntityKey>) -> RequestHandle {
        self.request(key, Verb::Delete)
    }

    /// A composite handle for one entity.
    #[must_use]
    pub fn entity(&self, key: impl Into<EntityKey>) -> EntityHandle {
        EntityHandle::new(self.clone(), key.into())
    }

    /// All registered keys.
    #[must_use]
    pub fn keys(&self) -> Vec<EntityKey> {
        self.inner.registry.keys()
    }

    /// Whether the key is registered.
    #[must_use]
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.inner.registry.contains(key)
    }

    /// Clears all entity state. Registrations persist; the next request
    /// on a key re-seeds its state from the registration.
    pub fn remove_all(&self) {
        self.inner.store.reset();
    }

    /// Re-seeds an entity's state from its registration if a bulk reset
    /// wiped it, so merge configuration survives resets.
    pub(crate) fn ensure_entity(&self, key: &EntityKey, registration: &Registration) {
        if self.inner.store.entity(key).is_none() {
            self.inner.store.seed(
                key.clone(),
                EntityState::new(Vec::new(), registration.ident_field.clone()),
            );
        }
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}
