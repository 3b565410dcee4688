//! Composite entity handle.
//!
//! Layers optimistic mutation and selection queries over the store.
//! `add` and `remove` mutate visible data immediately with a synthetic
//! settlement, then persist through the adapter on a spawned task.
//! Optimistic data is not rolled back if the persist call later fails;
//! the failure lands in the entity's state and a `get` refresh
//! reconciles.

use crate::cache::EntityCache;
use crate::error::{CacheError, CacheResult};
use crate::request::Settlement;
use entcache_store::EntityState;
use entcache_types::{Action, EntityKey, EntityRecord, ErrorInfo, RequestStatus, Verb};
use serde_json::Value;
use tokio::task::JoinHandle;

/// The spawned persist half of an optimistic mutation. Await it to
/// observe the settlement; drop it to fire and forget.
pub type SaveTask = JoinHandle<CacheResult<Settlement>>;

/// Optimistic mutation and selection for one entity.
///
/// Obtained from [`EntityCache::entity`]. The optimistic operations
/// spawn their persist half on tokio, so they must be called from within
/// a runtime.
#[derive(Clone)]
pub struct EntityHandle {
    cache: EntityCache,
    key: EntityKey,
}

impl EntityHandle {
    pub(crate) fn new(cache: EntityCache, key: EntityKey) -> Self {
        Self { cache, key }
    }

    /// The entity key this handle addresses.
    #[must_use]
    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    /// The entity's full current state, if it holds any.
    #[must_use]
    pub fn state(&self) -> Option<EntityState> {
        self.cache.inner.store.entity(&self.key)
    }

    /// The entity's current request status.
    #[must_use]
    pub fn status(&self) -> RequestStatus {
        self.state().map_or(RequestStatus::Idle, |s| s.status)
    }

    /// The failure from the entity's last committed settlement, if any.
    #[must_use]
    pub fn error(&self) -> Option<ErrorInfo> {
        self.state().and_then(|s| s.error)
    }

    /// All records currently cached for the entity.
    #[must_use]
    pub fn select_all(&self) -> Vec<EntityRecord> {
        self.state().map_or_else(Vec::new, |s| s.records().to_vec())
    }

    /// Records matching the predicate.
    pub fn select(&self, predicate: impl Fn(&EntityRecord) -> bool) -> Vec<EntityRecord> {
        self.state().map_or_else(Vec::new, |s| {
            s.records().iter().filter(|r| predicate(r)).cloned().collect()
        })
    }

    /// Optimistically appends `value`, then persists it with the post
    /// verb on a spawned task.
    ///
    /// The value is visible in `select_all` as soon as this returns. The
    /// persist settlement commits with upsert semantics on the
    /// identifying field, so a backend echoing the saved record replaces
    /// the optimistic copy instead of duplicating it. On failure the
    /// optimistic record stays and the error lands in entity state.
    pub fn add(&self, value: Value) -> CacheResult<SaveTask> {
        let inner = &self.cache.inner;
        let Some(registration) = inner.registry.registration(&self.key) else {
            return Err(CacheError::UnknownKey(self.key.clone()));
        };
        self.cache.ensure_entity(&self.key, &registration);

        // Synthetic settlement under its own generation: a later real
        // settlement must not be dropped as stale against it.
        let generation = inner.generations.begin(&self.key, Verb::Post);
        inner.store.dispatch(&Action::success(
            self.key.clone(),
            Verb::Post,
            generation,
            None,
            value.clone(),
        ));

        let handle = self.cache.request(self.key.clone(), Verb::Post);
        Ok(tokio::spawn(async move {
            handle.execute_commit_as(Some(value), Verb::Put).await
        }))
    }

    /// Optimistically removes the record matching `value`'s identifying
    /// field, then persists the removal with the delete verb on a
    /// spawned task.
    pub fn remove(&self, value: Value) -> CacheResult<SaveTask> {
        let inner = &self.cache.inner;
        let Some(registration) = inner.registry.registration(&self.key) else {
            return Err(CacheError::UnknownKey(self.key.clone()));
        };
        self.cache.ensure_entity(&self.key, &registration);

        let generation = inner.generations.begin(&self.key, Verb::Delete);
        inner.store.dispatch(&Action::success(
            self.key.clone(),
            Verb::Delete,
            generation,
            Some(value.clone()),
            Value::Null,
        ));

        let handle = self.cache.request(self.key.clone(), Verb::Delete);
        Ok(tokio::spawn(async move { handle.execute(Some(value)).await }))
    }

    /// Clears the entity's cached records locally. No backend call.
    pub fn clear(&self) -> CacheResult<()> {
        let inner = &self.cache.inner;
        let Some(registration) = inner.registry.registration(&self.key) else {
            return Err(CacheError::UnknownKey(self.key.clone()));
        };
        self.cache.ensure_entity(&self.key, &registration);

        let generation = inner.generations.begin(&self.key, Verb::Get);
        inner.store.dispatch(&Action::success(
            self.key.clone(),
            Verb::Get,
            generation,
            None,
            Value::Array(Vec::new()),
        ));
        Ok(())
    }

    /// Persists `value` with put when a cached record shares its
    /// identifying field, post otherwise.
    pub async fn save(&self, value: Value) -> CacheResult<Settlement> {
        let Some(registration) = self.cache.inner.registry.registration(&self.key) else {
            return Err(CacheError::UnknownKey(self.key.clone()));
        };
        let record = EntityRecord::new(value.clone());
        let known = self
            .select_all()
            .iter()
            .any(|r| r.matches_ident(&registration.ident_field, &record));
        let verb = if known { Verb::Put } else { Verb::Post };
        self.cache.request(self.key.clone(), verb).execute(Some(value)).await
    }

    /// Runs the get verb (full refresh) with an optional query.
    pub async fn get(&self, query: Option<Value>) -> CacheResult<Settlement> {
        self.cache.request(self.key.clone(), Verb::Get).execute(query).await
    }

    /// Runs the post verb with the payload.
    pub async fn post(&self, payload: Option<Value>) -> CacheResult<Settlement> {
        self.cache.request(self.key.clone(), Verb::Post).execute(payload).await
    }

    /// Runs the put verb with the payload.
    pub async fn put(&self, payload: Option<Value>) -> CacheResult<Settlement> {
        self.cache.request(self.key.clone(), Verb::Put).execute(payload).await
    }

    /// Runs the patch verb with the payload.
    pub async fn patch(&self, payload: Option<Value>) -> CacheResult<Settlement> {
        self.cache.request(self.key.clone(), Verb::Patch).execute(payload).await
    }

    /// Runs the delete verb with the payload.
    pub async fn delete(&self, payload: Option<Value>) -> CacheResult<Settlement> {
        self.cache.request(self.key.clone(), Verb::Delete).execute(payload).await
    }
}
