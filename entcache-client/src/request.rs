//! Per-verb request lifecycle.
//!
//! A `RequestHandle` is bound to one (key, verb) pair and runs the full
//! protocol: issue a generation, dispatch start, await the adapter, then
//! commit the settlement only if no newer request for the same pair was
//! issued meanwhile. Callers may execute repeatedly before prior calls
//! settle; only the most recently issued call's settlement is ever
//! committed, regardless of completion order.

use crate::adapter::AdapterError;
use crate::cache::EntityCache;
use crate::error::{CacheError, CacheResult};
use entcache_types::{Action, EntityKey, EntityRecord, ErrorInfo, RequestStatus, Verb};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshot returned to request-handle consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestView {
    /// The entity's records, in insertion/arrival order.
    pub data: Arc<Vec<EntityRecord>>,
    /// Where the entity sits in its request lifecycle.
    pub status: RequestStatus,
    /// The failure from the last committed settlement, if it failed.
    pub error: Option<ErrorInfo>,
}

/// How an `execute` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The settlement was committed to the store.
    Committed,
    /// A newer request for the same (key, verb) was issued while this one
    /// was in flight; its result was discarded. Not an error.
    Stale,
}

/// A live view plus `execute` for one (key, verb) pair.
#[derive(Clone)]
pub struct RequestHandle {
    cache: EntityCache,
    key: EntityKey,
    verb: Verb,
}

impl RequestHandle {
    pub(crate) fn new(cache: EntityCache, key: EntityKey, verb: Verb) -> Self {
        Self { cache, key, verb }
    }

    /// The entity key this handle addresses.
    #[must_use]
    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    /// The verb this handle runs.
    #[must_use]
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// The entity's current {data, status, error} view.
    #[must_use]
    pub fn snapshot(&self) -> RequestView {
        match self.cache.inner.store.entity(&self.key) {
            Some(state) => RequestView {
                data: state.data,
                status: state.status,
                error: state.error,
            },
            None => RequestView {
                data: Arc::new(Vec::new()),
                status: RequestStatus::Idle,
                error: None,
            },
        }
    }

    /// Runs one request lifecycle with the given payload.
    ///
    /// Returns `Err` only for configuration mistakes (unknown key,
    /// unsupported verb). Backend failures settle into the entity's
    /// state and return `Ok(Settlement::Committed)`; superseded requests
    /// return `Ok(Settlement::Stale)`.
    pub async fn execute(&self, payload: Option<Value>) -> CacheResult<Settlement> {
        self.execute_commit_as(payload, self.verb).await
    }

    /// Like [`execute`](Self::execute), but commits the settlement with a
    /// different verb's merge semantics. The optimistic entity handle
    /// uses this to settle a post as an upsert.
    pub(crate) async fn execute_commit_as(
        &self,
        payload: Option<Value>,
        commit_verb: Verb,
    ) -> CacheResult<Settlement> {
        let inner = &self.cache.inner;
        let Some(registration) = inner.registry.registration(&self.key) else {
            return Err(CacheError::UnknownKey(self.key.clone()));
        };
        self.cache.ensure_entity(&self.key, &registration);

        let generation = inner.generations.begin(&self.key, self.verb);
        inner.store.dispatch(&Action::start(
            self.key.clone(),
            self.verb,
            generation,
            payload.clone(),
        ));

        let result = registration
            .adapter
            .call(self.verb, &self.key, payload.clone())
            .await;

        let committed =
            inner
                .generations
                .commit_if_latest(&self.key, self.verb, generation, || match &result {
                    Ok(value) => inner.store.dispatch(&Action::success(
                        self.key.clone(),
                        commit_verb,
                        generation,
                        payload.clone(),
                        value.clone(),
                    )),
                    Err(error) => inner.store.dispatch(&Action::error(
                        self.key.clone(),
                        commit_verb,
                        generation,
                        error.info(),
                    )),
                });

        if !committed {
            debug!(key = %self.key, verb = %self.verb, generation, "dropping stale settlement");
            return Ok(Settlement::Stale);
        }

        if let Err(AdapterError::Unsupported(verb)) = &result {
            warn!(key = %self.key, verb = %verb, "executed a verb the adapter does not implement");
            return Err(CacheError::Unsupported {
                key: self.key.clone(),
                verb: *verb,
            });
        }

        Ok(Settlement::Committed)
    }
}
