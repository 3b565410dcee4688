//! The reactive store.
//!
//! Holds the current [`GlobalState`], applies actions through the reducer,
//! and notifies subscribers. Dispatch is atomic from the caller's
//! perspective: the state swap and all notifications happen under one
//! gate, so no concurrent dispatch can interleave with them.
//!
//! Listeners run synchronously inside `dispatch` and must not dispatch
//! themselves; they may freely read snapshots.

use crate::reducer::reduce;
use crate::state::{EntityState, GlobalState};
use entcache_types::{Action, EntityKey};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

/// Emitted to subscribers after each state change.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// One entity's state changed.
    Changed(EntityKey),
    /// The whole state map was cleared.
    Reset,
}

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

struct Subscriber {
    id: u64,
    key: Option<EntityKey>,
    listener: Listener,
}

impl Subscriber {
    fn wants(&self, event: &StoreEvent) -> bool {
        match (&self.key, event) {
            (None, _) | (_, StoreEvent::Reset) => true,
            (Some(key), StoreEvent::Changed(changed)) => key == changed,
        }
    }
}

struct StoreInner {
    state: Mutex<GlobalState>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_subscriber_id: AtomicU64,
    /// Serializes dispatches, including their notification pass.
    dispatch_gate: Mutex<()>,
}

/// The reactive state container. Cheap to clone; clones share state.
///
/// Never a process-wide singleton: construct one per cache (or per test)
/// and drop it when done.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(GlobalState::new()),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber_id: AtomicU64::new(1),
                dispatch_gate: Mutex::new(()),
            }),
        }
    }

    /// A snapshot of the full state. Cheap: record sequences are shared.
    #[must_use]
    pub fn snapshot(&self) -> GlobalState {
        lock(&self.inner.state).clone()
    }

    /// A snapshot of one entity's state.
    pub fn entity(&self, key: &EntityKey) -> Option<EntityState> {
        lock(&self.inner.state).entity(key).cloned()
    }

    /// Applies an action through the reducer and notifies subscribers
    /// before returning.
    pub fn dispatch(&self, action: &Action) {
        let _gate = lock(&self.inner.dispatch_gate);
        {
            let mut state = lock(&self.inner.state);
            *state = reduce(&state, action);
        }
        debug!(
            key = %action.key,
            verb = %action.verb,
            phase = action.phase_name(),
            generation = action.generation,
            "applied action"
        );
        self.notify(&StoreEvent::Changed(action.key.clone()));
    }

    /// Seeds an entity's state directly (registration path).
    pub fn seed(&self, key: EntityKey, entity: EntityState) {
        let _gate = lock(&self.inner.dispatch_gate);
        lock(&self.inner.state).insert(key.clone(), entity);
        self.notify(&StoreEvent::Changed(key));
    }

    /// Clears all entity state. Subscribers see a single `Reset` event.
    pub fn reset(&self) {
        let _gate = lock(&self.inner.dispatch_gate);
        *lock(&self.inner.state) = GlobalState::new();
        self.notify(&StoreEvent::Reset);
    }

    /// Subscribes to every state change.
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) -> Subscription {
        self.add_subscriber(None, Arc::new(listener))
    }

    /// Subscribes to changes of a single entity (and resets).
    pub fn subscribe_key(
        &self,
        key: EntityKey,
        listener: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.add_subscriber(Some(key), Arc::new(listener))
    }

    fn add_subscriber(&self, key: Option<EntityKey>, listener: Listener) -> Subscription {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.subscribers).push(Subscriber { id, key, listener });
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn notify(&self, event: &StoreEvent) {
        let listeners: Vec<Listener> = lock(&self.inner.subscribers)
            .iter()
            .filter(|s| s.wants(event))
            .map(|s| Arc::clone(&s.listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to an active subscription. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    inner: Weak<StoreInner>,
}

impl Subscription {
    /// Explicitly ends the subscription (same as dropping).
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner.subscribers).retain(|s| s.id != self.id);
        }
    }
}

/// Locks ignoring poisoning: guarded values are plain data and stay
/// consistent even if a panic unwound through a listener.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
