//! Backend adapter contract.
//!
//! An adapter supplies the asynchronous verb implementations for one
//! entity. The cache owns merge semantics and race protection; the
//! adapter owns its protocol. Verbs an adapter leaves to the default
//! bodies report [`AdapterError::Unsupported`] — absent, never a no-op.

use async_trait::async_trait;
use entcache_types::{EntityKey, ErrorInfo, Verb};
use serde_json::Value;
use thiserror::Error;

/// Result of one adapter verb invocation.
pub type AdapterResult = Result<Value, AdapterError>;

/// Failures an adapter verb can report. Captured into the entity's state
/// by the request lifecycle, never raised across entities.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The adapter does not implement this verb.
    #[error("verb {0} not supported by this adapter")]
    Unsupported(Verb),

    /// The verb requires a payload and none was given.
    #[error("verb {0} requires a payload")]
    MissingPayload(Verb),

    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a failure.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A payload or response could not be encoded/decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdapterError {
    /// The state-capturable form of this failure.
    #[must_use]
    pub fn info(&self) -> ErrorInfo {
        match self {
            AdapterError::Unsupported(verb) => ErrorInfo::unsupported(*verb),
            AdapterError::Transport(message) => ErrorInfo::transport(message.clone()),
            other => ErrorInfo::adapter(other.to_string()),
        }
    }
}

/// The fixed verb interface backends implement.
///
/// Implement only the verbs the backend actually supports; the cache
/// surfaces the rest as unsupported. `get` receives the caller's query,
/// the mutating verbs receive the caller's payload.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Fetches the full record set.
    async fn get(&self, _key: &EntityKey, _query: Option<Value>) -> AdapterResult {
        Err(AdapterError::Unsupported(Verb::Get))
    }

    /// Creates a record.
    async fn post(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
        Err(AdapterError::Unsupported(Verb::Post))
    }

    /// Replaces a record.
    async fn put(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
        Err(AdapterError::Unsupported(Verb::Put))
    }

    /// Partially updates a record.
    async fn patch(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
        Err(AdapterError::Unsupported(Verb::Patch))
    }

    /// Deletes a record.
    async fn delete(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
        Err(AdapterError::Unsupported(Verb::Delete))
    }

    /// Dispatches a verb dynamically.
    async fn call(&self, verb: Verb, key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        match verb {
            Verb::Get => self.get(key, payload).await,
            Verb::Post => self.post(key, payload).await,
            Verb::Put => self.put(key, payload).await,
            Verb::Patch => self.patch(key, payload).await,
            Verb::Delete => self.delete(key, payload).await,
        }
    }
}

/// Scripted adapters for tests.
pub mod mock {
    use super::{Adapter, AdapterError, AdapterResult};
    use async_trait::async_trait;
    use entcache_types::{EntityKey, Verb};
    use serde_json::Value;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tokio::sync::oneshot;

    enum Scripted {
        Ready(AdapterResult),
        Gated(oneshot::Receiver<AdapterResult>),
    }

    /// An adapter that answers from scripted responses, consumed per verb
    /// in queue order.
    ///
    /// A gated response settles only when its sender fires, which makes
    /// out-of-order completion reproducible in tests. Verbs with no
    /// scripted response behave as unsupported.
    #[derive(Default)]
    pub struct MockAdapter {
        scripts: Mutex<HashMap<Verb, VecDeque<Scripted>>>,
    }

    impl MockAdapter {
        /// Creates a mock with no scripted responses.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues an immediate response for a verb.
        pub fn respond(&self, verb: Verb, result: AdapterResult) {
            self.lock_scripts()
                .entry(verb)
                .or_default()
                .push_back(Scripted::Ready(result));
        }

        /// Queues a gated response for a verb; it settles with whatever
        /// the returned sender fires.
        pub fn respond_gated(&self, verb: Verb) -> oneshot::Sender<AdapterResult> {
            let (tx, rx) = oneshot::channel();
            self.lock_scripts()
                .entry(verb)
                .or_default()
                .push_back(Scripted::Gated(rx));
            tx
        }

        /// Number of responses still queued for a verb.
        #[must_use]
        pub fn remaining(&self, verb: Verb) -> usize {
            self.lock_scripts().get(&verb).map_or(0, VecDeque::len)
        }

        fn lock_scripts(&self) -> MutexGuard<'_, HashMap<Verb, VecDeque<Scripted>>> {
            self.scripts.lock().unwrap_or_else(PoisonError::into_inner)
        }

        async fn next(&self, verb: Verb) -> AdapterResult {
            let scripted = self.lock_scripts().get_mut(&verb).and_then(VecDeque::pop_front);
            match scripted {
                None => Err(AdapterError::Unsupported(verb)),
                Some(Scripted::Ready(result)) => result,
                Some(Scripted::Gated(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(AdapterError::Transport("mock sender dropped".into()))),
            }
        }
    }

    #[async_trait]
    impl Adapter for MockAdapter {
        async fn get(&self, _key: &EntityKey, _query: Option<Value>) -> AdapterResult {
            self.next(Verb::Get).await
        }

        async fn post(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
            self.next(Verb::Post).await
        }

        async fn put(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
            self.next(Verb::Put).await
        }

        async fn patch(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
            self.next(Verb::Patch).await
        }

        async fn delete(&self, _key: &EntityKey, _payload: Option<Value>) -> AdapterResult {
            self.next(Verb::Delete).await
        }
    }
}
