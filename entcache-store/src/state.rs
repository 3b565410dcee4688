//! Per-entity and global cache state.

use entcache_types::{EntityKey, EntityRecord, ErrorInfo, RequestStatus};
use std::collections::HashMap;
use std::sync::Arc;

/// Identifying field used for update/delete merges when a registration
/// does not name one.
pub const DEFAULT_IDENT_FIELD: &str = "id";

/// Cached state for a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    /// Records in insertion/arrival order. Never mutated in place;
    /// every transition that changes data swaps in a new sequence.
    pub data: Arc<Vec<EntityRecord>>,
    /// Where the entity sits in its request lifecycle.
    pub status: RequestStatus,
    /// The failure from the last committed settlement, if it failed.
    pub error: Option<ErrorInfo>,
    /// Field records are matched on for upsert/delete merges.
    pub ident_field: String,
}

impl EntityState {
    /// Creates idle state holding the given initial data.
    #[must_use]
    pub fn new(initial_data: Vec<EntityRecord>, ident_field: impl Into<String>) -> Self {
        Self {
            data: Arc::new(initial_data),
            status: RequestStatus::Idle,
            error: None,
            ident_field: ident_field.into(),
        }
    }

    /// The records currently held for this entity.
    #[must_use]
    pub fn records(&self) -> &[EntityRecord] {
        &self.data
    }
}

impl Default for EntityState {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_IDENT_FIELD)
    }
}

/// The full cache state: one [`EntityState`] per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalState {
    pub(crate) entities: HashMap<EntityKey, EntityState>,
}

impl GlobalState {
    /// Creates an empty state map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the state for an entity.
    pub fn entity(&self, key: &EntityKey) -> Option<&EntityState> {
        self.entities.get(key)
    }

    /// Inserts (or replaces) an entity's state.
    pub fn insert(&mut self, key: EntityKey, state: EntityState) {
        self.entities.insert(key, state);
    }

    /// Whether the map holds state for `key`.
    #[must_use]
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// All keys currently holding state.
    pub fn entity_keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.entities.keys()
    }

    /// Number of entities holding state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity holds state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
