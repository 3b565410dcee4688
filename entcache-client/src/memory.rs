//! In-memory reference adapter.

use crate::adapter::{Adapter, AdapterError, AdapterResult};
use async_trait::async_trait;
use entcache_types::{EntityKey, Verb};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A complete adapter backed by an in-process record list.
///
/// Useful as a stand-in backend in tests and demos; it implements every
/// verb with the same merge conventions the reducer uses (upsert and
/// delete match on the identifying field).
pub struct MemoryAdapter {
    ident_field: String,
    records: Mutex<Vec<Value>>,
}

impl MemoryAdapter {
    /// Creates an empty backend matching records on `"id"`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ident_field("id")
    }

    /// Creates an empty backend matching records on the given field.
    #[must_use]
    pub fn with_ident_field(field: impl Into<String>) -> Self {
        Self {
            ident_field: field.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Seeds the backend with existing records.
    #[must_use]
    pub fn with_records(self, records: Vec<Value>) -> Self {
        *self.lock_records() = records;
        self
    }

    /// Snapshot of the backend's current records.
    #[must_use]
    pub fn records(&self) -> Vec<Value> {
        self.lock_records().clone()
    }

    fn lock_records(&self) -> MutexGuard<'_, Vec<Value>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ident_of<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match value.get(self.ident_field.as_str()) {
            Some(Value::Null) | None => None,
            Some(ident) => Some(ident),
        }
    }

    fn position_of(&self, records: &[Value], value: &Value) -> Option<usize> {
        let ident = self.ident_of(value)?;
        records.iter().position(|r| self.ident_of(r) == Some(ident))
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    async fn get(&self, _key: &EntityKey, _query: Option<Value>) -> AdapterResult {
        Ok(Value::Array(self.lock_records().clone()))
    }

    async fn post(&self, _key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        let payload = payload.ok_or(AdapterError::MissingPayload(Verb::Post))?;
        self.lock_records().push(payload.clone());
        Ok(payload)
    }

    async fn put(&self, _key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        let payload = payload.ok_or(AdapterError::MissingPayload(Verb::Put))?;
        let mut records = self.lock_records();
        match self.position_of(&records, &payload) {
            Some(index) => records[index] = payload.clone(),
            None => records.push(payload.clone()),
        }
        Ok(payload)
    }

    async fn patch(&self, _key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        let payload = payload.ok_or(AdapterError::MissingPayload(Verb::Patch))?;
        let mut records = self.lock_records();
        match self.position_of(&records, &payload) {
            Some(index) => {
                // shallow field merge into the stored record
                if let (Value::Object(stored), Value::Object(incoming)) =
                    (&mut records[index], &payload)
                {
                    for (field, value) in incoming {
                        stored.insert(field.clone(), value.clone());
                    }
                } else {
                    records[index] = payload.clone();
                }
                Ok(records[index].clone())
            }
            None => {
                records.push(payload.clone());
                Ok(payload)
            }
        }
    }

    async fn delete(&self, _key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        let payload = payload.ok_or(AdapterError::MissingPayload(Verb::Delete))?;
        let mut records = self.lock_records();
        if let Some(index) = self.position_of(&records, &payload) {
            records.remove(index);
        }
        Ok(Value::Null)
    }
}
