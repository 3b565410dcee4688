//! Pure state transitions.
//!
//! `reduce` computes the next global state from the current one and a
//! single action. It never mutates in place and never blocks; the store
//! owns atomicity. Merge semantics per verb on success:
//!
//! - `get` — replace the sequence wholesale (full-refresh)
//! - `post` — append the result
//! - `put`/`patch` — replace the first record whose identifying field
//!   matches the result, else append (upsert)
//! - `delete` — remove the first record whose identifying field matches
//!   the request payload
//!
//! Errors keep the last good data visible (stale-while-error); only
//! status and the error field change.

use crate::state::{EntityState, GlobalState};
use entcache_types::{Action, EntityRecord, Phase, RequestStatus, Verb};
use serde_json::Value;
use std::sync::Arc;

/// Computes the next global state. Actions for a key with no state yet
/// create a default entry first, so dispatch stays usable for
/// testing and middleware without prior seeding.
#[must_use]
pub fn reduce(state: &GlobalState, action: &Action) -> GlobalState {
    let mut next = state.clone();
    let entity = next.entities.entry(action.key.clone()).or_default();

    match &action.phase {
        Phase::Start { .. } => {
            entity.status = RequestStatus::Loading;
        }
        Phase::Success { payload, result } => {
            entity.data = Arc::new(merge_success(
                action.verb,
                &entity.data,
                &entity.ident_field,
                payload.as_ref(),
                result,
            ));
            entity.status = RequestStatus::Success;
            entity.error = None;
        }
        Phase::Error { error } => {
            entity.status = RequestStatus::Error;
            entity.error = Some(error.clone());
        }
    }

    next
}

fn merge_success(
    verb: Verb,
    data: &[EntityRecord],
    ident_field: &str,
    payload: Option<&Value>,
    result: &Value,
) -> Vec<EntityRecord> {
    match verb {
        Verb::Get => replace_all(result),
        Verb::Post => {
            let mut out = data.to_vec();
            out.push(EntityRecord::new(result.clone()));
            out
        }
        Verb::Put | Verb::Patch => upsert(data, ident_field, EntityRecord::new(result.clone())),
        Verb::Delete => remove_first(data, ident_field, payload),
    }
}

/// Full-refresh: the result becomes the whole sequence. Scalar results
/// become a one-record sequence; null clears.
fn replace_all(result: &Value) -> Vec<EntityRecord> {
    match result {
        Value::Array(items) => items.iter().cloned().map(EntityRecord::new).collect(),
        Value::Null => Vec::new(),
        other => vec![EntityRecord::new(other.clone())],
    }
}

fn upsert(data: &[EntityRecord], ident_field: &str, record: EntityRecord) -> Vec<EntityRecord> {
    let mut out = data.to_vec();
    match out.iter().position(|r| r.matches_ident(ident_field, &record)) {
        Some(index) => out[index] = record,
        None => out.push(record),
    }
    out
}

fn remove_first(
    data: &[EntityRecord],
    ident_field: &str,
    payload: Option<&Value>,
) -> Vec<EntityRecord> {
    let mut out = data.to_vec();
    let Some(payload) = payload else {
        return out;
    };
    let victim = EntityRecord::new(payload.clone());
    if let Some(index) = out.iter().position(|r| r.matches_ident(ident_field, &victim)) {
        out.remove(index);
    }
    out
}
