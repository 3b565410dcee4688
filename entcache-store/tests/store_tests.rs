use entcache_store::{EntityState, Store, StoreEvent};
use entcache_types::{Action, EntityKey, EntityRecord, RequestStatus, Verb};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn key(name: &str) -> EntityKey {
    EntityKey::from(name)
}

fn collector() -> (Arc<Mutex<Vec<StoreEvent>>>, impl Fn(&StoreEvent) + Send + Sync) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    (events, move |event: &StoreEvent| {
        sink.lock().unwrap().push(event.clone());
    })
}

// ── Dispatch & snapshots ─────────────────────────────────────────

#[test]
fn dispatch_applies_the_reducer() {
    let store = Store::new();
    store.dispatch(&Action::success(key("notes"), Verb::Get, 1, None, json!([{"id": 1}])));

    let entity = store.entity(&key("notes")).unwrap();
    assert_eq!(entity.status, RequestStatus::Success);
    assert_eq!(entity.records().len(), 1);
}

#[test]
fn snapshot_is_detached_from_later_dispatches() {
    let store = Store::new();
    store.dispatch(&Action::success(key("notes"), Verb::Get, 1, None, json!([{"id": 1}])));

    let snapshot = store.snapshot();
    store.dispatch(&Action::success(key("notes"), Verb::Get, 2, None, json!([])));

    assert_eq!(snapshot.entity(&key("notes")).unwrap().records().len(), 1);
    assert!(store.entity(&key("notes")).unwrap().records().is_empty());
}

#[test]
fn seed_establishes_idle_state() {
    let store = Store::new();
    store.seed(
        key("notes"),
        EntityState::new(vec![EntityRecord::new(json!({"id": 1}))], "id"),
    );

    let entity = store.entity(&key("notes")).unwrap();
    assert_eq!(entity.status, RequestStatus::Idle);
    assert_eq!(entity.records().len(), 1);
    assert_eq!(entity.ident_field, "id");
}

#[test]
fn entity_is_none_for_unknown_key() {
    let store = Store::new();
    assert!(store.entity(&key("nope")).is_none());
}

// ── Subscriptions ────────────────────────────────────────────────

#[test]
fn subscribers_hear_every_dispatch() {
    let store = Store::new();
    let (events, listener) = collector();
    let _sub = store.subscribe(listener);

    store.dispatch(&Action::start(key("a"), Verb::Get, 1, None));
    store.dispatch(&Action::start(key("b"), Verb::Get, 1, None));

    assert_eq!(
        *events.lock().unwrap(),
        vec![StoreEvent::Changed(key("a")), StoreEvent::Changed(key("b"))]
    );
}

#[test]
fn key_scoped_subscribers_only_hear_their_key() {
    let store = Store::new();
    let (events, listener) = collector();
    let _sub = store.subscribe_key(key("a"), listener);

    store.dispatch(&Action::start(key("a"), Verb::Get, 1, None));
    store.dispatch(&Action::start(key("b"), Verb::Get, 1, None));

    assert_eq!(*events.lock().unwrap(), vec![StoreEvent::Changed(key("a"))]);
}

#[test]
fn key_scoped_subscribers_hear_resets() {
    let store = Store::new();
    let (events, listener) = collector();
    let _sub = store.subscribe_key(key("a"), listener);

    store.reset();

    assert_eq!(*events.lock().unwrap(), vec![StoreEvent::Reset]);
}

#[test]
fn notification_happens_before_dispatch_returns() {
    let store = Store::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let reader = store.clone();
    let _sub = store.subscribe(move |_| {
        // the new state is already visible to listeners
        let status = reader.entity(&key("a")).unwrap().status;
        sink.lock().unwrap().push(status);
    });

    store.dispatch(&Action::start(key("a"), Verb::Get, 1, None));
    assert_eq!(*seen.lock().unwrap(), vec![RequestStatus::Loading]);
}

#[test]
fn dropping_the_subscription_unsubscribes() {
    let store = Store::new();
    let (events, listener) = collector();
    let sub = store.subscribe(listener);

    store.dispatch(&Action::start(key("a"), Verb::Get, 1, None));
    drop(sub);
    store.dispatch(&Action::start(key("a"), Verb::Get, 2, None));

    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn explicit_unsubscribe_matches_drop() {
    let store = Store::new();
    let (events, listener) = collector();
    let sub = store.subscribe(listener);

    sub.unsubscribe();
    store.dispatch(&Action::start(key("a"), Verb::Get, 1, None));

    assert!(events.lock().unwrap().is_empty());
}

// ── Reset ────────────────────────────────────────────────────────

#[test]
fn reset_clears_all_entities() {
    let store = Store::new();
    store.dispatch(&Action::success(key("a"), Verb::Get, 1, None, json!([{"id": 1}])));
    store.dispatch(&Action::success(key("b"), Verb::Get, 1, None, json!([{"id": 2}])));

    store.reset();

    assert!(store.snapshot().is_empty());
}

#[test]
fn reset_emits_a_single_event() {
    let store = Store::new();
    let (events, listener) = collector();
    store.dispatch(&Action::start(key("a"), Verb::Get, 1, None));
    let _sub = store.subscribe(listener);

    store.reset();

    assert_eq!(*events.lock().unwrap(), vec![StoreEvent::Reset]);
}

// ── Clones share state ───────────────────────────────────────────

#[test]
fn clones_share_the_same_state() {
    let store = Store::new();
    let clone = store.clone();
    clone.dispatch(&Action::success(key("a"), Verb::Get, 1, None, json!([{"id": 1}])));

    assert!(store.entity(&key("a")).is_some());
}
