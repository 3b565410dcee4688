use entcache_client::{
    mock::MockAdapter, CacheConfig, Defined, EntityCache, EntityDef, MemoryAdapter,
};
use entcache_store::StoreEvent;
use entcache_types::{Action, EntityKey, EntityRecord, RequestStatus, Verb};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn key(name: &str) -> EntityKey {
    EntityKey::from(name)
}

// ── define ───────────────────────────────────────────────────────

#[tokio::test]
async fn define_seeds_idle_state_with_initial_data() {
    let cache = EntityCache::new();
    let outcome = cache.define(
        "notes",
        EntityDef::new(Arc::new(MemoryAdapter::new()))
            .with_initial_data([EntityRecord::new(json!({"id": 1}))]),
    );

    assert_eq!(outcome, Defined::Fresh);
    let entity = cache.store().entity(&key("notes")).unwrap();
    assert_eq!(entity.status, RequestStatus::Idle);
    assert_eq!(entity.records().len(), 1);
    assert_eq!(entity.ident_field, "id");
}

#[tokio::test]
async fn redefining_replaces_the_adapter_observably() {
    let cache = EntityCache::new();
    cache.define("notes", EntityDef::new(Arc::new(MemoryAdapter::new())));

    let second = Arc::new(MockAdapter::new());
    second.respond(Verb::Get, Ok(json!([{"id": 42}])));
    let outcome = cache.define("notes", EntityDef::new(second));

    assert_eq!(outcome, Defined::Replaced);
    assert!(outcome.replaced());

    // the new adapter answers subsequent requests
    cache.get("notes").execute(None).await.unwrap();
    let entity = cache.store().entity(&key("notes")).unwrap();
    assert_eq!(entity.records()[0].get_number("/id"), Some(42.0));
}

#[tokio::test]
async fn define_honors_custom_ident_field() {
    let cache = EntityCache::new();
    cache.define(
        "users",
        EntityDef::new(Arc::new(MemoryAdapter::with_ident_field("uuid")))
            .with_ident_field("uuid"),
    );
    assert_eq!(
        cache.store().entity(&key("users")).unwrap().ident_field,
        "uuid"
    );
}

#[tokio::test]
async fn config_sets_the_default_ident_field() {
    let cache = EntityCache::with_config(CacheConfig {
        default_ident_field: "uuid".into(),
    });
    cache.define("users", EntityDef::new(Arc::new(MemoryAdapter::new())));
    assert_eq!(
        cache.store().entity(&key("users")).unwrap().ident_field,
        "uuid"
    );
}

// ── keys & contains ──────────────────────────────────────────────

#[tokio::test]
async fn keys_lists_registrations_sorted() {
    let cache = EntityCache::new();
    cache.define("orders", EntityDef::new(Arc::new(MemoryAdapter::new())));
    cache.define("notes", EntityDef::new(Arc::new(MemoryAdapter::new())));

    assert_eq!(cache.keys(), vec![key("notes"), key("orders")]);
    assert!(cache.contains(&key("notes")));
    assert!(!cache.contains(&key("ghost")));
}

// ── remove_all ───────────────────────────────────────────────────

#[tokio::test]
async fn remove_all_clears_state_but_keeps_registrations() {
    let adapter = Arc::new(MockAdapter::new());
    adapter.respond(Verb::Get, Ok(json!([{"id": 1}])));
    let cache = EntityCache::new();
    cache.define("notes", EntityDef::new(adapter));
    cache.get("notes").execute(None).await.unwrap();

    cache.remove_all();

    assert!(cache.store().snapshot().is_empty());
    assert_eq!(cache.keys(), vec![key("notes")]);
}

#[tokio::test]
async fn requests_after_remove_all_reseed_entity_state() {
    let adapter = Arc::new(MockAdapter::new());
    adapter.respond(Verb::Get, Ok(json!([{"id": 1}])));
    adapter.respond(Verb::Get, Ok(json!([{"id": 2}])));
    let cache = EntityCache::new();
    cache.define(
        "notes",
        EntityDef::new(adapter).with_ident_field("uuid"),
    );
    cache.get("notes").execute(None).await.unwrap();

    cache.remove_all();
    cache.get("notes").execute(None).await.unwrap();

    let entity = cache.store().entity(&key("notes")).unwrap();
    assert_eq!(entity.records()[0].get_number("/id"), Some(2.0));
    // merge configuration survived the reset
    assert_eq!(entity.ident_field, "uuid");
}

// ── store exposure ───────────────────────────────────────────────

#[tokio::test]
async fn store_dispatch_is_open_for_middleware() {
    let cache = EntityCache::new();
    cache.define("notes", EntityDef::new(Arc::new(MemoryAdapter::new())));

    cache.store().dispatch(&Action::success(
        key("notes"),
        Verb::Get,
        1,
        None,
        json!([{"id": 1}]),
    ));

    assert_eq!(cache.store().entity(&key("notes")).unwrap().records().len(), 1);
}

#[tokio::test]
async fn store_subscriptions_fire_on_request_lifecycles() {
    let adapter = Arc::new(MockAdapter::new());
    adapter.respond(Verb::Get, Ok(json!([])));
    let cache = EntityCache::new();
    cache.define("notes", EntityDef::new(adapter));

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _sub = cache.store().subscribe_key(key("notes"), move |event: &StoreEvent| {
        sink.lock().unwrap().push(event.clone());
    });

    cache.get("notes").execute(None).await.unwrap();

    // one event for start, one for the committed settlement
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            StoreEvent::Changed(key("notes")),
            StoreEvent::Changed(key("notes"))
        ]
    );
}
