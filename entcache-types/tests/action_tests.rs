use entcache_types::{Action, EntityKey, ErrorInfo, ErrorKind, Phase, RequestStatus, Verb};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Keys & verbs ─────────────────────────────────────────────────

#[test]
fn key_display_and_parse() {
    let key = EntityKey::from("notes");
    assert_eq!(key.to_string(), "notes");
    assert_eq!("notes".parse::<EntityKey>().unwrap(), key);
    assert_eq!(key.as_str(), "notes");
}

#[test]
fn verb_names() {
    assert_eq!(Verb::Get.to_string(), "get");
    assert_eq!(Verb::Delete.as_str(), "delete");
    assert_eq!(Verb::ALL.len(), 5);
}

#[test]
fn verb_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Verb::Patch).unwrap(), json!("patch"));
}

// ── Status ───────────────────────────────────────────────────────

#[test]
fn status_defaults_to_idle() {
    assert_eq!(RequestStatus::default(), RequestStatus::Idle);
    assert!(!RequestStatus::Idle.is_loading());
    assert!(RequestStatus::Loading.is_loading());
    assert!(RequestStatus::Error.is_error());
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_value(RequestStatus::Loading).unwrap(),
        json!("loading")
    );
}

// ── Actions ──────────────────────────────────────────────────────

#[test]
fn start_action_carries_payload() {
    let action = Action::start(EntityKey::from("notes"), Verb::Get, 1, Some(json!({"q": "x"})));
    assert_eq!(action.generation, 1);
    assert_eq!(action.phase_name(), "start");
    match &action.phase {
        Phase::Start { payload } => assert_eq!(payload, &Some(json!({"q": "x"}))),
        other => panic!("expected start phase, got {other:?}"),
    }
}

#[test]
fn success_action_carries_payload_and_result() {
    let action = Action::success(
        EntityKey::from("notes"),
        Verb::Delete,
        3,
        Some(json!({"id": 1})),
        json!(null),
    );
    assert_eq!(action.phase_name(), "success");
    match &action.phase {
        Phase::Success { payload, result } => {
            assert_eq!(payload, &Some(json!({"id": 1})));
            assert_eq!(result, &json!(null));
        }
        other => panic!("expected success phase, got {other:?}"),
    }
}

#[test]
fn error_action_carries_error_info() {
    let info = ErrorInfo::adapter("boom");
    let action = Action::error(EntityKey::from("notes"), Verb::Put, 2, info.clone());
    assert_eq!(action.phase_name(), "error");
    match &action.phase {
        Phase::Error { error } => assert_eq!(error, &info),
        other => panic!("expected error phase, got {other:?}"),
    }
}

#[test]
fn action_serde_round_trip() {
    let action = Action::success(
        EntityKey::from("orders"),
        Verb::Post,
        7,
        None,
        json!({"id": 4}),
    );
    let encoded = serde_json::to_string(&action).unwrap();
    let decoded: Action = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, action);
}

#[test]
fn phase_tag_is_readable() {
    let action = Action::start(EntityKey::from("notes"), Verb::Get, 1, None);
    let value = serde_json::to_value(&action).unwrap();
    assert_eq!(value["phase"]["phase"], json!("start"));
    assert_eq!(value["verb"], json!("get"));
}

// ── Error info ───────────────────────────────────────────────────

#[test]
fn unsupported_error_names_the_verb() {
    let info = ErrorInfo::unsupported(Verb::Patch);
    assert_eq!(info.kind, ErrorKind::Unsupported);
    assert!(info.message.contains("patch"));
}

#[test]
fn error_info_displays_its_message() {
    let info = ErrorInfo::transport("connection refused");
    assert_eq!(info.to_string(), "connection refused");
}
