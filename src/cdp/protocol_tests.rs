use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 1,
        method: "Runtime.addBinding".to_string(),
        params: Some(serde_json::json!({"name": "__pagebind_notify"})),
        session_id: Some("session-1".to_string()),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("Runtime.addBinding"));
    assert!(json.contains("__pagebind_notify"));
    assert!(json.contains("sessionId"));
}

#[test]
fn test_cdp_request_skips_absent_fields() {
    let req = CdpRequest {
        id: 2,
        method: "Page.enable".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("params"));
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_response_deserialize() {
    let json = r#"{"id": 1, "result": {"frameId": "abc"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert!(resp.result.is_some());
    assert!(resp.error.is_none());
}

#[test]
fn test_cdp_event_deserialize() {
    let json = r#"{
        "method": "Runtime.bindingCalled",
        "params": {"name": "__pagebind_notify", "payload": "{}", "executionContextId": 3},
        "sessionId": "session-1"
    }"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, None);
    assert_eq!(resp.method.as_deref(), Some("Runtime.bindingCalled"));
    assert_eq!(resp.session_id.as_deref(), Some("session-1"));
}

#[test]
fn test_binding_called_deserialize() {
    let json = r#"{"name": "__pagebind_notify", "payload": "{\"seq\":1,\"args\":[42]}", "executionContextId": 7}"#;
    let event: BindingCalled = serde_json::from_str(json).unwrap();
    assert_eq!(event.name, "__pagebind_notify");
    assert_eq!(event.execution_context_id, 7);

    let payload: BindingPayload = serde_json::from_str(&event.payload).unwrap();
    assert_eq!(payload.seq, 1);
    assert_eq!(payload.args, vec![serde_json::json!(42)]);
}

#[test]
fn test_page_info_deserialize() {
    let json = r#"{
        "id": "page123",
        "type": "page",
        "title": "Test",
        "url": "https://example.com",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/page123"
    }"#;
    let info: PageInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.id, "page123");
    assert_eq!(info.page_type, "page");
}
