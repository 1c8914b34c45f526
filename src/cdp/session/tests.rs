use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::bindings::{channel_name, deliver_script, install_script, CHANNEL_PREFIX};
use super::core::PageSession;
use crate::cdp::client::Wire;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::BindingPayload;
use crate::cdp::BindingHandler;

/// A session over a live socket whose peer never answers, so every
/// driver command fails (by timeout under a paused clock).
async fn unanswered_session() -> (PageSession, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client = TcpStream::connect(addr).await.unwrap();
    let (peer, _) = listener.accept().await.unwrap();

    let ws =
        WebSocketStream::from_raw_socket(MaybeTlsStream::Plain(client), Role::Client, None).await;
    let (ws_sink, _ws_source) = ws.split();
    let wire = Arc::new(Wire::new(ws_sink));
    let (_event_tx, event_rx) = mpsc::unbounded_channel();

    let session = PageSession::new(
        "target-1".to_string(),
        "session-1".to_string(),
        wire,
        event_rx,
    );
    (session, peer)
}

#[tokio::test(start_paused = true)]
async fn test_failed_removal_keeps_binding_tracked() {
    let (session, _peer) = unanswered_session().await;
    let handler: BindingHandler = Arc::new(|_args| json!(null));
    session
        .bindings
        .lock()
        .insert("notify".to_string(), handler);

    let err = session.remove_exposed_function("notify").await.unwrap_err();

    assert!(matches!(err, CdpError::Timeout(_)));
    // The driver call failed, so the handler must still be registered.
    assert!(session.bindings.lock().contains_key("notify"));
}

#[tokio::test(start_paused = true)]
async fn test_untracked_removal_fails_without_driver_call() {
    let (session, _peer) = unanswered_session().await;

    let err = session.remove_exposed_function("notify").await.unwrap_err();

    // Fails on the registry check alone; no command is sent, so no
    // timeout is involved.
    assert!(matches!(err, CdpError::BindingNotFound(_)));
}

#[test]
fn test_channel_name_prefixed() {
    assert_eq!(channel_name("notify"), "__pagebind_notify");
    assert!(channel_name("notify").starts_with(CHANNEL_PREFIX));
}

#[test]
fn test_install_script_guards_occupied_slot() {
    let script = install_script("notify").unwrap();
    assert!(script.contains("\"notify\""));
    assert!(script.contains("\"__pagebind_notify\""));
    assert!(script.contains("already exists"));
    assert!(script.contains("JSON.stringify"));
}

#[test]
fn test_install_script_escapes_name() {
    // A hostile name must land as a string literal, not as syntax.
    let script = install_script("a\"b").unwrap();
    assert!(script.contains(r#""a\"b""#));
}

#[test]
fn test_deliver_script_targets_sequence() {
    let script = deliver_script("notify", 7, &json!({"ok": true})).unwrap();
    assert!(script.contains("\"__pagebind_notify\""));
    assert!(script.contains("pending.get(7)"));
    assert!(script.contains(r#"{"ok":true}"#));
}

#[test]
fn test_wrapper_payload_parses() {
    // What the install script's wrapper sends through the channel.
    let payload: BindingPayload =
        serde_json::from_str(r#"{"seq":3,"args":["x",1,{"k":null}]}"#).unwrap();
    assert_eq!(payload.seq, 3);
    assert_eq!(payload.args.len(), 3);
    assert_eq!(payload.args[0], json!("x"));
}
