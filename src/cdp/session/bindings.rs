//! Exposed-function bindings for a CDP page session.
//!
//! `Runtime.addBinding` gives the page a raw channel function that takes
//! one string argument and fires `Runtime.bindingCalled` on our side. On
//! top of that channel a wrapper is installed at `window[name]` that
//! serializes call arguments, tags them with a sequence number, and
//! returns a Promise; the dispatch task invokes the registered handler
//! and resolves the Promise with the handler's result.
//!
//! Wrappers are installed with `Runtime.evaluate` only, never
//! `Page.addScriptToEvaluateOnNewDocument`, so a navigation wipes the
//! page side while the session registry and the raw binding survive.
//! [`crate::ensure_exposed`] is the recovery path for that split.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cdp::client::Wire;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::{BindingCalled, BindingPayload, CdpResponse};

use super::core::PageSession;

/// Host-side handler invoked when page code calls an exposed function.
pub type BindingHandler = Arc<dyn Fn(Vec<Value>) -> Value + Send + Sync>;

/// Handlers for exposed functions, keyed by binding name.
pub(super) type BindingRegistry = Arc<Mutex<HashMap<String, BindingHandler>>>;

/// Prefix for the raw CDP binding channel backing `window[name]`.
pub(super) const CHANNEL_PREFIX: &str = "__pagebind_";

pub(super) fn channel_name(name: &str) -> String {
    format!("{}{}", CHANNEL_PREFIX, name)
}

/// Build the page-side wrapper installed at `window[name]`.
///
/// The wrapper throws when the slot is already occupied; the resulting
/// evaluation error carries the "already exists" marker that
/// [`CdpError::is_binding_exists`] recognizes.
pub(super) fn install_script(name: &str) -> serde_json::Result<String> {
    let name_lit = serde_json::to_string(name)?;
    let channel_lit = serde_json::to_string(&channel_name(name))?;
    Ok(format!(
        r#"(() => {{
    const name = {name_lit};
    const channel = {channel_lit};
    if (name in window) {{
        throw new Error("window['" + name + "'] already exists");
    }}
    const state = {{ seq: 0, pending: new Map() }};
    window[channel + "__state"] = state;
    window[name] = (...args) => {{
        const seq = ++state.seq;
        const promise = new Promise((resolve, reject) => {{
            state.pending.set(seq, {{ resolve, reject }});
        }});
        window[channel](JSON.stringify({{ seq, args }}));
        return promise;
    }};
}})()"#
    ))
}

/// Build the page-side expression that resolves one pending call.
pub(super) fn deliver_script(
    name: &str,
    seq: u64,
    result: &Value,
) -> serde_json::Result<String> {
    let channel_lit = serde_json::to_string(&channel_name(name))?;
    let result_json = serde_json::to_string(result)?;
    Ok(format!(
        r#"(() => {{
    const state = window[{channel_lit} + "__state"];
    if (!state) return;
    const entry = state.pending.get({seq});
    if (!entry) return;
    state.pending.delete({seq});
    entry.resolve({result_json});
}})()"#
    ))
}

impl PageSession {
    /// Register `handler` so page code can call `window[name](...)`.
    ///
    /// The call returns a Promise on the page side, resolved with the
    /// handler's result. Fails with [`CdpError::BindingExists`] when the
    /// name is already tracked by this session or `window[name]` is
    /// already occupied.
    pub async fn expose_function(
        &self,
        name: &str,
        handler: BindingHandler,
    ) -> Result<(), CdpError> {
        if self.bindings.lock().contains_key(name) {
            return Err(CdpError::BindingExists(name.to_string()));
        }

        self.call(
            "Runtime.addBinding",
            Some(json!({ "name": channel_name(name) })),
        )
        .await?;

        match self.evaluate(&install_script(name)?).await {
            Ok(_) => {}
            Err(e) if e.is_binding_exists() => {
                return Err(CdpError::BindingExists(name.to_string()));
            }
            Err(e) => return Err(e),
        }

        self.bindings.lock().insert(name.to_string(), handler);
        debug!("Exposed function '{}' on session {}", name, self.session_id);
        Ok(())
    }

    /// Remove a previously exposed function.
    ///
    /// Fails with [`CdpError::BindingNotFound`] when the name is not
    /// tracked by this session.
    pub async fn remove_exposed_function(&self, name: &str) -> Result<(), CdpError> {
        if !self.bindings.lock().contains_key(name) {
            return Err(CdpError::BindingNotFound(name.to_string()));
        }
        let name_lit = serde_json::to_string(name)?;

        // Unregister at the driver before dropping the handler, so a
        // failed call leaves the binding tracked and still serviceable.
        self.call(
            "Runtime.removeBinding",
            Some(json!({ "name": channel_name(name) })),
        )
        .await?;

        self.bindings.lock().remove(name);

        // The wrapper may be gone already after a navigation.
        let _ = self.evaluate(&format!("delete window[{name_lit}]")).await;

        debug!(
            "Removed exposed function '{}' from session {}",
            name, self.session_id
        );
        Ok(())
    }
}

/// Consume Runtime events for one session, routing `bindingCalled` to
/// the registered handler and resolving the page-side Promise.
pub(super) fn spawn_dispatch(
    wire: Arc<Wire>,
    session_id: String,
    bindings: BindingRegistry,
    mut event_rx: mpsc::UnboundedReceiver<CdpResponse>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if event.method.as_deref() != Some("Runtime.bindingCalled") {
                continue;
            }
            let Some(params) = event.params else {
                continue;
            };
            let call: BindingCalled = match serde_json::from_value(params) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Malformed bindingCalled event: {}", e);
                    continue;
                }
            };
            let Some(name) = call.name.strip_prefix(CHANNEL_PREFIX) else {
                continue;
            };

            let handler = bindings.lock().get(name).cloned();
            let Some(handler) = handler else {
                warn!("bindingCalled for untracked binding '{}'", name);
                continue;
            };

            let payload: BindingPayload = match serde_json::from_str(&call.payload) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Malformed payload for binding '{}': {}", name, e);
                    continue;
                }
            };

            let result = handler(payload.args);

            match deliver_script(name, payload.seq, &result) {
                Ok(script) => {
                    let params = json!({
                        "expression": script,
                        "returnByValue": true,
                    });
                    if let Err(e) = wire
                        .call("Runtime.evaluate", Some(params), Some(&session_id))
                        .await
                    {
                        warn!("Failed to deliver result for binding '{}': {}", name, e);
                    }
                }
                Err(e) => {
                    warn!("Failed to serialize result for binding '{}': {}", name, e);
                }
            }
        }

        debug!("Binding dispatch ended for session {}", session_id);
    })
}
