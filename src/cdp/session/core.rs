//! Core session struct and CDP command dispatch.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cdp::client::Wire;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::CdpResponse;

use super::bindings::{self, BindingRegistry};

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// Command channel (shared with client).
    pub(super) wire: Arc<Wire>,
    /// Handlers for exposed functions, keyed by binding name.
    pub(super) bindings: BindingRegistry,
    /// Task consuming Runtime events for this session.
    dispatch_task: tokio::task::JoinHandle<()>,
}

impl PageSession {
    /// Create a new page session.
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        wire: Arc<Wire>,
        event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        let registry = BindingRegistry::default();
        let dispatch_task = bindings::spawn_dispatch(
            wire.clone(),
            session_id.clone(),
            registry.clone(),
            event_rx,
        );

        Self {
            target_id,
            session_id,
            wire,
            bindings: registry,
            dispatch_task,
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.wire.call(method, params, Some(&self.session_id)).await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.dispatch_task.abort();
    }
}
