//! Capability surface the exposer needs from a driver's page object.

use async_trait::async_trait;
use serde_json::Value;

use crate::cdp::{BindingHandler, CdpError, PageSession};

/// A live page handle, described only by the capabilities
/// [`crate::ensure_exposed`] uses.
///
/// Binding removal is optional across drivers. Rather than probing for
/// the method at runtime, implementors state the capability up front
/// via [`supports_binding_removal`](PageHandle::supports_binding_removal);
/// the exposer skips the removal step (and records that it did) when
/// the capability is absent.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Whether the driver can remove a tracked binding by name.
    fn supports_binding_removal(&self) -> bool;

    /// Remove a driver-tracked binding by name.
    async fn remove_exposed_function(&self, name: &str) -> Result<(), CdpError>;

    /// Evaluate an expression in page context, returning its value.
    async fn evaluate(&self, expression: &str) -> Result<Value, CdpError>;

    /// Register `handler` so page code can call `window[name](...)`.
    async fn expose_function(&self, name: &str, handler: BindingHandler)
        -> Result<(), CdpError>;
}

#[async_trait]
impl PageHandle for PageSession {
    fn supports_binding_removal(&self) -> bool {
        true
    }

    async fn remove_exposed_function(&self, name: &str) -> Result<(), CdpError> {
        PageSession::remove_exposed_function(self, name).await
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        PageSession::evaluate(self, expression).await
    }

    async fn expose_function(
        &self,
        name: &str,
        handler: BindingHandler,
    ) -> Result<(), CdpError> {
        PageSession::expose_function(self, name, handler).await
    }
}
