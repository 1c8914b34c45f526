//! Idempotent page-function bindings over the Chrome DevTools Protocol.
//!
//! A browser automation driver tracks exposed-function bindings in two
//! places: its own session state and a property on the page's global
//! object. After a navigation the two desynchronize (the page side is
//! wiped while the session side survives, or the reverse after a session
//! reset), so a naive re-registration fails with a spurious "already
//! exists" error. [`ensure_exposed`] makes re-registration idempotent
//! across navigation boundaries.
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  Rust backend   │ ◄──────────────► │  Chrome/Chromium │
//! │  (this crate)   │       CDP        │                  │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Setup
//!
//! Start Chrome with remote debugging enabled:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pagebind::{ensure_exposed, CdpClient};
//!
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page(None).await?;
//!
//! let handler = Arc::new(|args: Vec<serde_json::Value>| {
//!     serde_json::json!({ "received": args.len() })
//! });
//!
//! // Page code can now call `notifyHost(...)` and await the result.
//! ensure_exposed(&page, "notifyHost", handler.clone()).await?;
//!
//! // Safe to call again after a reload: the stale binding is cleaned
//! // up or reused instead of failing.
//! page.reload().await?;
//! ensure_exposed(&page, "notifyHost", handler).await?;
//! ```
//!
//! ## Cleanup policies
//!
//! Three policies govern what happens to a pre-existing binding:
//! [`ExposePolicy::TolerateExisting`] (the default) cleans up
//! best-effort and accepts a surviving binding, [`ExposePolicy::SkipIfBound`]
//! reuses whatever is bound without re-registering, and
//! [`ExposePolicy::ForceRegister`] insists on a fresh registration.
//! Every cleanup step's outcome is recorded in the returned
//! [`ExposeReport`] rather than silently swallowed.

pub mod cdp;
mod expose;
mod host;

pub use cdp::{BindingHandler, CdpClient, CdpError, PageSession};
pub use expose::{
    ensure_exposed, ensure_exposed_with, CleanupStep, ExposePolicy, ExposeReport, Registration,
    StepOutcome, StepReport,
};
pub use host::PageHandle;
