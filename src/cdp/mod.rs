//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! A pure Rust CDP client scoped to page-function bindings: endpoint
//! discovery, a WebSocket JSON-RPC channel, per-page sessions,
//! JavaScript evaluation, navigation, and the binding machinery itself.
//!
//! ## Usage
//!
//! 1. Start Chrome with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=9222
//!    ```
//!
//! 2. Connect and expose a function:
//!    ```rust,ignore
//!    let client = CdpClient::connect("http://localhost:9222").await?;
//!    let page = client.new_page(None).await?;
//!    page.expose_function("notify", handler).await?;
//!    ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::{BindingHandler, PageSession};
