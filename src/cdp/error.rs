//! CDP error types.

use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not found or not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// A binding with this name is already registered.
    #[error("Binding '{0}' already exists")]
    BindingExists(String),

    /// No tracked binding with this name.
    #[error("Binding '{0}' is not registered")]
    BindingNotFound(String),

    /// Binding name rejected before reaching the driver.
    #[error("Invalid binding name: {0}")]
    InvalidBindingName(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Session closed.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// Whether this failure means a binding of the requested name is
    /// already in place, either tracked by the session or reported by
    /// the driver in an error message.
    pub fn is_binding_exists(&self) -> bool {
        match self {
            CdpError::BindingExists(_) => true,
            CdpError::Protocol { message, .. } => message.contains("already exists"),
            CdpError::JavaScript(text) => text.contains("already exists"),
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_exists_variant() {
        assert!(CdpError::BindingExists("foo".to_string()).is_binding_exists());
    }

    #[test]
    fn test_protocol_message_classified() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "Binding 'foo' already exists on the page".to_string(),
        };
        assert!(err.is_binding_exists());
    }

    #[test]
    fn test_javascript_message_classified() {
        let err = CdpError::JavaScript("window['foo'] already exists".to_string());
        assert!(err.is_binding_exists());
    }

    #[test]
    fn test_unrelated_failures_not_classified() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "Target closed".to_string(),
        };
        assert!(!err.is_binding_exists());
        assert!(!CdpError::SessionClosed.is_binding_exists());
        assert!(!CdpError::Timeout("Runtime.evaluate".to_string()).is_binding_exists());
    }
}
