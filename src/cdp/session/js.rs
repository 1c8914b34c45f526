//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate JavaScript expression.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception_text(exception);
            return Err(CdpError::JavaScript(text));
        }

        Ok(result["result"]["value"].clone())
    }
}

/// Pull the most specific message out of `exceptionDetails`.
///
/// `text` alone is usually just "Uncaught"; the thrown error's
/// description carries the message the caller needs (for example the
/// "already exists" marker from the binding install script).
fn exception_text(exception: &Value) -> String {
    if let Some(desc) = exception["exception"]["description"].as_str() {
        return desc.to_string();
    }
    exception["text"].as_str().unwrap_or("Unknown error").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_text_prefers_description() {
        let exception = json!({
            "text": "Uncaught",
            "exception": {"description": "Error: window['foo'] already exists"}
        });
        assert_eq!(
            exception_text(&exception),
            "Error: window['foo'] already exists"
        );
    }

    #[test]
    fn test_exception_text_falls_back_to_text() {
        let exception = json!({"text": "Execution context was destroyed"});
        assert_eq!(exception_text(&exception), "Execution context was destroyed");
    }
}
