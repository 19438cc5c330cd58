//! Request and Response message types.
//!
//! Defines the message format for command requests and responses
//! between the kiosk (local end) and the extension (remote end).

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{FrameId, RequestId, TabId};

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// A command request from local end to remote end.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "method": "module.methodName",
///   "tabId": 1,
///   "frameId": 0,
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// Target tab ID.
    #[serde(rename = "tabId")]
    pub tab_id: TabId,

    /// Target frame ID (0 = main frame).
    #[serde(rename = "frameId")]
    pub frame_id: FrameId,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a request for the main frame of `tab_id`.
    #[inline]
    #[must_use]
    pub fn new(tab_id: TabId, command: Command) -> Self {
        Self {
            id: RequestId::generate(),
            tab_id,
            frame_id: FrameId::main(),
            command,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from remote end to local end.
///
/// # Format
///
/// ```json
/// { "id": "uuid", "type": "success", "result": { ... } }
/// { "id": "uuid", "type": "error", "error": "code", "message": "text" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the command `id`.
    pub id: RequestId,

    /// Response type.
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error code (if error).
    #[serde(default)]
    pub error: Option<String>,

    /// Error message (if error).
    #[serde(default)]
    pub message: Option<String>,
}

impl Response {
    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }

    /// Converts an error response into [`Error::Protocol`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] carrying the remote message.
    pub fn into_checked(self) -> Result<Self> {
        match self.response_type {
            ResponseType::Success => Ok(self),
            ResponseType::Error => {
                let code = self.error.unwrap_or_else(|| "unknown error".to_string());
                let message = self.message.unwrap_or_else(|| code.clone());
                Err(Error::protocol(format!("{code}: {message}")))
            }
        }
    }

    /// Gets a string value from the result.
    #[inline]
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
    }

    /// Gets a u64 value from the result.
    #[inline]
    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_u64)
    }
}

// ============================================================================
// ResponseType
// ============================================================================

/// Response type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Successful response.
    Success,
    /// Error response.
    Error,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BrowsingContextCommand;

    #[test]
    fn test_request_serialization() {
        let tab_id = TabId::new(4).expect("valid tab id");
        let command = Command::BrowsingContext(BrowsingContextCommand::Navigate {
            url: "https://grafana.example/d/power".to_string(),
        });

        let request = Request::new(tab_id, command);
        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["method"], "browsingContext.navigate");
        assert_eq!(json["tabId"], 4);
        assert_eq!(json["frameId"], 0);
        assert_eq!(json["params"]["url"], "https://grafana.example/d/power");
    }

    #[test]
    fn test_success_response() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "success",
            "result": {"tabId": 7, "data": "aGk="}
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.is_success());
        assert_eq!(response.get_u64("tabId"), Some(7));
        assert_eq!(response.get_str("data"), Some("aGk="));
        assert_eq!(response.get_str("missing"), None);
    }

    #[test]
    fn test_error_response_is_checked() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "error",
            "error": "no such tab",
            "message": "Tab 9 does not exist"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        let err = response.into_checked().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Protocol error: no such tab: Tab 9 does not exist"
        );
    }
}
