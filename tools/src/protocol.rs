//! JSON-RPC 2.0 message types for the tool protocol.

use notebridge_core::ResultEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision announced when the client does not ask for one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The JSON is not a valid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters, including unknown tools.
pub const INVALID_PARAMS: i64 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

/// An incoming request or notification.
///
/// Notifications have no `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    /// Request id; absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Value,
}

impl Request {
    /// Whether this message expects no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    /// Error code.
    pub code: i64,
    /// Short description.
    pub message: String,
}

impl RpcError {
    /// An error with `code` and `message`.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// An outgoing response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Id of the request being answered; `null` if it could not be read.
    pub id: Value,
    /// Result on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    /// A successful response.
    #[must_use]
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// An error response.
    #[must_use]
    pub fn error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// `tools/call` parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    /// Tool name.
    pub name: String,
    /// Tool arguments.
    #[serde(default)]
    pub arguments: Value,
}

/// `notifications/cancelled` parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    /// Id of the request to cancel.
    pub request_id: Value,
    /// Optional reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// One content block of a tool result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
}

/// `tools/call` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    /// The envelope as JSON text.
    pub content: Vec<Content>,
    /// The envelope itself.
    pub structured_content: Value,
    /// Set for every failed envelope.
    pub is_error: bool,
}

impl CallToolResult {
    /// Wrap an operation envelope.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if the envelope cannot be encoded.
    pub fn from_envelope(envelope: &ResultEnvelope) -> Result<Self, serde_json::Error> {
        let structured = serde_json::to_value(envelope)?;
        Ok(Self {
            content: vec![Content::Text {
                text: serde_json::to_string(&structured)?,
            }],
            structured_content: structured,
            is_error: !envelope.ok,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use notebridge_core::GatewayError;
    use serde_json::json;

    #[test]
    fn test_notification_has_no_id() {
        let request: Request = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();
        assert!(request.is_notification());
        assert_eq!(request.params, Value::Null);
    }

    #[test]
    fn test_error_response_omits_result() {
        let response = Response::error(json!(7), RpcError::new(METHOD_NOT_FOUND, "nope"));
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"jsonrpc": "2.0", "id": 7, "error": {"code": -32601, "message": "nope"}})
        );
    }

    #[test]
    fn test_call_result_from_failed_envelope() {
        let envelope = ResultEnvelope::failure(&GatewayError::CredentialMissing);
        let result = CallToolResult::from_envelope(&envelope).unwrap();
        let encoded = serde_json::to_value(&result).unwrap();

        assert_eq!(encoded["isError"], json!(true));
        assert_eq!(encoded["content"][0]["type"], json!("text"));
        assert_eq!(encoded["structuredContent"]["success"], json!(false));
        assert_eq!(encoded["structuredContent"]["code"], json!("CREDENTIAL_MISSING"));

        let text = encoded["content"][0]["text"].as_str().unwrap();
        let reparsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(reparsed, encoded["structuredContent"]);
    }

    #[test]
    fn test_cancelled_params() {
        let params: CancelledParams =
            serde_json::from_value(json!({"requestId": "r-1", "reason": "user"})).unwrap();
        assert_eq!(params.request_id, json!("r-1"));
        assert_eq!(params.reason.as_deref(), Some("user"));
    }
}
