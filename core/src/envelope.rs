//! The transport-independent outcome of an operation.

use crate::error::{ErrorCode, GatewayError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized result of one operation.
///
/// Serialized with the field names callers of the platform API already know
/// (`success`, `message`, `data`). A failed envelope never carries data and
/// always carries a `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Whether the operation succeeded.
    #[serde(rename = "success")]
    pub ok: bool,
    /// Human-readable status, populated on success too.
    pub message: String,
    /// Payload, `None` whenever `ok` is false.
    pub data: Option<Value>,
    /// Failure kind, `None` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl ResultEnvelope {
    /// A successful envelope.
    #[must_use]
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data: Some(data),
            code: None,
        }
    }

    /// A failed envelope for `error`.
    ///
    /// Unexpected faults are logged with their internal detail here and
    /// rendered with a generic message.
    #[must_use]
    pub fn failure(error: &GatewayError) -> Self {
        if let GatewayError::UnexpectedFault { detail } = error {
            tracing::error!(detail = %detail, "unexpected fault");
        }
        Self {
            ok: false,
            message: error.to_string(),
            data: None,
            code: Some(error.code()),
        }
    }

    /// Fold an operation result into an envelope.
    #[must_use]
    pub fn from_result(result: Result<(String, Value), GatewayError>) -> Self {
        match result {
            Ok((message, data)) => Self::success(message, data),
            Err(error) => Self::failure(&error),
        }
    }

    /// Whether two envelopes agree on outcome and payload.
    ///
    /// Messages may legitimately differ in wording between transports; the
    /// outcome and payload may not.
    #[must_use]
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.ok == other.ok && self.data == other.data && self.code == other.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let envelope = ResultEnvelope::success("ok", json!({"notes": []}));
        let wire = serde_json::to_value(&envelope).unwrap_or_default();
        assert_eq!(
            wire,
            json!({"success": true, "message": "ok", "data": {"notes": []}})
        );
    }

    #[test]
    fn test_failure_has_no_data() {
        let envelope = ResultEnvelope::failure(&GatewayError::CredentialMissing);
        assert!(!envelope.ok);
        assert!(envelope.data.is_none());
        assert!(!envelope.message.is_empty());

        let wire = serde_json::to_value(&envelope).unwrap_or_default();
        assert_eq!(wire["code"], "CREDENTIAL_MISSING");
        assert_eq!(wire["data"], Value::Null);
    }

    #[test]
    fn test_fault_message_is_generic() {
        let envelope =
            ResultEnvelope::from_result(Err(GatewayError::fault("db password=hunter2")));
        assert!(!envelope.message.contains("hunter2"));
        assert_eq!(envelope.code, Some(ErrorCode::UnexpectedFault));
    }

    #[test]
    fn test_same_outcome_ignores_message() {
        let a = ResultEnvelope::success("fetched 2 items", json!([1, 2]));
        let b = ResultEnvelope::success("done", json!([1, 2]));
        let c = ResultEnvelope::success("done", json!([1]));
        assert!(a.same_outcome(&b));
        assert!(!a.same_outcome(&c));
    }
}
