//! Bus payload types.
//!
//! # Format
//!
//! Request (connector → provider, event `<COMMAND>`):
//! ```json
//! { "params": { ... }, "requestId": "uuid" }
//! ```
//!
//! Response (provider → connector, event `message`):
//! ```json
//! { "result": { ... }, "error": null, "requestId": "uuid" }
//! { "result": null, "error": { "message": "..." }, "requestId": "uuid" }
//! ```
//!
//! Registration (provider → connector, event `register`):
//! ```json
//! { "providerName": "BEARBY" }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

// ============================================================================
// RequestMessage
// ============================================================================

/// A request published on a provider channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    /// Command parameters, opaque to the connector.
    pub params: Value,

    /// Correlation id echoed back in the response.
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
}

impl RequestMessage {
    /// Creates a request message.
    #[inline]
    #[must_use]
    pub fn new(request_id: RequestId, params: Value) -> Self {
        Self { params, request_id }
    }
}

// ============================================================================
// ResponseMessage
// ============================================================================

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
}

impl RemoteError {
    /// Builds an error from whatever a provider put in `error`.
    ///
    /// `null` means no error. A string, or an object with a string
    /// `message`, supplies the message directly; any other shape is kept
    /// as its JSON text.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let message = match value {
            Value::Null => return None,
            Value::String(message) => message,
            Value::Object(ref fields) => match fields.get("message") {
                Some(Value::String(message)) => message.clone(),
                _ => value.to_string(),
            },
            other => other.to_string(),
        };
        Some(Self { message })
    }
}

fn lenient_error<'de, D>(deserializer: D) -> std::result::Result<Option<RemoteError>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(RemoteError::from_value))
}

/// A response posted by a provider on the main channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error (if failure). Any non-null shape counts as a failure.
    #[serde(default, deserialize_with = "lenient_error")]
    pub error: Option<RemoteError>,

    /// Matches the request's `requestId`.
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
}

impl ResponseMessage {
    /// Creates a success response.
    #[must_use]
    pub fn success(request_id: RequestId, result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
            request_id,
        }
    }

    /// Creates an error response.
    #[must_use]
    pub fn failure(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(RemoteError {
                message: message.into(),
            }),
            request_id,
        }
    }

    /// Converts into the value handed to the waiting request.
    ///
    /// An error object wins over any result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the provider reported an error.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(error) => Err(Error::remote(error.message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

// ============================================================================
// RegisterMessage
// ============================================================================

/// Announcement a provider posts on the main channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMessage {
    /// Unique provider name.
    #[serde(rename = "providerName")]
    pub provider_name: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let id = RequestId::generate();
        let message = RequestMessage::new(id, json!({"foo": 1}));
        let value = serde_json::to_value(&message).expect("serialize");

        assert_eq!(value["params"], json!({"foo": 1}));
        assert_eq!(value["requestId"], json!(id.to_string()));
    }

    #[test]
    fn test_response_success_parsing() {
        let id = RequestId::generate();
        let value = json!({"result": {"bar": 2}, "error": null, "requestId": id.to_string()});
        let response: ResponseMessage = serde_json::from_value(value).expect("parse");

        assert_eq!(response.request_id, id);
        assert_eq!(response.into_result().expect("success"), json!({"bar": 2}));
    }

    #[test]
    fn test_response_error_parsing() {
        let id = RequestId::generate();
        let value = json!({"error": {"message": "denied"}, "requestId": id.to_string()});
        let response: ResponseMessage = serde_json::from_value(value).expect("parse");

        let err = response.into_result().unwrap_err();
        assert!(matches!(err, Error::Remote { ref message } if message == "denied"));
    }

    #[test]
    fn test_off_shape_errors_still_fail() {
        let id = RequestId::generate().to_string();
        let cases = [
            (json!("user rejected"), "user rejected"),
            (json!({"message": 42}), r#"{"message":42}"#),
            (json!({"code": 4001}), r#"{"code":4001}"#),
            (json!(false), "false"),
        ];

        for (error, expected) in cases {
            let response: ResponseMessage =
                serde_json::from_value(json!({"error": error, "requestId": id})).expect("parse");
            let err = response.into_result().unwrap_err();
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_error_wins_over_result() {
        let id = RequestId::generate();
        let value = json!({"result": {"bar": 2}, "error": {"message": "denied"}, "requestId": id.to_string()});
        let response: ResponseMessage = serde_json::from_value(value).expect("parse");
        assert!(response.into_result().unwrap_err().is_remote());
    }

    #[test]
    fn test_response_without_result_is_null() {
        let id = RequestId::generate();
        let response: ResponseMessage =
            serde_json::from_value(json!({"requestId": id.to_string()})).expect("parse");
        assert_eq!(response.into_result().expect("success"), Value::Null);
    }

    #[test]
    fn test_register_parsing() -> anyhow::Result<()> {
        let message: RegisterMessage = serde_json::from_value(json!({"providerName": "BEARBY"}))?;
        assert_eq!(message.provider_name, "BEARBY");

        let round: RegisterMessage = serde_json::from_str(&serde_json::to_string(&message)?)?;
        assert_eq!(round, message);
        Ok(())
    }
}
