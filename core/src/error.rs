//! Error types for the LUMINA API client.
//!
//! # Design
//! Every failure a gateway can surface lands in the single `ApiError` enum —
//! callers never see transport-level errors directly. Messages for non-2xx
//! responses come from an ordered chain of named extractors over the JSON
//! error payload, so a new backend error shape only needs a new extractor,
//! not changes at call sites.

use serde_json::Value;
use thiserror::Error;

use crate::types::Role;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by gateway operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached at all (DNS, refused connection,
    /// broken transfer). The message embeds the resolved base URL since it
    /// is the only diagnostic surfaced to the end user.
    #[error("failed to reach the API at {base_url} ({detail}); check the URL and that the backend is running")]
    Connection { base_url: String, detail: String },

    /// The backend answered with a non-2xx status. `message` is extracted
    /// from the structured error payload when one parses.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Login succeeded but the account's role is not the one the caller
    /// asked for. No session is persisted when this is returned.
    #[error("account is registered as {actual}, not {expected}")]
    RoleMismatch { expected: Role, actual: Role },

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// One attempt at pulling a human-readable message out of an error payload.
type Extractor = fn(&Value) -> Option<String>;

/// Tried in order; first hit wins.
const EXTRACTORS: &[Extractor] = &[detail_string, validation_list, error_field];

/// FastAPI-style `{"detail": "Invalid credentials"}`.
fn detail_string(payload: &Value) -> Option<String> {
    payload.get("detail")?.as_str().map(str::to_string)
}

/// FastAPI validation errors: `{"detail": [{"msg": "field required", ...}]}`.
/// Only the first entry is surfaced.
fn validation_list(payload: &Value) -> Option<String> {
    payload
        .get("detail")?
        .as_array()?
        .first()?
        .get("msg")?
        .as_str()
        .map(str::to_string)
}

/// Generic `{"error": "..."}` shape.
fn error_field(payload: &Value) -> Option<String> {
    payload.get("error")?.as_str().map(str::to_string)
}

/// Build the uniform error for a non-2xx response. Falls back to a generic
/// status-coded message when no structured payload parses.
pub(crate) fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|payload| EXTRACTORS.iter().find_map(|extract| extract(&payload)))
        .unwrap_or_else(|| format!("Error: {status}"));
    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(error: ApiError) -> String {
        match error {
            ApiError::Status { message, .. } => message,
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn extracts_detail_string() {
        let err = status_error(401, r#"{"detail": "Invalid credentials"}"#);
        assert_eq!(message_of(err), "Invalid credentials");
    }

    #[test]
    fn extracts_first_validation_message() {
        let err = status_error(
            422,
            r#"{"detail":[{"loc":["body","password"],"msg":"field required"},{"msg":"other"}]}"#,
        );
        assert_eq!(message_of(err), "field required");
    }

    #[test]
    fn extracts_generic_error_field() {
        let err = status_error(500, r#"{"error": "database exploded"}"#);
        assert_eq!(message_of(err), "database exploded");
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = status_error(502, "<html>Bad Gateway</html>");
        assert_eq!(message_of(err), "Error: 502");
    }

    #[test]
    fn parseable_but_unknown_shape_falls_back_to_status() {
        let err = status_error(418, r#"{"teapot": true}"#);
        assert_eq!(message_of(err), "Error: 418");
    }

    #[test]
    fn connection_error_mentions_base_url() {
        let err = ApiError::Connection {
            base_url: "http://localhost:8000/api".to_string(),
            detail: "connection refused".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("http://localhost:8000/api"));
        assert!(rendered.contains("connection refused"));
    }

    #[test]
    fn role_mismatch_names_both_roles() {
        let err = ApiError::RoleMismatch {
            expected: Role::Student,
            actual: Role::Teacher,
        };
        assert_eq!(err.to_string(), "account is registered as teacher, not student");
    }
}
