//! Uniform REST error responses.
//!
//! Every HTTP failure is rendered as one JSON shape:
//! `{"message": .., "status": .., "error": .., "causes": [..]}`.

use core::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable codes of the built-in constructors.
pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_SERVER_ERROR: &str = "internal_server_error";
}

/// Error value returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestError {
    pub message: String,
    pub status: u16,
    /// Short machine-readable code, e.g. `not_found`.
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

/// A payload that is not a JSON-encoded [`RestError`].
#[derive(Debug, Error)]
#[error("invalid rest error payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl RestError {
    pub fn new(
        message: impl Into<String>,
        status: u16,
        code: impl Into<String>,
        causes: Vec<String>,
    ) -> Self {
        Self {
            message: message.into(),
            status,
            error: code.into(),
            causes,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST.as_u16(), codes::BAD_REQUEST, Vec::new())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::NOT_FOUND.as_u16(), codes::NOT_FOUND, Vec::new())
    }

    /// A 500; the underlying error's message, if any, becomes the only cause.
    pub fn internal_server_error(message: impl Into<String>, cause: Option<&dyn fmt::Display>) -> Self {
        let causes = cause.map(|cause| vec![cause.to_string()]).unwrap_or_default();
        Self::new(
            message,
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            codes::INTERNAL_SERVER_ERROR,
            causes,
        )
    }

    /// Decodes an error body received from another service.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// The HTTP status; values outside the valid range map to 500.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "message: {} - status: {} - error: {} - causes: [{}]",
            self.message,
            self.status,
            self.error,
            self.causes.join(", ")
        )
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn internal_server_error_keeps_the_cause() {
        let db = std::io::Error::other("database error");
        let err = RestError::internal_server_error("this is the message", Some(&db));

        assert_eq!(err.status, 500);
        assert_eq!(err.message, "this is the message");
        assert_eq!(err.error, "internal_server_error");
        assert_eq!(err.causes, vec!["database error".to_string()]);
    }

    #[test]
    fn internal_server_error_without_cause_has_no_causes() {
        let err = RestError::internal_server_error("boom", None);
        assert!(err.causes.is_empty());
    }

    #[test]
    fn bad_request_and_not_found_codes() {
        let bad = RestError::bad_request("invalid isbn");
        assert_eq!((bad.status, bad.error.as_str()), (400, "bad_request"));
        assert!(bad.causes.is_empty());

        let missing = RestError::not_found("book 12 not found");
        assert_eq!((missing.status, missing.error.as_str()), (404, "not_found"));
        assert_eq!(missing.message, "book 12 not found");
    }

    #[test]
    fn generic_constructor_keeps_everything() {
        let err = RestError::new("slow down", 429, "too_many_requests", vec!["quota".into()]);
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.error, "too_many_requests");
        assert_eq!(err.causes, vec!["quota".to_string()]);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let err = RestError::new("conflict", 409, "conflict", vec!["version 3".into()]);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "message": "conflict",
                "status": 409,
                "error": "conflict",
                "causes": ["version 3"],
            })
        );
    }

    #[test]
    fn empty_causes_are_omitted() {
        let value = serde_json::to_value(RestError::not_found("gone")).unwrap();
        assert!(value.get("causes").is_none());
    }

    #[test]
    fn from_bytes_decodes_payloads_with_or_without_causes() {
        let err = RestError::from_bytes(br#"{"message":"no user","status":404,"error":"not_found"}"#)
            .unwrap();
        assert_eq!(err, RestError::not_found("no user"));

        let wire = serde_json::to_vec(&RestError::internal_server_error("x", Some(&"db down"))).unwrap();
        let decoded = RestError::from_bytes(&wire).unwrap();
        assert_eq!(decoded.causes, vec!["db down".to_string()]);
    }

    #[test]
    fn from_bytes_rejects_invalid_json() {
        let err = RestError::from_bytes(b"not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid rest error payload"));
    }

    #[test]
    fn invalid_status_falls_back_to_500() {
        let err = RestError::new("odd", 42, "odd", Vec::new());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_lists_causes() {
        let err = RestError::new("m", 400, "bad_request", vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "message: m - status: 400 - error: bad_request - causes: [a, b]");
    }
}
