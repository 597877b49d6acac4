//! Client error types.

use pmdesk_core::StoreError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Uniform error surfaced to callers.
///
/// Every variant carries a status via [`ApiError::status`]; failures that
/// never produced a response report `0`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("Network error: request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-supplied `detail`, or the status text.
        message: String,
        /// Structured error body, when the server sent JSON.
        detail: Option<Value>,
    },

    /// A success response could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The session store failed.
    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),

    /// Bad client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Create an HTTP error.
    pub fn http(status: u16, message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            detail,
        }
    }

    /// Build an HTTP error from a raw error response body.
    ///
    /// A JSON body keeps the whole document as detail and takes its message
    /// from a string `detail` field. A non-JSON body falls back to the
    /// canonical status text.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let fallback = format!("HTTP error! status: {}", status);

        match serde_json::from_slice::<Value>(body) {
            Ok(json) => {
                let message = json
                    .get("detail")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or(fallback);
                Self::http(status, message, Some(json))
            }
            Err(_) => {
                let message = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string)
                    .unwrap_or(fallback);
                Self::http(status, message, None)
            }
        }
    }

    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// HTTP status, or `0` when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,
            _ => 0,
        }
    }

    /// Structured detail payload, if the server supplied one.
    pub fn detail(&self) -> Option<&Value> {
        match self {
            Self::Http { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    /// Whether the backend rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }

    /// Whether the backend rejected the input.
    pub fn is_validation(&self) -> bool {
        self.status() == 422
    }

    /// Whether no response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_detail_becomes_message() {
        let err = ApiError::from_response(404, br#"{"detail":"Resource not found"}"#);
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Resource not found");
        assert_eq!(err.detail(), Some(&json!({ "detail": "Resource not found" })));
    }

    #[test]
    fn test_json_without_string_detail_keeps_payload() {
        let body = br#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#;
        let err = ApiError::from_response(422, body);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "HTTP error! status: 422");
        assert!(err.detail().unwrap()["detail"].is_array());
    }

    #[test]
    fn test_plain_body_uses_status_text() {
        let err = ApiError::from_response(502, b"<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Bad Gateway");
        assert!(err.detail().is_none());
    }

    #[test]
    fn test_unknown_status_without_body() {
        let err = ApiError::from_response(599, b"");
        assert_eq!(err.to_string(), "HTTP error! status: 599");
    }

    #[test]
    fn test_network_errors_report_zero() {
        assert_eq!(ApiError::network("connection refused").status(), 0);
        assert_eq!(ApiError::Timeout.status(), 0);
        assert!(ApiError::Timeout.is_network());
        assert!(!ApiError::http(500, "x", None).is_network());
    }

    #[test]
    fn test_unauthorized() {
        assert!(ApiError::http(401, "Authentication required", None).is_unauthorized());
        assert!(!ApiError::http(403, "forbidden", None).is_unauthorized());
    }
}
