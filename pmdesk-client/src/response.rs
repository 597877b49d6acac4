//! Successful response handling.

use crate::error::{ApiError, ApiResult};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The server declared JSON.
    Json(Value),
    /// Anything else, read as text.
    Text(String),
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    content_type: Option<String>,
    body: Bytes,
}

impl ApiResponse {
    /// Assemble a response from its parts.
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// HTTP status.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Declared content type.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Whether the content type is JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// Raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Consume into the raw body.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Body as text (lossy UTF-8).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// JSON when declared, otherwise text.
    pub fn into_payload(self) -> ApiResult<Payload> {
        if self.is_json() {
            Ok(Payload::Json(serde_json::from_slice(&self.body)?))
        } else {
            Ok(Payload::Text(self.text()))
        }
    }
}

/// Turn a transport response into an [`ApiResponse`] or an [`ApiError`].
pub(crate) async fn check_response(response: Response) -> ApiResult<ApiResponse> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.bytes().await.map_err(ApiError::from)?;

    if !status.is_success() {
        return Err(ApiError::from_response(status.as_u16(), &body));
    }

    Ok(ApiResponse::new(status.as_u16(), content_type, body))
}
