//! Outbound request description.
//!
//! An [`ApiRequest`] is a plain value rather than a `reqwest::Request`, so
//! the same request can be built again when it is replayed after a token
//! refresh.

use crate::config::ClientConfig;
use crate::error::ApiResult;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// Multipart field name.
    pub field: String,
    /// File name sent to the server.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
    /// Content type of the file.
    pub mime: mime::Mime,
}

impl FilePayload {
    /// A file in the `file` field, typed as `application/octet-stream`.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime: mime::APPLICATION_OCTET_STREAM,
        }
    }

    /// Set the content type.
    #[must_use]
    pub fn with_mime(mut self, mime: mime::Mime) -> Self {
        self.mime = mime;
        self
    }

    fn to_form(&self) -> ApiResult<Form> {
        let part = Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name.clone())
            .mime_str(self.mime.as_ref())?;
        Ok(Form::new().part(self.field.clone(), part))
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` with a single file.
    Multipart(FilePayload),
}

/// A request against the configured backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
    skip_auth_refresh: bool,
    retried: bool,
}

impl ApiRequest {
    /// Create a request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            skip_auth_refresh: false,
            retried: false,
        }
    }

    /// GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach form fields.
    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Attach a file as multipart form data.
    #[must_use]
    pub fn multipart(mut self, file: FilePayload) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Never try to refresh the session for this request.
    ///
    /// Used for the session endpoints themselves.
    #[must_use]
    pub fn skip_auth_refresh(mut self) -> Self {
        self.skip_auth_refresh = true;
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Endpoint path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Whether auth handling is skipped.
    pub fn skips_auth_refresh(&self) -> bool {
        self.skip_auth_refresh
    }

    /// Whether this request has already been replayed after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Build the transport request.
    pub(crate) fn build(
        &self,
        client: &Client,
        config: &ClientConfig,
        token: Option<&str>,
    ) -> ApiResult<RequestBuilder> {
        let url = config.url_for(&self.path);
        let mut builder = client.request(self.method.clone(), url);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart(file) => builder.multipart(file.to_form()?),
        };

        Ok(builder)
    }
}
