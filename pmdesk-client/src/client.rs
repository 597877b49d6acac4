//! Authenticated API client.

use crate::config::{ClientConfig, RefreshPolicy};
use crate::error::{ApiError, ApiResult};
use crate::files::FileClient;
use crate::request::ApiRequest;
use crate::resource::Resource;
use crate::response::{check_response, ApiResponse};
use pmdesk_core::{Reference, ReferenceKind, Session, TokenResponse, Visibility};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// HTTP client for a single backend origin.
///
/// Attaches the session's bearer token to every request. A 401 on a request
/// that has not been replayed yet, is not flagged to skip auth handling and
/// does not race a logout triggers exactly one refresh followed by one
/// replay. A failed refresh clears the session and surfaces the original
/// error.
///
/// Cloning is cheap; clones share the transport and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    config: ClientConfig,
    session: Session,
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Create a client with its own transport.
    ///
    /// The transport keeps cookies, which carry the refresh credential.
    pub fn new(config: ClientConfig, session: Session) -> ApiResult<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(ref user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, config, session))
    }

    /// Create a client with a custom transport.
    pub fn with_client(http: Client, config: ClientConfig, session: Session) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                config,
                session,
                refresh_gate: Mutex::new(()),
            }),
        }
    }

    /// Create a client configured from the environment.
    pub fn from_env(session: Session) -> ApiResult<Self> {
        Self::new(ClientConfig::from_env()?, session)
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// The underlying transport.
    pub fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Perform a request.
    pub async fn call(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let token = self.inner.session.token().await?;

        match self.send(&request, token.as_deref()).await {
            Err(err) if err.is_unauthorized() => self.recover(request, token, err).await,
            other => other,
        }
    }

    /// Perform a request and decode its JSON body.
    pub async fn call_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.call(request).await?.json()
    }

    /// Exchange the current session for a new token and store it.
    ///
    /// The refresh endpoint is called without a body; the refresh credential
    /// travels in the transport's cookie jar.
    pub async fn refresh_session(&self) -> ApiResult<TokenResponse> {
        let token = self.inner.session.token().await?;
        let request =
            ApiRequest::get(self.inner.config.endpoints.refresh.as_str()).skip_auth_refresh();

        let renewed: TokenResponse = self.send(&request, token.as_deref()).await?.json()?;
        self.inner
            .session
            .store_token(&renewed.access_token, &renewed.token_type)
            .await?;

        info!(token_type = %renewed.token_type, "Session token refreshed");
        Ok(renewed)
    }

    /// Generic resource client rooted at `path`.
    pub fn resource<T: DeserializeOwned>(&self, path: impl Into<String>) -> Resource<T> {
        Resource::new(self.clone(), path)
    }

    /// Client for one reference-data table.
    pub fn references(&self, kind: ReferenceKind) -> Resource<Reference> {
        let prefix = self.inner.config.endpoints.references.trim_end_matches('/');
        Resource::with_item_path(
            self.clone(),
            format!("{}/{}", prefix, kind.collection_segment()),
            format!("{}/{}", prefix, kind.item_segment()),
        )
    }

    /// Client for the public or private file bucket.
    pub fn files(&self, visibility: Visibility) -> FileClient {
        FileClient::new(self.clone(), visibility)
    }

    async fn recover(
        &self,
        mut request: ApiRequest,
        sent_with: Option<String>,
        original: ApiError,
    ) -> ApiResult<ApiResponse> {
        if request.is_retried() || request.skips_auth_refresh() {
            return Err(original);
        }

        if self.inner.session.is_logging_out() {
            debug!(path = %request.path(), "Logout in progress, not refreshing");
            return Err(original);
        }

        let token = match self.renew_token(sent_with.as_deref()).await {
            Ok(token) => token,
            Err(err) => {
                warn!(
                    path = %request.path(),
                    error = %err,
                    "Token refresh failed, clearing session"
                );
                if let Err(err) = self.inner.session.clear_token().await {
                    warn!(error = %err, "Failed to clear session after refresh failure");
                }
                return Err(original);
            }
        };

        request.mark_retried();
        debug!(
            method = %request.method(),
            path = %request.path(),
            "Replaying request with renewed token"
        );
        self.send(&request, Some(&token)).await
    }

    async fn renew_token(&self, sent_with: Option<&str>) -> ApiResult<String> {
        match self.inner.config.refresh {
            RefreshPolicy::PerRequest => Ok(self.refresh_session().await?.access_token),
            RefreshPolicy::Coalesced => {
                let _gate = self.inner.refresh_gate.lock().await;

                match (self.inner.session.token().await?, sent_with) {
                    (Some(current), Some(sent)) if current != sent => {
                        debug!("Token already renewed by a concurrent refresh");
                        return Ok(current);
                    }
                    // A concurrent refresh failed and cleared the session.
                    (None, Some(_)) => {
                        return Err(ApiError::http(401, "Session expired", None));
                    }
                    _ => {}
                }

                Ok(self.refresh_session().await?.access_token)
            }
        }
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> ApiResult<ApiResponse> {
        debug!(
            method = %request.method(),
            path = %request.path(),
            retried = request.is_retried(),
            authenticated = token.is_some(),
            "Making HTTP request"
        );

        let response = request
            .build(&self.inner.http, &self.inner.config, token)?
            .send()
            .await
            .map_err(ApiError::from)?;

        check_response(response).await
    }
}
