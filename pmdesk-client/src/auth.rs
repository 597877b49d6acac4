//! Login, registration, identity and logout.

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::request::ApiRequest;
use parking_lot::RwLock;
use pmdesk_core::{AuthResponse, Registration, TokenResponse, User};
use tracing::{debug, info, warn};

/// Session lifecycle on top of an [`ApiClient`].
///
/// Keeps the identity of the signed-in account so callers can pick a
/// dashboard without asking the backend again.
#[derive(Debug)]
pub struct Authenticator {
    client: ApiClient,
    user: RwLock<Option<User>>,
}

impl Authenticator {
    /// Create an authenticator that starts signed out.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            user: RwLock::new(None),
        }
    }

    /// The client whose session this authenticator manages.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The cached account, if signed in.
    pub fn user(&self) -> Option<User> {
        self.user.read().clone()
    }

    /// Whether the session holds a token.
    pub async fn is_authenticated(&self) -> ApiResult<bool> {
        Ok(self.client.session().is_authenticated().await?)
    }

    /// Sign in with a username and password.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        let endpoints = &self.client.config().endpoints;
        let request = ApiRequest::post(endpoints.login.as_str())
            .form([("username", username), ("password", password)])
            .skip_auth_refresh();

        let token: TokenResponse = self.client.call_json(request).await?;
        self.client
            .session()
            .store_token(&token.access_token, &token.token_type)
            .await?;

        let user = self.current_user().await?;
        info!(user = %user.email, role = %user.role, "Logged in");
        *self.user.write() = Some(user.clone());
        Ok(user)
    }

    /// Create an account. The backend signs the new account in directly.
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<User> {
        let body = Registration {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post(self.client.config().endpoints.register.as_str())
            .json(&body)?
            .skip_auth_refresh();

        let auth: AuthResponse = self.client.call_json(request).await?;
        self.client
            .session()
            .store_token(&auth.access_token, &auth.token_type)
            .await?;

        info!(user = %auth.user.email, "Registered");
        *self.user.write() = Some(auth.user.clone());
        Ok(auth.user)
    }

    /// Fetch the account the current token belongs to.
    pub async fn current_user(&self) -> ApiResult<User> {
        let request = ApiRequest::get(self.client.config().endpoints.me.as_str());
        self.client.call_json(request).await
    }

    /// Resume a stored session.
    ///
    /// Returns `None` when there is no token or the token no longer
    /// identifies an account, in which case the token is discarded.
    pub async fn restore(&self) -> ApiResult<Option<User>> {
        if !self.client.session().is_authenticated().await? {
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) => {
                debug!(user = %user.email, "Session restored");
                *self.user.write() = Some(user.clone());
                Ok(Some(user))
            }
            Err(err) => {
                warn!(error = %err, "Stored session is no longer valid");
                self.client.session().clear_token().await?;
                *self.user.write() = None;
                Ok(None)
            }
        }
    }

    /// Sign out.
    ///
    /// A failing logout call is logged and otherwise ignored; the local
    /// session is cleared either way. While the call is in flight, 401s on
    /// other requests do not trigger a refresh.
    pub async fn logout(&self) -> ApiResult<()> {
        let session = self.client.session();
        let logging_out = session.begin_logout();

        let request =
            ApiRequest::post(self.client.config().endpoints.logout.as_str()).skip_auth_refresh();
        if let Err(err) = self.client.call(request).await {
            warn!(error = %err, "Logout request failed");
        }

        let cleared = session.clear_token().await;
        *self.user.write() = None;
        drop(logging_out);
        cleared?;

        info!("Logged out");
        Ok(())
    }
}

/// Message to show for a failed login.
pub fn login_failure_message(err: &ApiError) -> String {
    match err.status() {
        401 => "Invalid username or password.".to_string(),
        422 => "Please check your input data.".to_string(),
        _ if err.is_network() => "Could not reach the server.".to_string(),
        _ => err.to_string(),
    }
}
