//! Client configuration.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable holding the backend origin.
pub const API_URL_ENV: &str = "PMDESK_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "PMDESK_TIMEOUT_SECONDS";
/// Backend origin used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// How 401 responses that race each other are refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Every request that hits a 401 refreshes on its own.
    #[default]
    PerRequest,
    /// Refreshes are serialised. A request whose token was already replaced
    /// by a concurrent refresh replays with that token instead.
    Coalesced,
}

/// Paths of every backend endpoint the client consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Session creation.
    pub login: String,
    /// Account registration.
    pub register: String,
    /// Session destruction.
    pub logout: String,
    /// Token renewal.
    pub refresh: String,
    /// Current identity.
    pub me: String,
    /// Prefix of the reference-data tables.
    pub references: String,
    /// Prefix of the public file bucket.
    pub public_files: String,
    /// Prefix of the private file bucket.
    pub private_files: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/account/login".to_string(),
            register: "/account/".to_string(),
            logout: "/account/logout".to_string(),
            refresh: "/account/refresh".to_string(),
            me: "/account/me".to_string(),
            references: "/references".to_string(),
            public_files: "/file".to_string(),
            private_files: "/private".to_string(),
        }
    }
}

/// Configuration for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin.
    pub base_url: Url,
    /// Request timeout in milliseconds. `None` or `0` leaves it to the
    /// transport.
    pub timeout_ms: Option<u64>,
    /// User agent header.
    pub user_agent: Option<String>,
    /// Endpoint paths.
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Refresh behaviour.
    #[serde(default)]
    pub refresh: RefreshPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout_ms: None,
            user_agent: Some(concat!("pmdesk/", env!("CARGO_PKG_VERSION")).to_string()),
            endpoints: Endpoints::default(),
            refresh: RefreshPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given origin.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Default::default()
        })
    }

    /// Build a config from `PMDESK_API_URL` and `PMDESK_TIMEOUT_SECONDS`.
    pub fn from_env() -> ApiResult<Self> {
        let mut config = match std::env::var(API_URL_ENV) {
            Ok(url) => Self::new(&url)?,
            Err(_) => Self::default(),
        };

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let seconds = raw.trim().parse::<u64>().map_err(|_| {
                ApiError::Configuration(format!(
                    "{} must be a number of seconds, got {:?}",
                    TIMEOUT_ENV, raw
                ))
            })?;
            config.timeout_ms = Some(seconds.saturating_mul(1000));
        }

        Ok(config)
    }

    /// Set the request timeout. A zero duration disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the endpoint paths.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the refresh policy.
    #[must_use]
    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh = policy;
        self
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Absolute URL for an endpoint path.
    ///
    /// Paths are appended to the origin, so a base of `http://host/api`
    /// and a path of `/account/me` yield `http://host/api/account/me`.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::Configuration(format!("invalid base URL {:?}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::Configuration(format!(
            "unsupported URL scheme {:?}",
            other
        ))),
    }
}
