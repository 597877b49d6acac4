//! # pmdesk-client
//!
//! Authenticated HTTP client for the pmdesk project-management backend.
//!
//! ## Features
//!
//! - Bearer token attached to every request from the injected [`Session`](pmdesk_core::Session)
//! - One silent token refresh and replay on a 401, never during a logout
//! - Login, registration, identity lookup and logout ([`Authenticator`])
//! - One generic CRUD client for every reference-data table ([`Resource`])
//! - Public and private file upload, listing and download links ([`FileClient`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use pmdesk_client::{ApiClient, Authenticator, ClientConfig};
//! use pmdesk_core::{ReferenceKind, Session};
//!
//! # async fn example() -> pmdesk_client::ApiResult<()> {
//! let client = ApiClient::new(ClientConfig::new("http://localhost:8000")?, Session::in_memory())?;
//! let auth = Authenticator::new(client.clone());
//! auth.login("admin@example.com", "secret").await?;
//!
//! let stages = client.references(ReferenceKind::Stage).list().await?;
//! println!("{} stages", stages.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod auth;
mod client;
pub mod config;
pub mod error;
mod files;
pub mod request;
mod resource;
pub mod response;

pub use auth::{login_failure_message, Authenticator};
pub use client::ApiClient;
pub use config::{ClientConfig, Endpoints, RefreshPolicy};
pub use error::{ApiError, ApiResult};
pub use files::FileClient;
pub use request::{ApiRequest, FilePayload, RequestBody};
pub use resource::Resource;
pub use response::{ApiResponse, Payload};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ApiClient, ApiError, ApiRequest, ApiResult, Authenticator, ClientConfig, FileClient,
        FilePayload, RefreshPolicy, Resource,
    };
}
