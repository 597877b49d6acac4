//! # pmdesk
//!
//! Typed Rust client for the pmdesk project-management backend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pmdesk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> pmdesk::ApiResult<()> {
//!     pmdesk::telemetry::init();
//!
//!     let session = Session::new(std::sync::Arc::new(FileStore::new("session.json")));
//!     let client = ApiClient::from_env(session)?;
//!     let auth = Authenticator::new(client.clone());
//!
//!     let user = match auth.restore().await? {
//!         Some(user) => user,
//!         None => auth.login("admin@example.com", "secret").await?,
//!     };
//!     println!("Signed in as {} ({})", user.email, user.role);
//!
//!     for stage in client.references(ReferenceKind::Stage).list().await? {
//!         println!("{}", stage.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Bearer auth with silent refresh**: one refresh and one replay per
//!   request on a 401, suppressed while a logout is in flight
//! - **Injected session storage**: in memory for tests, a JSON file for
//!   long-lived tools
//! - **One generic CRUD client** for all eight reference-data tables
//! - **Public and private files** with upload, listing and temporary links
//! - **Role dashboards** with drag-and-drop layouts saved per page
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `dashboard` | Role dashboards and layout persistence | ✅ |
//!
//! ## Architecture
//!
//! - [`pmdesk_core`] - Models and session storage
//! - [`pmdesk_client`] - HTTP client, auth, reference data and files
//! - [`pmdesk_dashboard`] - Dashboards and layouts (optional)

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod telemetry;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Models and session storage.
pub use pmdesk_core as core;

/// HTTP client, authentication, reference data and files.
pub use pmdesk_client as client;

/// Role dashboards and layouts.
#[cfg(feature = "dashboard")]
#[cfg_attr(docsrs, doc(cfg(feature = "dashboard")))]
pub use pmdesk_dashboard as dashboard;

// ============================================================================
// Flat Re-exports
// ============================================================================

// Errors
pub use pmdesk_client::{ApiError, ApiResult};
pub use pmdesk_core::{StoreError, StoreResult};

// Client
pub use pmdesk_client::{
    login_failure_message, ApiClient, ApiRequest, ApiResponse, Authenticator, ClientConfig,
    Endpoints, FileClient, FilePayload, Payload, RefreshPolicy, RequestBody, Resource,
};

// Models
pub use pmdesk_core::{
    Acknowledgement, FileLink, Reference, ReferenceDraft, ReferenceKind, Role, StoredFile,
    UploadReceipt, User, Visibility,
};

// Storage
pub use pmdesk_core::{FileStore, KeyValueStore, MemoryStore, Session};

// Dashboards
#[cfg(feature = "dashboard")]
pub use pmdesk_dashboard::{DashboardLayout, DropTarget, LayoutEditor, LayoutItem, RoleDashboard};

/// Prelude for common imports.
pub mod prelude {
    // Errors
    pub use crate::{ApiError, ApiResult};

    // Client
    pub use crate::{ApiClient, ApiRequest, Authenticator, ClientConfig, FilePayload, RefreshPolicy};

    // Models
    pub use crate::{ReferenceDraft, ReferenceKind, Role, User, Visibility};

    // Storage
    pub use crate::{FileStore, KeyValueStore, MemoryStore, Session};

    // Dashboards
    #[cfg(feature = "dashboard")]
    pub use crate::{DropTarget, LayoutEditor, RoleDashboard};
}
