//! # pmdesk-core
//!
//! Core types and session storage for the pmdesk client.
//!
//! - **Models**: users and roles, auth payloads, reference data, files
//! - **Store**: the injected key/value storage ([`KeyValueStore`])
//! - **Session**: the persisted token slot and the in-memory logout flag ([`Session`])
//!
//! ## Example
//!
//! ```rust
//! use pmdesk_core::Session;
//!
//! # tokio_test::block_on(async {
//! let session = Session::in_memory();
//! session.store_token("token", "bearer").await.unwrap();
//! assert!(session.is_authenticated().await.unwrap());
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod models;
pub mod session;
pub mod store;

pub use models::{
    Acknowledgement, AuthResponse, FileLink, Reference, ReferenceDraft, ReferenceKind,
    Registration, Role, StoredFile, TokenResponse, UploadReceipt, User, Visibility,
};
pub use session::{LogoutGuard, Session};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};
