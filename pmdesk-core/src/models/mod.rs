//! Domain models exchanged with the backend.

pub mod auth;
pub mod file;
pub mod reference;
pub mod user;

pub use auth::{AuthResponse, Registration, TokenResponse};
pub use file::{Acknowledgement, FileLink, StoredFile, UploadReceipt, Visibility};
pub use reference::{Reference, ReferenceDraft, ReferenceKind};
pub use user::{Role, User};
