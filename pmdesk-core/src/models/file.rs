//! Stored files and download links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which bucket a file operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Files anyone may list.
    #[default]
    Public,
    /// Files that require an authenticated session.
    Private,
}

/// A file listed in a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Object name.
    pub name: String,
    /// Last modification time.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Status string, `uploaded` on success.
    pub status: String,
    /// Name the file was stored under.
    pub name: String,
}

/// A temporary download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    /// Link path, relative to the bucket prefix (e.g. `/download/<token>`).
    pub link: String,
}

impl FileLink {
    /// The opaque token at the end of the link.
    pub fn token(&self) -> &str {
        self.link.rsplit('/').next().unwrap_or_default()
    }
}

/// Confirmation message returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Server message.
    pub message: String,
}
