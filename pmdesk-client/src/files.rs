//! File upload, listing and link generation.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::request::{ApiRequest, FilePayload};
use bytes::Bytes;
use pmdesk_core::{FileLink, StoredFile, UploadReceipt, Visibility};

/// File operations against one bucket.
#[derive(Debug, Clone)]
pub struct FileClient {
    client: ApiClient,
    visibility: Visibility,
}

impl FileClient {
    /// Create a file client for the given bucket.
    pub fn new(client: ApiClient, visibility: Visibility) -> Self {
        Self { client, visibility }
    }

    /// Which bucket this client targets.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn prefix(&self) -> &str {
        let endpoints = &self.client.config().endpoints;
        let prefix = match self.visibility {
            Visibility::Public => endpoints.public_files.as_str(),
            Visibility::Private => endpoints.private_files.as_str(),
        };
        prefix.trim_end_matches('/')
    }

    /// Upload a file. The server may rename it; the receipt has the
    /// stored name.
    pub async fn upload(&self, file: FilePayload) -> ApiResult<UploadReceipt> {
        let request = ApiRequest::post(format!("{}/upload", self.prefix())).multipart(file);
        self.client.call_json(request).await
    }

    /// List the files in the bucket.
    pub async fn list(&self) -> ApiResult<Vec<StoredFile>> {
        self.client
            .call_json(ApiRequest::get(format!("{}/list", self.prefix())))
            .await
    }

    /// Ask for a temporary download link.
    pub async fn link(&self, file_name: &str) -> ApiResult<FileLink> {
        let path = format!("{}/link/{}", self.prefix(), urlencoding::encode(file_name));
        self.client.call_json(ApiRequest::get(path)).await
    }

    /// Download through a temporary link.
    ///
    /// Links are always served from the private bucket prefix.
    pub async fn download(&self, link: &FileLink) -> ApiResult<Bytes> {
        let prefix = self
            .client
            .config()
            .endpoints
            .private_files
            .trim_end_matches('/');
        let path = format!("{}/download/{}", prefix, link.token());
        Ok(self.client.call(ApiRequest::get(path)).await?.into_bytes())
    }
}
