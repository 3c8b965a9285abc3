use async_trait::async_trait;
use serde::Serialize;

use super::error::StorageError;

/// A file handed to the object store.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    /// Key prefix the object is filed under (e.g. "hackathon_proposals").
    pub folder: &'a str,
    /// Filename as sent by the client.
    pub original_name: &'a str,
    /// MIME type declared by the client, if any.
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    /// Durable public URL.
    pub url: String,
    /// Opaque identifier used for later deletion.
    pub public_id: String,
    pub original_name: String,
    /// MIME type as resolved by the store (declared, else guessed from the name).
    pub content_type: Option<String>,
    pub size: u64,
    /// First-page preview URL, only derived for PDFs.
    pub thumbnail_url: Option<String>,
}

/// Durable storage for uploaded files, addressed by opaque public ids.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an upload and return its location.
    async fn put(&self, upload: Upload<'_>) -> Result<StoredObject, StorageError>;

    /// Delete an object by its public id.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, public_id: &str) -> Result<bool, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, public_id: &str) -> Result<bool, StorageError>;
}
