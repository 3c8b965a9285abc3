use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;

use super::error::StorageError;
use super::naming::{public_id_for, resolve_content_type, thumbnail_url_for, validate_key};
use super::traits::{ObjectStore, StoredObject, Upload};

/// Filesystem-backed object store.
///
/// Objects live at `{base_path}/{public_id}` and are served by some static
/// file server under `{public_base_url}/{public_id}`.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(
        base_path: PathBuf,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    fn object_path(&self, public_id: &str) -> Result<PathBuf, StorageError> {
        validate_key(public_id)?;
        Ok(self.base_path.join(public_id))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(&self, upload: Upload<'_>) -> Result<StoredObject, StorageError> {
        let size = upload.data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let public_id = public_id_for(
            upload.folder,
            upload.original_name,
            Utc::now().timestamp_millis(),
            &nonce[..8],
        );
        let object_path = self.object_path(&public_id)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, upload.data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        let content_type = resolve_content_type(upload.content_type, upload.original_name);
        let url = format!("{}/{}", self.public_base_url, public_id);
        let thumbnail_url = thumbnail_url_for(&url, content_type.as_deref());

        tracing::debug!(public_id = %public_id, size, "Stored object");

        Ok(StoredObject {
            url,
            public_id,
            original_name: upload.original_name.to_string(),
            content_type,
            size,
            thumbnail_url,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(public_id)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, public_id: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(public_id)?;
        Ok(fs::try_exists(&object_path).await?)
    }
}
