use async_trait::async_trait;
use chrono::Utc;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::naming::{public_id_for, resolve_content_type, thumbnail_url_for, validate_key};
use super::traits::{ObjectStore, StoredObject, Upload};
use crate::config::S3Config;

/// S3-compatible object store. Objects are keyed by their public id.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    max_size: u64,
}

fn backend_err(err: S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

impl S3ObjectStore {
    pub fn new(
        config: &S3Config,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };
        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials).map_err(backend_err)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
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
        validate_key(&public_id)?;

        let content_type = resolve_content_type(upload.content_type, upload.original_name);
        let response = self
            .bucket
            .put_object_with_content_type(
                &public_id,
                upload.data,
                content_type.as_deref().unwrap_or("application/octet-stream"),
            )
            .await
            .map_err(backend_err)?;
        if !(200..300).contains(&response.status_code()) {
            return Err(StorageError::Backend(format!(
                "upload of {public_id} failed with status {}",
                response.status_code()
            )));
        }

        let url = format!("{}/{}", self.public_base_url, public_id);
        let thumbnail_url = thumbnail_url_for(&url, content_type.as_deref());

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
        validate_key(public_id)?;
        if !self.exists(public_id).await? {
            return Ok(false);
        }
        let response = self
            .bucket
            .delete_object(public_id)
            .await
            .map_err(backend_err)?;
        Ok((200..300).contains(&response.status_code()))
    }

    async fn exists(&self, public_id: &str) -> Result<bool, StorageError> {
        validate_key(public_id)?;
        match self.bucket.head_object(public_id).await {
            Ok((_, code)) => Ok((200..300).contains(&code)),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Err(e) => Err(backend_err(e)),
        }
    }
}
