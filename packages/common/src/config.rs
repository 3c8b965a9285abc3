use std::path::PathBuf;

use serde::Deserialize;

/// Which object store backs proposal uploads.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    /// Requires the `object-storage` feature.
    S3,
}

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3Config {
    pub bucket: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Custom endpoint (MinIO, R2, ...). Uses AWS when absent.
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub path_style: bool,
}

/// Object storage configuration for uploaded proposals.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Default: filesystem.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for the filesystem backend. Default: "./data/uploads".
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Public URL prefix under which stored objects are served.
    /// Default: "http://localhost:3000/uploads".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Folder (key prefix) for proposals. Default: "hackathon_proposals".
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Maximum accepted upload in bytes. Default: 10 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    #[serde(default)]
    pub s3: Option<S3Config>,
}

fn default_s3_region() -> String {
    "us-east-1".into()
}
fn default_storage_root() -> PathBuf {
    PathBuf::from("./data/uploads")
}
fn default_public_base_url() -> String {
    "http://localhost:3000/uploads".into()
}
fn default_folder() -> String {
    "hackathon_proposals".into()
}
fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_storage_root(),
            public_base_url: default_public_base_url(),
            folder: default_folder(),
            max_upload_size: default_max_upload_size(),
            s3: None,
        }
    }
}
