mod error;
mod naming;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use naming::{is_pdf_content_type, public_id_for, resolve_content_type, thumbnail_url_for};
pub use traits::{ObjectStore, StoredObject, Upload};
