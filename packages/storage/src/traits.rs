use async_trait::async_trait;

use super::error::StorageError;
use super::transform::Transformation;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public URL the image is served from.
    pub url: String,
    /// Store-specific identifier used to destroy the image later.
    pub public_id: String,
    /// Size of the stored object in bytes, as reported by the store.
    pub bytes: u64,
}

/// Outcome reported by the store for a destroy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyStatus {
    /// The object was removed.
    Ok,
    /// The store answered but did not confirm removal (e.g. `"not found"`).
    Other(String),
}

impl DestroyStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, DestroyStatus::Ok)
    }
}

/// External image storage.
///
/// Implementations are constructed once at startup and shared across
/// requests, so they must be `Send + Sync`.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Upload `data`, applying `transformation`, and return where it lives.
    async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        transformation: &Transformation,
    ) -> Result<StoredImage, StorageError>;

    /// Ask the store to remove the object identified by `public_id`.
    async fn destroy(&self, public_id: &str) -> Result<DestroyStatus, StorageError>;
}
