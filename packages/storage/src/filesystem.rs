use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{DestroyStatus, PhotoStore, StoredImage};
use super::transform::Transformation;

/// Filesystem-backed photo store for development and tests.
///
/// Files are written flat under `base_path` as `{uuid}.{ext}` and are
/// expected to be served by the host application under `public_url`.
/// Transformations are not applied; files are kept as uploaded.
pub struct FilesystemPhotoStore {
    base_path: PathBuf,
    public_url: String,
    max_size: u64,
}

impl FilesystemPhotoStore {
    /// Create a new filesystem photo store, creating the directories it needs.
    pub async fn new(
        base_path: PathBuf,
        public_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_url: public_url.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn object_path(&self, public_id: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_public_id(public_id) {
            return Err(StorageError::InvalidPublicId(public_id.to_string()));
        }
        Ok(self.base_path.join(public_id))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

/// Public ids are `{uuid}` optionally followed by `.{ext}`; anything else
/// could escape the base directory.
fn is_valid_public_id(public_id: &str) -> bool {
    !public_id.is_empty()
        && !public_id.starts_with('.')
        && public_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !public_id.contains("..")
}

/// Lowercased extension of `file_name`, if it is short and alphanumeric.
fn extension_of(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[async_trait]
impl PhotoStore for FilesystemPhotoStore {
    async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        transformation: &Transformation,
    ) -> Result<StoredImage, StorageError> {
        let size = data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        let public_id = match extension_of(file_name) {
            Some(ext) => format!("{id}.{ext}"),
            None => id,
        };
        let target = self.object_path(&public_id)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(%public_id, size, %transformation, "Stored photo on filesystem");

        Ok(StoredImage {
            url: format!("{}/{}", self.public_url, public_id),
            public_id,
            bytes: size,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<DestroyStatus, StorageError> {
        let path = self.object_path(public_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(DestroyStatus::Ok),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(DestroyStatus::Other("not found".into()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
