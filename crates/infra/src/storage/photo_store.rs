//! Filesystem photo store
//!
//! One blob per user at `profiles/{uid}.{ext}` under the configured base
//! directory. Re-uploading with the same extension overwrites in place.

use std::path::PathBuf;

use async_trait::async_trait;
use medibook_core::accounts::ports::PhotoStore;
use medibook_domain::{MedibookError, Result};

/// Filesystem-backed implementation of `PhotoStore`
pub struct FsPhotoStore {
    base_dir: PathBuf,
}

impl FsPhotoStore {
    /// Create a new store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn store(&self, user_id: &str, extension: &str, bytes: &[u8]) -> Result<String> {
        let dir = self.base_dir.join("profiles");
        tokio::fs::create_dir_all(&dir).await.map_err(|err| {
            MedibookError::Internal(format!("failed to create photo directory: {err}"))
        })?;

        let file_name = format!("{user_id}.{extension}");
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes).await.map_err(|err| {
            MedibookError::Internal(format!("failed to write photo {}: {err}", path.display()))
        })?;

        Ok(format!("profiles/{file_name}"))
    }
}
