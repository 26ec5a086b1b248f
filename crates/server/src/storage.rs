//! # Image Storage Seam
//!
//! Proof images are stored behind a trait so the dues lifecycle stays
//! storage-agnostic. References are opaque strings the store hands out; the
//! filesystem implementation uses paths relative to its root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use error::{AppError, Result};

/// Storage backend for proof images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store image bytes under a category, returning an opaque reference.
    async fn store(&self, category: &str, filename: &str, bytes: &[u8]) -> Result<String>;

    /// Delete a previously stored image. Missing images are not an error.
    async fn delete(&self, reference: &str) -> Result<()>;
}

/// Filesystem-backed image store.
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf> {
        // References are store-issued; reject anything path-shaped beyond
        // the category/name layout.
        let path = Path::new(reference);
        if path.is_absolute() || path.components().any(|c| matches!(c, std::path::Component::ParentDir)) {
            return Err(AppError::bad_request(format!("Invalid image reference '{}'", reference)));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(&self, category: &str, filename: &str, bytes: &[u8]) -> Result<String> {
        let safe_name: String = filename
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();
        let reference = format!(
            "{}/{}-{}",
            crate::utils::slugify(category),
            entity::new_id("img"),
            safe_name
        );

        let path = self.resolve(&reference)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> Result<()> {
        let path = self.resolve(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
