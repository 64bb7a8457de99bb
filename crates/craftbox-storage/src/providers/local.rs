//! Local filesystem content store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use craftbox_core::config::storage::LocalStorageConfig;
use craftbox_core::error::{AppError, ErrorKind};
use craftbox_core::result::AppResult;
use craftbox_core::traits::content::ContentStore;

/// Content store backed by a local directory tree.
///
/// Refs are owner-scoped relative paths under the configured root.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    /// Root directory for all stored payloads.
    root: PathBuf,
}

impl LocalContentStore {
    /// Create a new local content store rooted at the configured path.
    pub async fn new(config: &LocalStorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create content root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a ref to an absolute path within the root.
    fn resolve(&self, content_ref: &str) -> PathBuf {
        let clean = content_ref.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put(&self, content_ref: &str, data: Bytes) -> AppResult<String> {
        let full_path = self.resolve(content_ref);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write payload: {content_ref}"),
                e,
            )
        })?;

        debug!(content_ref, bytes = data.len(), "Stored payload");
        Ok(content_ref.to_string())
    }

    async fn get(&self, content_ref: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(content_ref);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Payload not found: {content_ref}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read payload: {content_ref}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, content_ref: &str) -> AppResult<()> {
        let full_path = self.resolve(content_ref);
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete payload: {content_ref}"),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from);
        let to_path = self.resolve(to);
        self.ensure_parent(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to rename {from} -> {to}"),
                e,
            )
        })?;
        Ok(())
    }

    async fn exists(&self, content_ref: &str) -> AppResult<bool> {
        Ok(self.resolve(content_ref).exists())
    }
}
