// ABOUTME: FileStore backed by the local file system under a workspace root
// Relative panel paths resolve against the root, absolute paths are used as-is

use super::{FileStore, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct LocalFileStore {
    root: PathBuf,
    default_folder: Option<PathBuf>,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_folder: None,
        }
    }

    /// Folder handed back by `select_folder`. Without one, every selection
    /// is treated as cancelled.
    pub fn with_default_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.default_folder = folder;
        self
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        if path.is_empty() {
            return Ok(false);
        }
        let resolved = self.resolve(path);
        match tokio::fs::metadata(&resolved).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(resolved, e)),
        }
    }

    async fn read_file(&self, path: &str) -> Result<String, StoreError> {
        let resolved = self.resolve(path);
        match tokio::fs::read_to_string(&resolved).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.to_string()))
            }
            Err(e) => Err(StoreError::io(resolved, e)),
        }
    }

    async fn save_file(&self, path: &str, content: &str) -> Result<(), StoreError> {
        let resolved = self.resolve(path);
        debug!("Writing {} bytes to {}", content.len(), resolved.display());
        tokio::fs::write(&resolved, content)
            .await
            .map_err(|e| StoreError::io(resolved, e))
    }

    async fn select_folder(&self) -> Result<Option<String>, StoreError> {
        let Some(folder) = &self.default_folder else {
            return Ok(None);
        };
        let folder = if folder.is_absolute() {
            folder.clone()
        } else {
            self.root.join(folder)
        };
        if !tokio::fs::metadata(&folder)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            debug!("Configured folder {} is not a directory", folder.display());
            return Ok(None);
        }
        Ok(Some(folder.to_string_lossy().into_owned()))
    }
}
