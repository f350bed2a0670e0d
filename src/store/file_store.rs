// ABOUTME: FileStore contract the panel session core persists search files through
// Existence checks, reads, writes and interactive folder selection, all async and fallible

use super::StoreError;
use async_trait::async_trait;

/// Backing store for panel files.
///
/// Paths are opaque keys from the manager's point of view. A store may map
/// them onto a directory tree (see [`LocalFileStore`](super::LocalFileStore))
/// or keep them in memory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Fails only on I/O-level errors, a missing path is `Ok(false)`.
    async fn exists(&self, path: &str) -> Result<bool, StoreError>;

    async fn read_file(&self, path: &str) -> Result<String, StoreError>;

    async fn save_file(&self, path: &str, content: &str) -> Result<(), StoreError>;

    /// Ask the user for a folder. `Ok(None)` means the selection was cancelled.
    async fn select_folder(&self) -> Result<Option<String>, StoreError>;
}
