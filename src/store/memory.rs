// ABOUTME: In-memory FileStore used for tests and for embedding without a disk

use super::{FileStore, StoreError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// HashMap-backed [`FileStore`].
///
/// Folder selections are answered from a queue of scripted answers, an
/// exhausted queue behaves like a cancelled dialog.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<String, String>>,
    folder_answers: Mutex<VecDeque<Option<String>>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (path, content) in files {
            store.insert(path, content);
        }
        store
    }

    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.lock_files().insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.lock_files().get(path).cloned()
    }

    pub fn push_folder_answer(&self, answer: Option<&str>) {
        self.folder_answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(answer.map(str::to_string));
    }

    /// Paths written through `save_file`, in call order.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn lock_files(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.files.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.lock_files().contains_key(path))
    }

    async fn read_file(&self, path: &str) -> Result<String, StoreError> {
        self.lock_files()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn save_file(&self, path: &str, content: &str) -> Result<(), StoreError> {
        self.lock_files().insert(path.to_string(), content.to_string());
        self.writes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(path.to_string());
        Ok(())
    }

    async fn select_folder(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .folder_answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let store = MemoryFileStore::new();
        let err = store.read_file("nope.search").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(path) if path == "nope.search"));
    }

    #[tokio::test]
    async fn test_folder_answers_are_consumed_in_order() {
        let store = MemoryFileStore::new();
        store.push_folder_answer(Some("/work"));
        store.push_folder_answer(None);

        assert_eq!(store.select_folder().await.unwrap().as_deref(), Some("/work"));
        assert_eq!(store.select_folder().await.unwrap(), None);
        // Nothing scripted behaves like a cancelled dialog
        assert_eq!(store.select_folder().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_records_writes() {
        let store = MemoryFileStore::with_files([("a.search", "old")]);
        store.save_file("a.search", "new").await.unwrap();

        assert_eq!(store.get("a.search").as_deref(), Some("new"));
        assert_eq!(store.writes(), vec!["a.search".to_string()]);
    }
}
