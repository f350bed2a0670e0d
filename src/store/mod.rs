// ABOUTME: Storage collaborators for the panel session core
// File store for search files and key-value store for the session snapshot

pub mod error;
pub mod file_store;
pub mod kv;
pub mod local;
pub mod memory;

pub use error::StoreError;
pub use file_store::FileStore;
pub use kv::{JsonFileKvStore, KeyValueStore, MemoryKvStore};
pub use local::LocalFileStore;
pub use memory::MemoryFileStore;

#[cfg(test)]
pub use file_store::MockFileStore;
