// ABOUTME: Panel session management for the editor tabs
// Provides the panel lifecycle state machine and snapshot persistence

pub mod error;
pub mod manager;
pub mod persistence;

pub use error::SessionError;
pub use manager::{PanelSessionManager, PanelTarget};
pub use persistence::{CurrentPanel, PersistedPanel, SessionPersistence, SessionSnapshot};
