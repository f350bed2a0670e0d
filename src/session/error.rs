// ABOUTME: Error types for panel session operations
// Carries the semantic codes surfaced to the UI alongside the message

use crate::store::StoreError;
use thiserror::Error;

pub const FOLDER_NOT_FOUND: &str = "Folder not found";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    pub fn folder_not_found() -> Self {
        Self::NotFound(FOLDER_NOT_FOUND.to_string())
    }

    /// HTTP-style status code the UI keys its messages on.
    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Internal(_) | Self::Store(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let not_found = SessionError::folder_not_found();
        assert_eq!(not_found.code(), 404);
        assert_eq!(not_found.to_string(), "Folder not found");

        let internal = SessionError::Internal("disk full".to_string());
        assert_eq!(internal.code(), 500);
        assert_eq!(internal.to_string(), "disk full");

        let store: SessionError = StoreError::NotFound("a.search".to_string()).into();
        assert_eq!(store.to_string(), "File not found: a.search");
    }
}
