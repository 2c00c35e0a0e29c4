//! Error types for credential persistence.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Stored session is corrupt: {0}")]
    Corrupt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the stored data itself is bad, as opposed to the medium failing.
    #[inline]
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Corrupt(_) | StoreError::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corruption_classification() {
        assert!(StoreError::Corrupt("x".into()).is_corruption());
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(StoreError::from(json_err).is_corruption());
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(!StoreError::from(io_err).is_corruption());
    }
}
