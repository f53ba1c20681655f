//! Storage backend error types
//!
//! Error mapping to the domain taxonomy

use std::path::PathBuf;

use thiserror::Error;

/// Result type for backend-internal operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors raised inside a storage backend
///
/// Adapters keep these internal and surface them to callers as
/// `warden_domain::Error::Storage`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend connection failure
    #[error("connection error: {0}")]
    Connection(String),

    /// Backend query/statement failure
    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    /// Create an I/O error carrying the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StorageError> for warden_domain::Error {
    fn from(err: StorageError) -> Self {
        warden_domain::Error::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_carries_path() {
        let err = StorageError::io(
            "/tmp/rbac.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/rbac.json"));
    }

    #[test]
    fn test_converts_to_domain_storage_error() {
        let err = StorageError::Connection("refused".into());
        let domain: warden_domain::Error = err.into();
        assert!(matches!(domain, warden_domain::Error::Storage { .. }));
        assert!(domain.to_string().contains("refused"));
    }
}
