//! Error taxonomy for catalog operations

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the catalog and the synchronization engine
///
/// Entity-level errors (`Validation`, `Uniqueness`, `NotFound`) are returned
/// to the immediate caller and never retried. `Storage` wraps adapter I/O
/// failures; infrastructure crates map their internal errors into it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An identifier failed the allowed-character pattern
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A unique constraint would be violated
    #[error("{constraint} must be unique: {value}")]
    Uniqueness { constraint: String, value: String },

    /// Update/remove/grant against an identity that is not live
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Adapter I/O failure
    #[error("storage error: {reason}")]
    Storage { reason: String },
}

impl Error {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a uniqueness error
    pub fn uniqueness(constraint: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Uniqueness {
            constraint: constraint.into(),
            value: value.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a storage error
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = Error::uniqueness("role name", "admin");
        assert!(err.to_string().contains("admin"));

        let err = Error::not_found("permission", "p-123");
        assert!(err.to_string().contains("permission"));
        assert!(err.to_string().contains("p-123"));
    }

    #[test]
    fn test_variants_are_comparable() {
        let a = Error::validation("action", "empty");
        let b = Error::validation("action", "empty");
        assert_eq!(a, b);
        assert!(matches!(a, Error::Validation { .. }));
    }
}
