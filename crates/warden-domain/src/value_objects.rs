//! Value objects shared across the catalog

use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission identifier
///
/// Fresh entities get a UUID string. Identifiers restored from storage are
/// kept verbatim, whatever text the backend assigned; only natural keys are
/// trusted across backends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionId(String);

impl PermissionId {
    /// Generate a new random permission ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from a string kept by a storage backend
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// String representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Role identifier; same identity rules as [`PermissionId`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(String);

impl RoleId {
    /// Generate a new random role ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from a string kept by a storage backend
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// String representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

/// The natural key of a permission: its `(action, resource)` pair
///
/// Surrogate ids are not guaranteed to survive a storage round-trip; this is
/// the identity used to re-link grants after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionKey {
    pub action: String,
    pub resource: String,
}

impl PermissionKey {
    /// Create a natural key
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.action, self.resource)
    }
}
