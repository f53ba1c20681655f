//! Role entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{PermissionId, RoleId};

/// A named, reusable set of granted permissions
///
/// `name` is unique across all live roles. The grant set holds identity
/// references, insertion-ordered with duplicates suppressed; references are
/// non-exclusive and may dangle once a permission is destroyed (a dangling
/// reference is never a `can` match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<PermissionId>,
}

impl Role {
    /// Build a fresh role from a draft, with an empty grant set
    ///
    /// Validation runs when the catalog saves it, not here.
    pub fn new(draft: RoleDraft) -> Self {
        Self {
            id: RoleId::new(),
            name: draft.name,
            display_name: draft.display_name,
            description: draft.description,
            permissions: Vec::new(),
        }
    }

    /// Add references to the grant set (set-union)
    ///
    /// Returns `true` when anything was actually added; granting an already
    /// present reference is a no-op.
    pub fn grant(&mut self, ids: &[PermissionId]) -> bool {
        let mut changed = false;
        for id in ids {
            if !self.permissions.contains(id) {
                self.permissions.push(id.clone());
                changed = true;
            }
        }
        changed
    }

    /// Remove references from the grant set (set-difference)
    ///
    /// Returns `true` when anything was actually removed; revoking an absent
    /// reference is a no-op.
    pub fn revoke(&mut self, ids: &[PermissionId]) -> bool {
        let before = self.permissions.len();
        self.permissions.retain(|id| !ids.contains(id));
        self.permissions.len() != before
    }

    /// Whether the grant set references the given permission identity
    pub fn has_grant(&self, id: &PermissionId) -> bool {
        self.permissions.contains(id)
    }

    /// Apply a patch; the catalog re-validates afterwards
    pub fn apply(&mut self, patch: RolePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(display_name) = patch.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

/// Input for creating a role
///
/// Grants are not part of the draft; they are added through `grant` once the
/// referenced permissions exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDraft {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RoleDraft {
    /// Create a draft with just the name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a role; `None` fields are left untouched
///
/// The grant set is not patchable; use `grant`/`revoke`.
#[derive(Debug, Clone, Default)]
pub struct RolePatch {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}
