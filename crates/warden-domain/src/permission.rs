//! Permission entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{PermissionId, PermissionKey};

/// An atomic grantable capability identified by an `(action, resource)` pair
///
/// `(action, resource)` is unique across all live permissions; the catalog
/// enforces this on every save. Identity is stable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    pub action: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Permission {
    /// Build a fresh permission from a draft
    ///
    /// Validation runs when the catalog saves it, not here.
    pub fn new(draft: PermissionDraft) -> Self {
        Self {
            id: PermissionId::new(),
            action: draft.action,
            resource: draft.resource,
            display_name: draft.display_name,
            description: draft.description,
        }
    }

    /// The natural key of this permission
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(&self.action, &self.resource)
    }

    /// Exact match on the natural key
    pub fn matches(&self, action: &str, resource: &str) -> bool {
        self.action == action && self.resource == resource
    }

    /// Apply a patch; the catalog re-validates afterwards
    pub fn apply(&mut self, patch: PermissionPatch) {
        if let Some(action) = patch.action {
            self.action = action;
        }
        if let Some(resource) = patch.resource {
            self.resource = resource;
        }
        if let Some(display_name) = patch.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

/// Input for creating a permission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDraft {
    pub action: String,
    pub resource: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PermissionDraft {
    /// Create a draft with just the natural key
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
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

/// Partial update of a permission; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct PermissionPatch {
    pub action: Option<String>,
    pub resource: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}
