//! Snapshot wire types exchanged with storage adapters
//!
//! The snapshot is the full serialized state of the catalog, JSON-compatible:
//!
//! ```json
//! { "permissions": [ { "_id": "<id>", "action": "read", "resource": "post" } ],
//!   "roles":       [ { "_id": "<id>", "name": "member",
//!                      "permissions": [ { "action": "read", "resource": "post" } ] } ] }
//! ```
//!
//! `_id` is optional: records without one are treated as new by the
//! synchronization engine. Grant references accept either a natural-key
//! object or a bare id string; exports always emit natural keys, because
//! surrogate ids are not guaranteed to survive a storage round-trip.

use serde::{Deserialize, Serialize};

use crate::permission::{Permission, PermissionDraft};
use crate::role::{Role, RoleDraft};
use crate::value_objects::{PermissionId, PermissionKey, RoleId};

/// Full serialized state of the catalog as exchanged with a storage adapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub permissions: Vec<PermissionRecord>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
}

impl Snapshot {
    /// The empty-but-valid snapshot adapters return when no data exists yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the snapshot holds no records at all
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty()
    }
}

/// Persisted shape of a permission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PermissionId>,
    pub action: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PermissionRecord {
    /// The record's natural key
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(&self.action, &self.resource)
    }

    /// Turn an identified record back into a live entity
    ///
    /// Used on the restore path; creation validators do not run again. A
    /// record without an id gets a fresh one.
    pub fn into_permission(self) -> Permission {
        Permission {
            id: self.id.unwrap_or_default(),
            action: self.action,
            resource: self.resource,
            display_name: self.display_name,
            description: self.description,
        }
    }

    /// Turn a new record into creation input for the validated path
    pub fn into_draft(self) -> PermissionDraft {
        PermissionDraft {
            action: self.action,
            resource: self.resource,
            display_name: self.display_name,
            description: self.description,
        }
    }
}

impl From<&Permission> for PermissionRecord {
    fn from(permission: &Permission) -> Self {
        Self {
            id: Some(permission.id.clone()),
            action: permission.action.clone(),
            resource: permission.resource.clone(),
            display_name: permission.display_name.clone(),
            description: permission.description.clone(),
        }
    }
}

/// Persisted shape of a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RoleId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<GrantRef>,
}

impl RoleRecord {
    /// Turn an identified record back into a live entity
    ///
    /// Natural-key grant references are resolved through `resolve_key`
    /// (references that do not resolve are dropped); id references are kept
    /// verbatim, even when dangling. A record without an id gets a fresh one.
    pub fn into_role(
        self,
        mut resolve_key: impl FnMut(&PermissionKey) -> Option<PermissionId>,
    ) -> Role {
        let mut permissions: Vec<PermissionId> = Vec::new();
        for grant in &self.permissions {
            let resolved = match grant {
                GrantRef::Id(id) => Some(id.clone()),
                GrantRef::Key(key) => resolve_key(key),
            };
            if let Some(id) = resolved {
                if !permissions.contains(&id) {
                    permissions.push(id);
                }
            }
        }

        Role {
            id: self.id.unwrap_or_default(),
            name: self.name,
            display_name: self.display_name,
            description: self.description,
            permissions,
        }
    }

    /// Turn a new record into creation input for the validated path
    ///
    /// Grant references are not part of the draft; the synchronization
    /// engine sets them aside and re-applies them once both endpoints exist.
    pub fn into_draft(self) -> RoleDraft {
        RoleDraft {
            name: self.name,
            display_name: self.display_name,
            description: self.description,
        }
    }
}

/// A role's stored reference to a permission
///
/// Either the natural key or whatever id string the backend kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantRef {
    Key(PermissionKey),
    Id(PermissionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_round_trip() {
        let json = r#"{
            "permissions": [
                { "_id": "p1", "action": "read", "resource": "post", "displayName": "Read posts" }
            ],
            "roles": [
                { "_id": "r1", "name": "member",
                  "permissions": [ { "action": "read", "resource": "post" }, "p9" ] }
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.permissions.len(), 1);
        assert_eq!(
            snapshot.permissions[0].id,
            Some(PermissionId::from_string("p1"))
        );
        assert_eq!(snapshot.permissions[0].display_name.as_deref(), Some("Read posts"));

        let grants = &snapshot.roles[0].permissions;
        assert_eq!(grants[0], GrantRef::Key(PermissionKey::new("read", "post")));
        assert_eq!(grants[1], GrantRef::Id(PermissionId::from_string("p9")));

        let out = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(out["permissions"][0]["_id"], "p1");
        assert_eq!(out["roles"][0]["permissions"][1], "p9");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());

        let snapshot: Snapshot =
            serde_json::from_str(r#"{ "permissions": [] }"#).unwrap();
        assert!(snapshot.roles.is_empty());
    }

    #[test]
    fn test_record_without_id_is_new() {
        let record: PermissionRecord =
            serde_json::from_str(r#"{ "action": "read", "resource": "post" }"#).unwrap();
        assert!(record.id.is_none());

        let draft = record.into_draft();
        assert_eq!(draft.action, "read");
    }

    #[test]
    fn test_into_role_resolves_keys_and_keeps_ids() {
        let record = RoleRecord {
            id: Some(RoleId::from_string("r1")),
            name: "member".into(),
            display_name: None,
            description: None,
            permissions: vec![
                GrantRef::Key(PermissionKey::new("read", "post")),
                GrantRef::Key(PermissionKey::new("gone", "post")),
                GrantRef::Id(PermissionId::from_string("dangling")),
            ],
        };

        let role = record.into_role(|key| {
            (key.action == "read").then(|| PermissionId::from_string("p1"))
        });

        let refs: Vec<&str> = role.permissions.iter().map(|id| id.as_str()).collect();
        assert_eq!(refs, vec!["p1", "dangling"]);
    }

    #[test]
    fn test_exported_grants_serialize_as_objects() {
        let record = RoleRecord {
            id: Some(RoleId::from_string("r1")),
            name: "member".into(),
            display_name: None,
            description: None,
            permissions: vec![GrantRef::Key(PermissionKey::new("read", "post"))],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["permissions"][0]["action"], "read");
        assert_eq!(json["permissions"][0]["resource"], "post");
    }
}
