//! Validated in-memory entity store
//!
//! Holds the canonical permission and role collections for the lifetime of
//! the process (or until reset). Every create/update runs an explicit,
//! ordered list of named pre-save validators; persistence is a post-save
//! concern driven by the provider, not by the store itself.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use warden_domain::{
    validate_identifier, Error, GrantRef, Permission, PermissionDraft, PermissionId,
    PermissionPatch, PermissionRecord, Result, Role, RoleDraft, RoleId, RolePatch, RoleRecord,
    Snapshot,
};

/// Pre-save validator for permissions
type PermissionPreSave = fn(&Catalog, &Permission) -> Result<()>;

/// Pre-save validator for roles
type RolePreSave = fn(&Catalog, &Role) -> Result<()>;

/// Validators run in order on every permission create/update
const PERMISSION_PRE_SAVE: &[(&str, PermissionPreSave)] = &[
    ("identifier-pattern", permission_identifiers_valid),
    ("unique-action-resource", permission_key_unique),
];

/// Validators run in order on every role create/update
const ROLE_PRE_SAVE: &[(&str, RolePreSave)] = &[
    ("identifier-pattern", role_name_valid),
    ("unique-name", role_name_unique),
];

fn permission_identifiers_valid(_catalog: &Catalog, permission: &Permission) -> Result<()> {
    validate_identifier("action", &permission.action)?;
    validate_identifier("resource", &permission.resource)
}

fn permission_key_unique(catalog: &Catalog, permission: &Permission) -> Result<()> {
    match catalog.permission_by_key(&permission.action, &permission.resource) {
        Some(existing) if existing.id != permission.id => Err(Error::uniqueness(
            "permission action and resource",
            permission.key().to_string(),
        )),
        _ => Ok(()),
    }
}

fn role_name_valid(_catalog: &Catalog, role: &Role) -> Result<()> {
    validate_identifier("name", &role.name)
}

fn role_name_unique(catalog: &Catalog, role: &Role) -> Result<()> {
    match catalog.role_by_name(&role.name) {
        Some(existing) if existing.id != role.id => {
            Err(Error::uniqueness("role name", role.name.clone()))
        }
        _ => Ok(()),
    }
}

/// Thread-safe in-memory store for both entity kinds
///
/// Reads take the collection RwLocks directly; callers that need mutations
/// ordered against each other (or against a sync) serialize through the
/// provider's operation lock.
#[derive(Debug, Default)]
pub struct Catalog {
    permissions: RwLock<HashMap<PermissionId, Permission>>,
    roles: RwLock<HashMap<RoleId, Role>>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    fn run_permission_pre_save(&self, permission: &Permission) -> Result<()> {
        for (name, validator) in PERMISSION_PRE_SAVE {
            validator(self, permission).map_err(|err| {
                debug!(
                    "pre-save validator {} rejected permission {}",
                    name,
                    permission.key()
                );
                err
            })?;
        }
        Ok(())
    }

    fn run_role_pre_save(&self, role: &Role) -> Result<()> {
        for (name, validator) in ROLE_PRE_SAVE {
            validator(self, role).map_err(|err| {
                debug!("pre-save validator {} rejected role {}", name, role.name);
                err
            })?;
        }
        Ok(())
    }

    // === Permissions ===

    /// Create permissions through the validated path
    ///
    /// Batch semantics are per-record, not atomic: the first failing record
    /// returns its error, records created earlier in the batch stay written.
    pub fn insert_permissions(&self, drafts: Vec<PermissionDraft>) -> Result<Vec<Permission>> {
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let permission = Permission::new(draft);
            self.run_permission_pre_save(&permission)?;
            self.permissions
                .write()
                .insert(permission.id.clone(), permission.clone());
            created.push(permission);
        }
        Ok(created)
    }

    /// Create a single permission through the validated path
    pub fn insert_permission(&self, draft: PermissionDraft) -> Result<Permission> {
        let mut created = self.insert_permissions(vec![draft])?;
        Ok(created.remove(0))
    }

    /// Look a permission up by identity
    pub fn permission(&self, id: &PermissionId) -> Option<Permission> {
        self.permissions.read().get(id).cloned()
    }

    /// Look a permission up by natural key
    pub fn permission_by_key(&self, action: &str, resource: &str) -> Option<Permission> {
        self.permissions
            .read()
            .values()
            .find(|p| p.matches(action, resource))
            .cloned()
    }

    /// All live permissions, ordered by natural key
    pub fn permissions(&self) -> Vec<Permission> {
        let mut all: Vec<Permission> = self.permissions.read().values().cloned().collect();
        all.sort_by(|a, b| {
            (a.action.as_str(), a.resource.as_str()).cmp(&(b.action.as_str(), b.resource.as_str()))
        });
        all
    }

    /// Scan permissions with a predicate
    pub fn find_permissions(&self, predicate: impl Fn(&Permission) -> bool) -> Vec<Permission> {
        self.permissions
            .read()
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }

    /// Patch a permission and re-run the pre-save validators
    pub fn update_permission(
        &self,
        id: &PermissionId,
        patch: PermissionPatch,
    ) -> Result<Permission> {
        let mut updated = self
            .permission(id)
            .ok_or_else(|| Error::not_found("permission", id.as_str()))?;
        updated.apply(patch);
        self.run_permission_pre_save(&updated)?;
        self.permissions
            .write()
            .insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    /// Remove a permission; its references in roles are left to dangle
    pub fn remove_permission(&self, id: &PermissionId) -> Result<Permission> {
        self.permissions
            .write()
            .remove(id)
            .ok_or_else(|| Error::not_found("permission", id.as_str()))
    }

    /// Drop every permission
    pub fn destroy_permissions(&self) {
        self.permissions.write().clear();
    }

    /// Number of live permissions
    pub fn permission_count(&self) -> usize {
        self.permissions.read().len()
    }

    // === Roles ===

    /// Create roles through the validated path; same batch semantics as
    /// [`Catalog::insert_permissions`]
    pub fn insert_roles(&self, drafts: Vec<RoleDraft>) -> Result<Vec<Role>> {
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let role = Role::new(draft);
            self.run_role_pre_save(&role)?;
            self.roles.write().insert(role.id.clone(), role.clone());
            created.push(role);
        }
        Ok(created)
    }

    /// Create a single role through the validated path
    pub fn insert_role(&self, draft: RoleDraft) -> Result<Role> {
        let mut created = self.insert_roles(vec![draft])?;
        Ok(created.remove(0))
    }

    /// Look a role up by identity
    pub fn role(&self, id: &RoleId) -> Option<Role> {
        self.roles.read().get(id).cloned()
    }

    /// Look a role up by name
    pub fn role_by_name(&self, name: &str) -> Option<Role> {
        self.roles.read().values().find(|r| r.name == name).cloned()
    }

    /// All live roles, ordered by name
    pub fn roles(&self) -> Vec<Role> {
        let mut all: Vec<Role> = self.roles.read().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Scan roles with a predicate
    pub fn find_roles(&self, predicate: impl Fn(&Role) -> bool) -> Vec<Role> {
        self.roles
            .read()
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Patch a role and re-run the pre-save validators
    pub fn update_role(&self, id: &RoleId, patch: RolePatch) -> Result<Role> {
        let mut updated = self
            .role(id)
            .ok_or_else(|| Error::not_found("role", id.as_str()))?;
        updated.apply(patch);
        self.run_role_pre_save(&updated)?;
        self.roles.write().insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    /// Remove a role; referenced permissions are untouched
    pub fn remove_role(&self, id: &RoleId) -> Result<Role> {
        self.roles
            .write()
            .remove(id)
            .ok_or_else(|| Error::not_found("role", id.as_str()))
    }

    /// Drop every role
    pub fn destroy_roles(&self) {
        self.roles.write().clear();
    }

    /// Number of live roles
    pub fn role_count(&self) -> usize {
        self.roles.read().len()
    }

    // === Grants ===

    /// Add permission references to a role's grant set (set-union)
    ///
    /// Granting an already present reference is a success and a no-op.
    pub fn grant(&self, role_id: &RoleId, permission_ids: &[PermissionId]) -> Result<Role> {
        let mut updated = self
            .role(role_id)
            .ok_or_else(|| Error::not_found("role", role_id.as_str()))?;
        updated.grant(permission_ids);
        self.run_role_pre_save(&updated)?;
        self.roles.write().insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    /// Remove permission references from a role's grant set (set-difference)
    ///
    /// Revoking an absent reference is a success and a no-op.
    pub fn revoke(&self, role_id: &RoleId, permission_ids: &[PermissionId]) -> Result<Role> {
        let mut updated = self
            .role(role_id)
            .ok_or_else(|| Error::not_found("role", role_id.as_str()))?;
        updated.revoke(permission_ids);
        self.run_role_pre_save(&updated)?;
        self.roles.write().insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    /// Whether the role holds a live grant matching `(action, resource)`
    ///
    /// References that no longer resolve are skipped; an unknown role or an
    /// empty grant set is simply `false`, never an error.
    pub fn can(&self, role_id: &RoleId, action: &str, resource: &str) -> bool {
        let Some(role) = self.role(role_id) else {
            return false;
        };
        let permissions = self.permissions.read();
        role.permissions
            .iter()
            .any(|id| permissions.get(id).is_some_and(|p| p.matches(action, resource)))
    }

    // === Restore / export ===

    /// Identity-preserving bulk replace of both collections
    ///
    /// The restore path for records already validated at their original
    /// creation; pre-save validators do not run.
    pub fn restore(&self, permissions: Vec<Permission>, roles: Vec<Role>) {
        let mut permission_map = self.permissions.write();
        let mut role_map = self.roles.write();

        permission_map.clear();
        role_map.clear();
        for permission in permissions {
            permission_map.insert(permission.id.clone(), permission);
        }
        for role in roles {
            role_map.insert(role.id.clone(), role);
        }
    }

    /// Serialize the whole catalog, deterministically ordered
    ///
    /// Grants are exported as natural keys so any backend may renumber
    /// surrogate ids; dangling references are dropped from the export.
    pub fn export(&self) -> Snapshot {
        let permission_map = self.permissions.read();
        let role_map = self.roles.read();

        let mut permissions: Vec<PermissionRecord> =
            permission_map.values().map(PermissionRecord::from).collect();
        permissions.sort_by(|a, b| {
            (a.action.as_str(), a.resource.as_str()).cmp(&(b.action.as_str(), b.resource.as_str()))
        });

        let mut roles: Vec<RoleRecord> = role_map
            .values()
            .map(|role| {
                let grants = role
                    .permissions
                    .iter()
                    .filter_map(|id| match permission_map.get(id) {
                        Some(permission) => Some(GrantRef::Key(permission.key())),
                        None => {
                            debug!(
                                role = %role.name,
                                reference = %id,
                                "dropping dangling grant reference on export"
                            );
                            None
                        }
                    })
                    .collect();
                RoleRecord {
                    id: Some(role.id.clone()),
                    name: role.name.clone(),
                    display_name: role.display_name.clone(),
                    description: role.description.clone(),
                    permissions: grants,
                }
            })
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));

        Snapshot { permissions, roles }
    }
}
