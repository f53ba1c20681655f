//! Synchronization engine
//!
//! A [`Provider`] owns its [`Catalog`] and its active storage backend —
//! explicit construction, no module-level globals. `sync` reconciles the
//! backend's snapshot into the catalog in three strictly sequential phases
//! (fetch, partition/restore, create/re-grant); every successful mutation
//! re-persists the whole catalog, full-replace.
//!
//! Ordering: a single `tokio::sync::Mutex` serializes entity mutations and
//! sync phases in one queue. Reads go straight to the catalog.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use warden_domain::{
    Error, GrantRef, Permission, PermissionDraft, PermissionId, PermissionKey, PermissionPatch,
    PermissionRecord, Result, Role, RoleDraft, RoleId, RolePatch, RoleRecord, Storage,
};
use warden_storage::MemoryStorage;

use crate::catalog::Catalog;

/// Serialized catalog as returned by [`Provider::list`]
///
/// Roles carry resolved permission objects, not bare references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub permissions: Vec<Permission>,
    pub roles: Vec<RoleView>,
}

/// A role with its grant set resolved to live permissions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub id: RoleId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
}

/// The synchronization engine and entry point to a catalog
pub struct Provider {
    catalog: Catalog,
    storage: parking_lot::RwLock<Arc<dyn Storage>>,
    /// Serializes entity mutations and every phase of a sync; concurrent
    /// syncs must never interleave partition/restore/create on one catalog.
    op_lock: Mutex<()>,
    /// Deferred channel for post-save persistence failures
    last_save_error: parking_lot::Mutex<Option<Error>>,
}

impl Provider {
    /// Create a provider backed by a fresh in-memory store
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    /// Create a provider with an explicit storage backend
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            catalog: Catalog::new(),
            storage: parking_lot::RwLock::new(storage),
            op_lock: Mutex::new(()),
            last_save_error: parking_lot::Mutex::new(None),
        }
    }

    /// Swap the active storage backend
    pub fn use_storage(&self, storage: Arc<dyn Storage>) {
        *self.storage.write() = storage;
    }

    /// Direct access to the entity store
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn active_storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage.read())
    }

    // === Synchronization ===

    /// Reconcile the backend's latest snapshot into the catalog
    ///
    /// Phases run strictly in order:
    /// 1. fetch — adapter failure aborts with the catalog untouched;
    /// 2. partition & restore — records carrying an id are restored by bulk
    ///    replace without re-running creation validators, new roles have
    ///    their grant lists set aside;
    /// 3. create & re-grant — new permissions, then new roles, then grants
    ///    re-linked through natural keys; unresolvable references are
    ///    silently dropped.
    pub async fn sync(&self) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        self.sync_locked().await
    }

    async fn sync_locked(&self) -> Result<()> {
        let snapshot = self.active_storage().list().await?;
        debug!(
            permissions = snapshot.permissions.len(),
            roles = snapshot.roles.len(),
            "fetched snapshot"
        );

        let (identified_permissions, new_permissions): (Vec<PermissionRecord>, Vec<_>) = snapshot
            .permissions
            .into_iter()
            .partition(|record| record.id.is_some());
        let (identified_roles, new_roles): (Vec<RoleRecord>, Vec<_>) = snapshot
            .roles
            .into_iter()
            .partition(|record| record.id.is_some());

        // Grants of new roles are set aside: the permissions they reference
        // may themselves be new and not materialized until phase 3.
        let mut pending_grants: Vec<(String, Vec<GrantRef>)> = Vec::new();
        let mut new_role_drafts = Vec::with_capacity(new_roles.len());
        for record in new_roles {
            if !record.permissions.is_empty() {
                pending_grants.push((record.name.clone(), record.permissions.clone()));
            }
            new_role_drafts.push(record.into_draft());
        }

        if !identified_permissions.is_empty() || !identified_roles.is_empty() {
            let restored: Vec<Permission> = identified_permissions
                .into_iter()
                .map(PermissionRecord::into_permission)
                .collect();
            let key_index: HashMap<PermissionKey, PermissionId> = restored
                .iter()
                .map(|permission| (permission.key(), permission.id.clone()))
                .collect();
            let roles: Vec<Role> = identified_roles
                .into_iter()
                .map(|record| record.into_role(|key| key_index.get(key).cloned()))
                .collect();

            debug!(
                permissions = restored.len(),
                roles = roles.len(),
                "restoring identified records"
            );
            self.catalog.restore(restored, roles);
        }

        let mut dirty = false;

        if !new_permissions.is_empty() {
            let drafts: Vec<PermissionDraft> = new_permissions
                .into_iter()
                .map(PermissionRecord::into_draft)
                .collect();
            self.catalog.insert_permissions(drafts)?;
            dirty = true;
        }

        if !new_role_drafts.is_empty() {
            self.catalog.insert_roles(new_role_drafts)?;
            dirty = true;
        }

        for (role_name, grants) in pending_grants {
            let Some(role) = self.catalog.role_by_name(&role_name) else {
                continue;
            };
            let resolved: Vec<PermissionId> = grants
                .iter()
                .filter_map(|grant| self.resolve_grant(grant))
                .collect();
            if resolved.is_empty() {
                continue;
            }
            self.catalog.grant(&role.id, &resolved)?;
            dirty = true;
        }

        if dirty {
            self.persist().await;
        }

        Ok(())
    }

    /// Resolve a stored grant reference against the live permission set
    ///
    /// Natural keys are authoritative; a surrogate id is only trusted when
    /// it is live right now. Anything else is dropped, not an error.
    fn resolve_grant(&self, grant: &GrantRef) -> Option<PermissionId> {
        let resolved = match grant {
            GrantRef::Key(key) => self
                .catalog
                .permission_by_key(&key.action, &key.resource)
                .map(|permission| permission.id),
            GrantRef::Id(id) => self.catalog.permission(id).map(|permission| permission.id),
        };
        if resolved.is_none() {
            debug!(?grant, "dropping unresolvable grant reference");
        }
        resolved
    }

    /// Sync, then return the full current catalog
    pub async fn list(&self) -> Result<CatalogView> {
        self.sync().await?;
        Ok(self.view())
    }

    /// Serialize the current catalog without syncing
    pub fn view(&self) -> CatalogView {
        let permissions = self.catalog.permissions();
        let roles = self
            .catalog
            .roles()
            .into_iter()
            .map(|role| {
                let resolved = role
                    .permissions
                    .iter()
                    .filter_map(|id| self.catalog.permission(id))
                    .collect();
                RoleView {
                    id: role.id,
                    name: role.name,
                    display_name: role.display_name,
                    description: role.description,
                    permissions: resolved,
                }
            })
            .collect();

        CatalogView { permissions, roles }
    }

    // === Persistence ===

    /// Export the catalog and hand it to the active backend, full-replace
    ///
    /// Fire-and-forget with respect to the mutating caller: failures land in
    /// the deferred error slot and are logged, never thrown back into the
    /// call that happened to trigger the save.
    async fn persist(&self) {
        let snapshot = self.catalog.export();
        if let Err(err) = self.active_storage().save(&snapshot).await {
            warn!(error = %err, "failed to persist catalog snapshot");
            *self.last_save_error.lock() = Some(err);
        }
    }

    /// Take the most recent deferred save failure, if any
    pub fn take_save_error(&self) -> Option<Error> {
        self.last_save_error.lock().take()
    }

    // === Entity mutations ===

    /// Create a permission through the validated path
    pub async fn create_permission(&self, draft: PermissionDraft) -> Result<Permission> {
        let _guard = self.op_lock.lock().await;
        let created = self.catalog.insert_permission(draft)?;
        self.persist().await;
        Ok(created)
    }

    /// Create a batch of permissions; per-record semantics, see
    /// [`Catalog::insert_permissions`]
    pub async fn create_permissions(
        &self,
        drafts: Vec<PermissionDraft>,
    ) -> Result<Vec<Permission>> {
        let _guard = self.op_lock.lock().await;
        let before = self.catalog.permission_count();
        let result = self.catalog.insert_permissions(drafts);
        if self.catalog.permission_count() != before {
            self.persist().await;
        }
        result
    }

    /// Create a role through the validated path
    pub async fn create_role(&self, draft: RoleDraft) -> Result<Role> {
        let _guard = self.op_lock.lock().await;
        let created = self.catalog.insert_role(draft)?;
        self.persist().await;
        Ok(created)
    }

    /// Create a batch of roles; per-record semantics
    pub async fn create_roles(&self, drafts: Vec<RoleDraft>) -> Result<Vec<Role>> {
        let _guard = self.op_lock.lock().await;
        let before = self.catalog.role_count();
        let result = self.catalog.insert_roles(drafts);
        if self.catalog.role_count() != before {
            self.persist().await;
        }
        result
    }

    /// Patch a permission
    pub async fn update_permission(
        &self,
        id: &PermissionId,
        patch: PermissionPatch,
    ) -> Result<Permission> {
        let _guard = self.op_lock.lock().await;
        let updated = self.catalog.update_permission(id, patch)?;
        self.persist().await;
        Ok(updated)
    }

    /// Patch a role
    pub async fn update_role(&self, id: &RoleId, patch: RolePatch) -> Result<Role> {
        let _guard = self.op_lock.lock().await;
        let updated = self.catalog.update_role(id, patch)?;
        self.persist().await;
        Ok(updated)
    }

    /// Remove a permission; role references to it are left to dangle
    pub async fn remove_permission(&self, id: &PermissionId) -> Result<Permission> {
        let _guard = self.op_lock.lock().await;
        let removed = self.catalog.remove_permission(id)?;
        self.persist().await;
        Ok(removed)
    }

    /// Remove a role
    pub async fn remove_role(&self, id: &RoleId) -> Result<Role> {
        let _guard = self.op_lock.lock().await;
        let removed = self.catalog.remove_role(id)?;
        self.persist().await;
        Ok(removed)
    }

    /// Grant permissions to a role, set-union
    pub async fn grant(&self, role_id: &RoleId, permission_ids: &[PermissionId]) -> Result<Role> {
        let _guard = self.op_lock.lock().await;
        let updated = self.catalog.grant(role_id, permission_ids)?;
        self.persist().await;
        Ok(updated)
    }

    /// Revoke permissions from a role, set-difference
    pub async fn revoke(&self, role_id: &RoleId, permission_ids: &[PermissionId]) -> Result<Role> {
        let _guard = self.op_lock.lock().await;
        let updated = self.catalog.revoke(role_id, permission_ids)?;
        self.persist().await;
        Ok(updated)
    }

    /// Drop every permission
    pub async fn destroy_permissions(&self) {
        let _guard = self.op_lock.lock().await;
        self.catalog.destroy_permissions();
        self.persist().await;
    }

    /// Drop every role
    pub async fn destroy_roles(&self) {
        let _guard = self.op_lock.lock().await;
        self.catalog.destroy_roles();
        self.persist().await;
    }

    /// Empty the catalog and persist the empty snapshot
    pub async fn reset(&self) {
        let _guard = self.op_lock.lock().await;
        self.catalog.destroy_permissions();
        self.catalog.destroy_roles();
        self.persist().await;
    }

    // === Reads ===

    /// Look a permission up by natural key
    pub fn permission(&self, action: &str, resource: &str) -> Option<Permission> {
        self.catalog.permission_by_key(action, resource)
    }

    /// Look a role up by name
    pub fn role(&self, name: &str) -> Option<Role> {
        self.catalog.role_by_name(name)
    }

    /// All live permissions, ordered by natural key
    pub fn permissions(&self) -> Vec<Permission> {
        self.catalog.permissions()
    }

    /// All live roles, ordered by name
    pub fn roles(&self) -> Vec<Role> {
        self.catalog.roles()
    }

    /// Whether the named role holds a live grant for `(action, resource)`
    pub fn can(&self, role_name: &str, action: &str, resource: &str) -> bool {
        self.catalog
            .role_by_name(role_name)
            .map(|role| self.catalog.can(&role.id, action, resource))
            .unwrap_or(false)
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}
