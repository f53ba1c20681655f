//! SurrealDB snapshot store

use async_trait::async_trait;
use tracing::debug;

use warden_domain::{PermissionRecord, Result, RoleRecord, Snapshot, Storage};

use crate::error::StorageError;

use super::connection::{DatabaseClient, SharedConnection};

const PERMISSIONS_TABLE: &str = "permissions";
const ROLES_TABLE: &str = "roles";

/// Document storage backend over SurrealDB
///
/// Keeps the wire records in two tables. `save` is a full replace: both
/// tables are emptied and re-inserted, the way the catalog's persistence
/// model expects.
pub struct SurrealStorage {
    connection: SharedConnection,
}

impl SurrealStorage {
    /// Create a store over an established connection
    pub fn new(connection: SharedConnection) -> Self {
        Self { connection }
    }
}

fn to_storage_error(e: surrealdb::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

#[async_trait]
impl Storage for SurrealStorage {
    async fn list(&self) -> Result<Snapshot> {
        debug!("listing snapshot from SurrealDB");

        let (permissions, roles): (Vec<PermissionRecord>, Vec<RoleRecord>) =
            match self.connection.client() {
                DatabaseClient::Local(db) => {
                    let permissions = db
                        .select(PERMISSIONS_TABLE)
                        .await
                        .map_err(to_storage_error)?;
                    let roles = db.select(ROLES_TABLE).await.map_err(to_storage_error)?;
                    (permissions, roles)
                }
                DatabaseClient::Remote(db) => {
                    let permissions = db
                        .select(PERMISSIONS_TABLE)
                        .await
                        .map_err(to_storage_error)?;
                    let roles = db.select(ROLES_TABLE).await.map_err(to_storage_error)?;
                    (permissions, roles)
                }
            };

        Ok(Snapshot { permissions, roles })
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        debug!(
            permissions = snapshot.permissions.len(),
            roles = snapshot.roles.len(),
            "saving snapshot to SurrealDB"
        );

        self.clear().await?;

        match self.connection.client() {
            DatabaseClient::Local(db) => {
                for record in &snapshot.permissions {
                    let _: Option<PermissionRecord> = db
                        .create(PERMISSIONS_TABLE)
                        .content(record.clone())
                        .await
                        .map_err(to_storage_error)?;
                }
                for record in &snapshot.roles {
                    let _: Option<RoleRecord> = db
                        .create(ROLES_TABLE)
                        .content(record.clone())
                        .await
                        .map_err(to_storage_error)?;
                }
            }
            DatabaseClient::Remote(db) => {
                for record in &snapshot.permissions {
                    let _: Option<PermissionRecord> = db
                        .create(PERMISSIONS_TABLE)
                        .content(record.clone())
                        .await
                        .map_err(to_storage_error)?;
                }
                for record in &snapshot.roles {
                    let _: Option<RoleRecord> = db
                        .create(ROLES_TABLE)
                        .content(record.clone())
                        .await
                        .map_err(to_storage_error)?;
                }
            }
        }

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match self.connection.client() {
            DatabaseClient::Local(db) => {
                db.query("DELETE permissions; DELETE roles;")
                    .await
                    .map_err(to_storage_error)?
                    .check()
                    .map_err(to_storage_error)?;
            }
            DatabaseClient::Remote(db) => {
                db.query("DELETE permissions; DELETE roles;")
                    .await
                    .map_err(to_storage_error)?
                    .check()
                    .map_err(to_storage_error)?;
            }
        }

        Ok(())
    }
}
