//! Embedded role-based access control with pluggable storage backends
//!
//! A [`Provider`] keeps an in-memory catalog of [`Permission`]s
//! (action+resource pairs) and [`Role`]s (named grants of permissions),
//! enforces uniqueness and identifier invariants on every mutation, and
//! reconciles the catalog with a persistent backend through `sync`/`list`.
//! Backends are interchangeable: in-process memory, a JSON file, or a
//! SurrealDB document store behind the `surrealdb-backend` feature.
//!
//! ## Example
//!
//! ```
//! use warden::{PermissionDraft, Provider, RoleDraft};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> warden::Result<()> {
//! let provider = Provider::new();
//!
//! let read = provider
//!     .create_permission(PermissionDraft::new("read", "post"))
//!     .await?;
//! let member = provider.create_role(RoleDraft::new("member")).await?;
//! provider.grant(&member.id, &[read.id.clone()]).await?;
//!
//! assert!(provider.can("member", "read", "post"));
//! assert!(!provider.can("member", "delete", "post"));
//! # Ok(())
//! # }
//! ```
//!
//! Swap backends with [`Provider::use_storage`]; the next `sync` merges the
//! backend's snapshot into the live catalog, re-linking role grants through
//! natural keys.

pub use warden_domain::{
    validate_identifier, Error, GrantRef, Permission, PermissionDraft, PermissionId,
    PermissionKey, PermissionPatch, PermissionRecord, Result, Role, RoleDraft, RoleId, RolePatch,
    RoleRecord, Snapshot, Storage,
};
pub use warden_provider::{Catalog, CatalogView, Provider, RoleView};
pub use warden_storage::{FileStorage, MemoryStorage, StorageError};

#[cfg(feature = "surrealdb-backend")]
pub use warden_storage::{
    create_shared_connection, ConnectionError, ConnectionMode, SharedConnection,
    SurrealConnection, SurrealStorage,
};
