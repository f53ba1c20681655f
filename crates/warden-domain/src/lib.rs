//! Core data model for the warden authorization catalog
//!
//! Defines the two entity kinds (Permission, Role), their value objects and
//! natural keys, the snapshot wire types exchanged with storage backends, the
//! error taxonomy, and the `Storage` contract that infrastructure crates
//! implement. No I/O happens here.

pub mod errors;
pub mod permission;
pub mod role;
pub mod snapshot;
pub mod storage;
pub mod validation;
pub mod value_objects;

pub use errors::{Error, Result};
pub use permission::{Permission, PermissionDraft, PermissionPatch};
pub use role::{Role, RoleDraft, RolePatch};
pub use snapshot::{GrantRef, PermissionRecord, RoleRecord, Snapshot};
pub use storage::Storage;
pub use validation::validate_identifier;
pub use value_objects::{PermissionId, PermissionKey, RoleId};
