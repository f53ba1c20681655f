//! Entity store and synchronization engine for the warden catalog
//!
//! [`Catalog`] is the validated in-memory store for permissions and roles;
//! [`Provider`] owns a catalog and an active storage backend and reconciles
//! the two through `sync`/`list`, persisting the catalog wholesale after
//! every successful mutation.

pub mod catalog;
pub mod provider;

pub use catalog::Catalog;
pub use provider::{CatalogView, Provider, RoleView};
