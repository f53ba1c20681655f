//! Storage backends for the warden catalog
//!
//! Every backend implements the `warden_domain::Storage` contract:
//! `list` returns the latest snapshot (empty-but-valid when nothing is
//! persisted yet), `save` replaces the persisted state wholesale, `clear`
//! drops it.
//!
//! ## Backends
//!
//! - [`MemoryStorage`] — process-lifetime store, the default backend
//! - [`FileStorage`] — a single pretty-printed JSON file
//! - `SurrealStorage` — document store over SurrealDB, behind the
//!   `surrealdb-backend` feature (embedded in-memory or remote server)
//!
//! Relational backends live outside this crate; they implement the same
//! trait and translate to the snapshot wire shape at the boundary.

pub mod error;
pub mod file;
pub mod memory;

#[cfg(feature = "surrealdb-backend")]
pub mod surreal;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

#[cfg(feature = "surrealdb-backend")]
pub use surreal::{
    create_shared_connection, ConnectionError, ConnectionMode, SharedConnection,
    SurrealConnection, SurrealStorage,
};
