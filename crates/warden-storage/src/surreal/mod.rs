//! SurrealDB document storage backend
//!
//! Embedded in-memory mode for tests and development, WebSocket client mode
//! for a shared server. Enabled with the `surrealdb-backend` feature.

pub mod connection;
pub mod store;

pub use connection::{
    create_shared_connection, ConnectionError, ConnectionMode, DatabaseClient, SharedConnection,
    SurrealConnection,
};
pub use store::SurrealStorage;
