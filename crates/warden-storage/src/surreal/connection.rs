//! SurrealDB connection management
//!
//! Supports embedded (in-memory) and client-server modes. Connections are
//! created once and shared across repeated `list`/`save` calls via
//! [`SharedConnection`]; SurrealDB multiplexes over the single client.

use std::sync::Arc;

use surrealdb::engine::local::{Db as LocalDb, Mem};
use surrealdb::engine::remote::ws::{Client as WsClient, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use thiserror::Error;
use tracing::{debug, info};

/// Connection mode for SurrealDB
#[derive(Debug, Clone)]
pub enum ConnectionMode {
    /// In-memory database (no persistence, for testing/development)
    Memory,
    /// Remote server connection via WebSocket
    Remote {
        url: String,
        username: String,
        password: String,
    },
}

impl Default for ConnectionMode {
    fn default() -> Self {
        Self::Memory
    }
}

/// SurrealDB connection errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to connect to SurrealDB: {0}")]
    Connection(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("database selection failed: {0}")]
    DatabaseSelection(String),
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),
}

/// Unified database client that works with both embedded and remote modes
pub enum DatabaseClient {
    /// Embedded local database
    Local(Surreal<LocalDb>),
    /// Remote WebSocket client
    Remote(Surreal<WsClient>),
}

/// SurrealDB connection wrapper
///
/// Manages connection lifecycle and namespace/database selection.
pub struct SurrealConnection {
    client: DatabaseClient,
    mode: ConnectionMode,
    namespace: String,
    database: String,
}

impl SurrealConnection {
    /// Create a new connection with the specified mode
    ///
    /// Default namespace: "warden"; default database: "main".
    pub async fn new(mode: ConnectionMode) -> Result<Self, ConnectionError> {
        Self::with_names(mode, "warden", "main").await
    }

    /// Create a new connection with custom namespace and database
    pub async fn with_names(
        mode: ConnectionMode,
        namespace: &str,
        database: &str,
    ) -> Result<Self, ConnectionError> {
        let client = match &mode {
            ConnectionMode::Memory => {
                info!("connecting to SurrealDB in-memory");
                let db = Surreal::new::<Mem>(())
                    .await
                    .map_err(|e| ConnectionError::Connection(e.to_string()))?;
                DatabaseClient::Local(db)
            }

            ConnectionMode::Remote {
                url,
                username,
                password,
            } => {
                info!("connecting to SurrealDB remote at {}", url);
                let db = Surreal::new::<Ws>(url.as_str())
                    .await
                    .map_err(|e| ConnectionError::Connection(e.to_string()))?;

                db.signin(Root {
                    username: username.as_str(),
                    password: password.as_str(),
                })
                .await
                .map_err(|e| ConnectionError::Authentication(e.to_string()))?;

                DatabaseClient::Remote(db)
            }
        };

        match &client {
            DatabaseClient::Local(db) => {
                db.use_ns(namespace)
                    .use_db(database)
                    .await
                    .map_err(|e| ConnectionError::DatabaseSelection(e.to_string()))?;
            }
            DatabaseClient::Remote(db) => {
                db.use_ns(namespace)
                    .use_db(database)
                    .await
                    .map_err(|e| ConnectionError::DatabaseSelection(e.to_string()))?;
            }
        }

        debug!(namespace, database, "connected to SurrealDB");

        Ok(Self {
            client,
            mode,
            namespace: namespace.to_string(),
            database: database.to_string(),
        })
    }

    /// Get the connection mode
    pub fn mode(&self) -> &ConnectionMode {
        &self.mode
    }

    /// Get the namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the database
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Get the underlying database client
    pub fn client(&self) -> &DatabaseClient {
        &self.client
    }

    /// Check if connected in embedded mode
    pub fn is_embedded(&self) -> bool {
        matches!(self.mode, ConnectionMode::Memory)
    }
}

/// Thread-safe handle for sharing a connection across stores
pub type SharedConnection = Arc<SurrealConnection>;

/// Create a shared connection
pub async fn create_shared_connection(
    mode: ConnectionMode,
) -> Result<SharedConnection, ConnectionError> {
    Ok(Arc::new(SurrealConnection::new(mode).await?))
}
