//! Storage adapter contract
//!
//! The domain owns the persistence interface; infrastructure crates
//! implement it. Persistence is full-replace: every `save` overwrites the
//! backend's previous snapshot wholesale, and the in-memory catalog is the
//! source of truth at write time.

use async_trait::async_trait;

use crate::errors::Result;
use crate::snapshot::Snapshot;

/// Uniform contract every persistence backend implements
///
/// Backends own their connection/resource lifecycle and must tolerate
/// repeated `list`/`save` calls without leaking resources.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the latest persisted snapshot
    ///
    /// Must return an empty-but-valid snapshot (not an error) when no data
    /// exists yet.
    async fn list(&self) -> Result<Snapshot>;

    /// Replace the persisted state with `snapshot`
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Drop all persisted state
    ///
    /// Used by test/reset tooling. Optional; backends without a natural
    /// reset may leave the default no-op.
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}
