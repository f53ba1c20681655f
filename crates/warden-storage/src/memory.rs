//! In-memory storage backend

use async_trait::async_trait;
use parking_lot::RwLock;

use warden_domain::{Result, Snapshot, Storage};

/// Process-lifetime storage backend
///
/// Keeps the last saved snapshot in memory; this is the default backend a
/// provider starts with. Also the natural choice for tests, via
/// [`MemoryStorage::with_data`] seeding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: RwLock<Snapshot>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend seeded with an initial snapshot
    pub fn with_data(snapshot: Snapshot) -> Self {
        Self {
            store: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list(&self) -> Result<Snapshot> {
        Ok(self.store.read().clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.store.write() = snapshot.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.store.write() = Snapshot::empty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_domain::PermissionRecord;

    fn permission_record(action: &str, resource: &str) -> PermissionRecord {
        PermissionRecord {
            id: None,
            action: action.into(),
            resource: resource.into(),
            display_name: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let storage = MemoryStorage::new();
        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_wholesale() {
        let storage = MemoryStorage::new();

        let mut first = Snapshot::empty();
        first.permissions.push(permission_record("read", "post"));
        storage.save(&first).await.unwrap();

        let mut second = Snapshot::empty();
        second.permissions.push(permission_record("write", "post"));
        storage.save(&second).await.unwrap();

        let listed = storage.list().await.unwrap();
        assert_eq!(listed.permissions.len(), 1);
        assert_eq!(listed.permissions[0].action, "write");
    }

    #[tokio::test]
    async fn test_with_data_seeds_snapshot() {
        let mut seed = Snapshot::empty();
        seed.permissions.push(permission_record("read", "post"));

        let storage = MemoryStorage::with_data(seed);
        assert_eq!(storage.list().await.unwrap().permissions.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_store() {
        let mut seed = Snapshot::empty();
        seed.permissions.push(permission_record("read", "post"));

        let storage = MemoryStorage::with_data(seed);
        storage.clear().await.unwrap();
        assert!(storage.list().await.unwrap().is_empty());
    }
}
