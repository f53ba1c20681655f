//! JSON file storage backend

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use warden_domain::{Result, Snapshot, Storage};

use crate::error::StorageError;

/// Single-file JSON backend
///
/// `list` bootstraps the file with an empty snapshot when it is missing and
/// treats unparseable content as empty rather than failing the sync; `save`
/// rewrites the whole file (creating parent directories as needed).
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a backend persisting to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this backend persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(snapshot).map_err(StorageError::from)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn list(&self) -> Result<Snapshot> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => Ok(snapshot),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "snapshot file unparseable, treating as empty"
                    );
                    Ok(Snapshot::empty())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "snapshot file missing, bootstrapping");
                let empty = Snapshot::empty();
                self.write_snapshot(&empty).await?;
                Ok(empty)
            }
            Err(e) => Err(StorageError::io(&self.path, e).into()),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        debug!(path = %self.path.display(), "saving snapshot");
        self.write_snapshot(snapshot).await
    }

    async fn clear(&self) -> Result<()> {
        self.write_snapshot(&Snapshot::empty()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_domain::PermissionRecord;

    fn storage_in(dir: &tempfile::TempDir) -> FileStorage {
        FileStorage::new(dir.path().join("rbac.json"))
    }

    #[tokio::test]
    async fn test_list_bootstraps_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let snapshot = storage.list().await.unwrap();
        assert!(snapshot.is_empty());
        assert!(storage.path().exists());

        let content = std::fs::read_to_string(storage.path()).unwrap();
        let reread: Snapshot = serde_json::from_str(&content).unwrap();
        assert!(reread.is_empty());
    }

    #[tokio::test]
    async fn test_list_tolerates_garbage_content() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        std::fs::write(storage.path(), "not json at all {").unwrap();

        let snapshot = storage.list().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_list_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let mut snapshot = Snapshot::empty();
        snapshot.permissions.push(PermissionRecord {
            id: None,
            action: "read".into(),
            resource: "post".into(),
            display_name: Some("Read posts".into()),
            description: None,
        });

        storage.save(&snapshot).await.unwrap();
        let listed = storage.list().await.unwrap();
        assert_eq!(listed, snapshot);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/deeper/rbac.json"));

        storage.save(&Snapshot::empty()).await.unwrap();
        assert!(storage.path().exists());
    }

    #[tokio::test]
    async fn test_clear_rewrites_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let mut snapshot = Snapshot::empty();
        snapshot.permissions.push(PermissionRecord {
            id: None,
            action: "read".into(),
            resource: "post".into(),
            display_name: None,
            description: None,
        });
        storage.save(&snapshot).await.unwrap();

        storage.clear().await.unwrap();
        assert!(storage.list().await.unwrap().is_empty());
    }
}
