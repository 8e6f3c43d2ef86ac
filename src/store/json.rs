use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;

use super::{Snapshot, SnapshotStore};

/// Snapshot store backed by one JSON file.
///
/// Each save writes a sibling `*.tmp` file and renames it over the target, so a
/// crash mid-write leaves the previous snapshot intact. Saves are serialized
/// and a revision older than the last written one is skipped.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    written: Mutex<Option<u64>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Mutex::new(None),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), revision = snapshot.revision, "snapshot loaded");
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<bool, StoreError> {
        let mut written = self.written.lock().await;
        if written.is_some_and(|rev| rev > snapshot.revision) {
            return Ok(false);
        }

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;

        *written = Some(snapshot.revision);
        debug!(path = %self.path.display(), revision = snapshot.revision, "snapshot written");
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::Allocator;
    use crate::model::EventInfo;
    use crate::store::EventRecord;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("event.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/event.json"));

        let mut alloc = Allocator::new(10, 9);
        alloc.admit("Alpha", 9).unwrap();
        alloc.admit("Beta", 3).unwrap();
        let snapshot = Snapshot {
            revision: 2,
            event: Some(EventRecord::capture(&EventInfo::new("Cup"), &alloc, [])),
        };

        assert!(store.save(&snapshot).await.unwrap());
        assert!(!store.path().with_extension("tmp").exists());
        assert_eq!(store.load().await.unwrap(), Some(snapshot.clone()));

        let stale = Snapshot {
            revision: 1,
            event: None,
        };
        assert!(!store.save(&stale).await.unwrap());
        assert_eq!(store.load().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_garbage_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let err = JsonFileStore::new(path).load().await.unwrap_err();
        assert_eq!(err.as_label(), "store_json");
    }
}
