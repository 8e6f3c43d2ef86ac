use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;

use super::{Snapshot, SnapshotStore};

/// In-memory snapshot store.
///
/// Keeps the newest snapshot only. Share it through an `Arc` to inspect what a
/// registrar saved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    latest: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            latest: Mutex::new(Some(snapshot)),
        }
    }

    /// Revision of the stored snapshot.
    pub async fn revision(&self) -> Option<u64> {
        self.latest.lock().await.as_ref().map(|s| s.revision)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.latest.lock().await.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<bool, StoreError> {
        let mut latest = self.latest.lock().await;
        if latest
            .as_ref()
            .is_some_and(|cur| cur.revision > snapshot.revision)
        {
            return Ok(false);
        }
        *latest = Some(snapshot.clone());
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_revision_is_skipped() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        let newer = Snapshot {
            revision: 5,
            event: None,
        };
        let older = Snapshot {
            revision: 4,
            event: None,
        };
        assert!(store.save(&newer).await.unwrap());
        assert!(!store.save(&older).await.unwrap());
        assert_eq!(store.revision().await, Some(5));
        assert!(store.save(&newer).await.unwrap());
    }
}
