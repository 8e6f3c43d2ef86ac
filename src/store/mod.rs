//! # Persistence gateway.
//!
//! The registrar writes a [`Snapshot`] after every committed operation and
//! reads one back at startup. Where snapshots live is up to the
//! [`SnapshotStore`] implementation.
//!
//! ## Contents
//! - [`SnapshotStore`] trait
//! - [`MemoryStore`] keeps the latest snapshot in memory (tests, embedding)
//! - [`JsonFileStore`] one JSON file, replaced atomically on each save
//! - [`Snapshot`], [`EventRecord`] the document, with legacy-format migration
//!
//! ## Rules
//! - Saves run after the event lock is released, so they may arrive out of order;
//!   stores skip any snapshot whose revision is older than the last one written.
//! - A failed save does not roll back the committed state.

mod json;
mod memory;
mod snapshot;

use async_trait::async_trait;

use crate::error::StoreError;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub(crate) use snapshot::Restored;
pub use snapshot::{EventRecord, Snapshot, TeamRow, WaitlistRow};

/// Contract for snapshot storage.
#[async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Returns the latest snapshot, or `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Writes a snapshot.
    ///
    /// Returns `Ok(false)` if a newer revision was already written and this one
    /// was skipped.
    async fn save(&self, snapshot: &Snapshot) -> Result<bool, StoreError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
