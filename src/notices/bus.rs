//! # Notice bus.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. The registrar
//! publishes after it released the event lock; subscriber workers publish
//! overflow and panic notices.
//!
//! ```text
//! Registrar ───┐
//! Sweeper   ───┼──────► Bus ───────► listener ────► SubscriberSet
//! Workers   ───┘  (broadcast chan)  (in Registrar)
//! ```
//!
//! ## Rules
//! - `publish()` never blocks.
//! - One ring buffer of `capacity` notices is shared by all receivers.
//! - Slow receivers get `RecvError::Lagged(n)` and skip the `n` oldest notices.
//! - Notices sent while nobody listens are dropped.

use tokio::sync::broadcast;

use super::notice::Notice;

/// Broadcast channel for notices.
///
/// Cheap to clone; all clones publish into the same channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Notice>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Notice>(capacity);
        Self { tx }
    }

    /// Publishes a notice to all active receivers.
    pub fn publish(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }

    /// Publishes notices in order.
    pub fn publish_all(&self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.publish(notice);
        }
    }

    /// Creates a receiver that observes notices sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}
