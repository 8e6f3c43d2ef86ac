//! # Notification gateway trait
//!
//! `Subscribe` is the extension point for delivering notices to the outside
//! world (chat messages, mail, audit logs). Each subscriber is driven by a
//! dedicated worker fed by a bounded queue owned by the
//! [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, retries); they never block allocation
//!   nor other subscribers.
//! - If the queue overflows, notices for that subscriber are dropped and a
//!   `SubscriberOverflow` notice is published.
//!
//! ## Example
//! ```rust
//! use seatvisor::{Notice, NoticeKind, Subscribe};
//!
//! struct Announcer;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Announcer {
//!     async fn on_notice(&self, n: &Notice) {
//!         if n.kind == NoticeKind::TeamPromoted {
//!             // tell the team its seats are confirmed
//!         }
//!     }
//!     fn name(&self) -> &'static str { "announcer" }
//!     fn queue_capacity(&self) -> usize { 256 }
//! }
//! ```

use async_trait::async_trait;

use crate::notices::Notice;

/// Contract for notice subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single notice.
    async fn on_notice(&self, notice: &Notice);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
