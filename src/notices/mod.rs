//! Notices: types and broadcast bus.
//!
//! ## Contents
//! - [`NoticeKind`], [`Notice`] classification and payload
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Registrar` (after each commit), `Sweeper` (through the registrar),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the registrar's listener task, which fans out to `SubscriberSet`.
//!
//! ## Ordering
//! - Notices of one operation are published together, in the order the changes were applied.
//! - Operations publish in commit (revision) order; `seq` increases along the bus.
//! - Subscriber-generated notices (overflow, panic) and `SnapshotFailed` are published
//!   later, from outside the commit, and may interleave with other operations.

mod bus;
mod notice;

pub use bus::Bus;
pub use notice::{Notice, NoticeKind};
