//! # seatvisor
//!
//! **Seatvisor** is a capacity and waitlist allocation engine for team-based
//! event sign-ups.
//!
//! An event has a fixed number of seats. Teams request seats; whatever does not
//! fit is queued on a FIFO waitlist, and seats freed by shrinking, removal or a
//! capacity expansion are handed to the waitlist head first. Partial admission
//! is allowed: a team may hold some seats and wait for the rest.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   requester / organizer calls
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registrar (async coordinator, one Mutex per event)               │
//! │  - EventInfo (title, description, expiry)                         │
//! │  - Allocator (capacity, TeamRegistry, Waitlist)                   │
//! │  - Assignments (requester ─► team)                                │
//! └──────┬──────────────────────────────────────┬─────────────────────┘
//!        │ revision order, outside the lock     │ after unlock
//!        ▼                                      ▼
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │ Bus (broadcast of Notice)    │   │ SnapshotStore                │
//! │ capacity: Config::bus_cap..  │   │ MemoryStore | JsonFileStore  │
//! └──────────────┬───────────────┘   └──────────────────────────────┘
//!                ▼
//!        ┌────────────────┐
//!        │    listener    │
//!        └───────┬────────┘
//!                ▼
//!          SubscriberSet (per-sub queues)
//!      ┌─────────┼─────────┐
//!      ▼         ▼         ▼
//!  LogWriter  worker2   workerN
//! ```
//!
//! ### Admission
//! ```text
//! admit(team, n)
//!   ├─► promote(free seats) first if anyone waits (forced entries)
//!   ├─ team already queued ─► append n to its waitlist entry (no queue jumping)
//!   ├─ fits (n <= capacity - used) ─► registry += n
//!   └─ otherwise ─► registry += free seats, waitlist += rest
//!
//! seats freed ─► promote(freed):
//!   while freed > 0 and waitlist not empty:
//!     head gets min(freed, head.pending); a partially served head stays first
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                   |
//! |-------------------|--------------------------------------------------------------|--------------------------------------|
//! | **Engine**        | Synchronous admission, resize, removal and promotion rules.  | [`Allocator`], [`Admission`]         |
//! | **Coordinator**   | Serialized async access, requesters, sweeping, queries.      | [`Registrar`], [`RegistrarBuilder`]  |
//! | **Notices**       | One notice per committed change, fanned out to subscribers.  | [`Notice`], [`Subscribe`]            |
//! | **Persistence**   | Revisioned snapshots with legacy-format migration.           | [`SnapshotStore`], [`JsonFileStore`] |
//! | **Errors**        | Typed errors with stable labels.                             | [`AllocError`], [`RegistrarError`]   |
//! | **Configuration** | Seat and team size defaults, sweep interval.                 | [`Config`]                           |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], a `tracing` subscriber for notices.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use seatvisor::{Config, EventInfo, Registrar};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), seatvisor::RegistrarError> {
//!     let cfg = Config { max_slots: 12, ..Config::default() };
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn seatvisor::Subscribe>> = vec![Arc::new(seatvisor::LogWriter)];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn seatvisor::Subscribe>> = Vec::new();
//!
//!     let registrar = Registrar::builder(cfg).with_subscribers(subs).build();
//!     registrar.restore().await?;
//!     registrar.create_event(EventInfo::new("Spring Cup")).await?;
//!
//!     registrar.admit("Red Foxes", 9).await?;
//!     let blue = registrar.admit("Blue Jays", 6).await?;
//!     assert_eq!((blue.admitted, blue.waitlisted), (3, 3));
//!
//!     let removal = registrar.remove("red foxes").await?;
//!     assert_eq!(removal.promotions[0].moved, 3);
//!
//!     let token = CancellationToken::new();
//!     token.cancel();
//!     registrar.run(token).await;
//!     Ok(())
//! }
//! ```
mod allocation;
mod config;
mod core;
mod error;
mod ledger;
mod model;
mod notices;
mod store;
mod subscribers;

// ---- Public re-exports ----

pub use allocation::{
    Admission, Allocator, AllocatorParts, Placement, Promotion, Removal, Resize, SizeLimit,
    Standing,
};
pub use config::Config;
pub use core::{
    Assignments, Registrar, RegistrarBuilder, RosterRow, RosterStatus, SearchHit, SweepOutcome,
};
pub use error::{AllocError, RegistrarError, StoreError};
pub use ledger::{TeamRegistry, Waitlist};
pub use model::{EventInfo, Registration, TeamId, TeamName, WaitlistEntry};
pub use notices::{Bus, Notice, NoticeKind};
pub use store::{
    EventRecord, JsonFileStore, MemoryStore, Snapshot, SnapshotStore, TeamRow, WaitlistRow,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Built-in `tracing` subscriber for notices.
// Disable with: `--no-default-features`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
