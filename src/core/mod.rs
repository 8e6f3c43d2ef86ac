//! Coordinator: the async owner of the active event.
//!
//! The only public entry point is [`Registrar`]; the allocation engine it wraps
//! stays synchronous and lock-free.
//!
//! Internal modules:
//! - [`registrar`]: serialized commit path, publishing and persistence;
//! - [`builder`]: wiring of bus, subscribers and store;
//! - [`sweeper`]: periodic expiry and promotion;
//! - [`assignments`]: requester to team map;
//! - [`query`]: search and roster export;
//! - `notify`: outcome to notice translation.

mod assignments;
mod builder;
mod notify;
mod query;
mod registrar;
mod sweeper;

pub use assignments::Assignments;
pub use builder::RegistrarBuilder;
pub use query::{RosterRow, RosterStatus, SearchHit};
pub use registrar::{Registrar, SweepOutcome};
