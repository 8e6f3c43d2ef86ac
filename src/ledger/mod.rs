//! Leaf data structures the allocator operates on.
//!
//! ## Contents
//! - [`TeamRegistry`] exact-size bookkeeping of admitted teams
//! - [`Waitlist`]     FIFO of pending requests with lookup by name
//!
//! Neither structure knows about capacity. Keeping `used_seats` equal to
//! [`TeamRegistry::total`] is the allocator's job.

mod registry;
mod waitlist;

pub use registry::TeamRegistry;
pub use waitlist::Waitlist;
