//! # Allocation engine.
//!
//! [`Allocator`] is the synchronous core: capacity counter, registry and waitlist
//! of one event plus the admission, resize, removal and promotion rules. The
//! lifecycle operations (expand, close, open, clamp) live in `lifecycle.rs`.
//!
//! ## Example
//! ```rust
//! use seatvisor::Allocator;
//!
//! let mut alloc = Allocator::new(60, 60);
//! alloc.admit("Alpha", 56).unwrap();
//!
//! let a = alloc.admit("Beta", 9).unwrap();
//! assert_eq!((a.admitted, a.waitlisted), (4, 5));
//!
//! let removal = alloc.remove("alpha").unwrap();
//! assert_eq!(removal.promotions[0].moved, 5);
//! assert_eq!(alloc.used_seats(), 9);
//! ```

mod allocator;
mod lifecycle;
mod outcome;
mod policy;

pub use allocator::{Allocator, AllocatorParts};
pub use outcome::{Admission, Promotion, Removal, Resize, Standing};
pub use policy::{Placement, SizeLimit};
