//! # Per-request placement and size-limit policies
//!
//! Every admission decides where requested seats go. Normally that is decided
//! by free capacity alone; organizers can override two things.
//!
//! ## Variants
//! - [`Placement::Auto`]: grant what capacity allows, queue the rest.
//! - [`Placement::Waitlist`]: queue the whole request even if seats are free.
//! - [`SizeLimit::Enforce`]: the resulting team size must not exceed `max_team_size`.
//! - [`SizeLimit::Override`]: skip the `max_team_size` check.
//!
//! ## Invariants
//! - Neither policy can push `used_seats` above `capacity`.
//! - Queued requests are promoted strictly in submission order.

/// Where the seats of a new request go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Admit up to the free capacity, waitlist the remainder.
    ///
    /// Use when:
    /// - A team registers or grows through the normal flow
    #[default]
    Auto,

    /// Append the whole request to the waitlist tail.
    ///
    /// Use when:
    /// - Organizers add a team that must not jump the queue
    /// - Example: a late team added while others already wait
    Waitlist,
}

/// Whether a request is checked against `max_team_size`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeLimit {
    /// Reject sizes above `max_team_size` (default).
    #[default]
    Enforce,

    /// Accept any size; capacity rules still apply.
    ///
    /// Use when:
    /// - Organizers correct a team beyond the public limit
    Override,
}
