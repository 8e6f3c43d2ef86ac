//! Results of allocation operations.
//!
//! Outcomes carry everything a caller needs for notifications: which team
//! moved, by how many seats, and where it stands afterwards.

use crate::model::{TeamId, TeamName};

/// Result of an admission request (new team or net-positive resize).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admission {
    pub team: TeamName,
    pub id: TeamId,
    /// Seats granted by this request.
    pub admitted: u32,
    /// Seats of this request routed to the waitlist.
    pub waitlisted: u32,
    /// Registered seats of the team after the request.
    pub registered: u32,
    /// Pending seats of the team after the request.
    pub pending: u32,
    /// 1-based waitlist position, if the team is queued.
    pub position: Option<usize>,
    /// Queued teams moved into seats left free by a forced waitlist entry,
    /// applied before this request was placed.
    pub promoted: Vec<Promotion>,
}

impl Admission {
    /// True if the request was split between registry and waitlist.
    #[inline]
    pub fn is_partial(&self) -> bool {
        self.admitted > 0 && self.waitlisted > 0
    }

    /// True if every requested seat was granted.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.waitlisted == 0
    }
}

/// Seats moved from the waitlist head into the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Promotion {
    pub team: TeamName,
    pub id: TeamId,
    /// Seats moved by this promotion.
    pub moved: u32,
    /// Seats still pending afterwards (0 = entry left the waitlist).
    pub remaining: u32,
    /// Registered seats of the team afterwards.
    pub registered: u32,
}

impl Promotion {
    /// True if the entry was promoted entirely.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Result of removing a team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal {
    pub team: TeamName,
    pub id: TeamId,
    /// Registered seats released (these free capacity).
    pub freed_registered: u32,
    /// Pending seats dropped from the waitlist (no capacity effect).
    pub dropped_pending: u32,
    /// Promotions triggered by the released seats.
    pub promotions: Vec<Promotion>,
}

impl Removal {
    /// Combined seats the team held in both structures.
    #[inline]
    pub fn total(&self) -> u32 {
        self.freed_registered + self.dropped_pending
    }
}

/// Result of resizing a team to an absolute size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resize {
    /// Target equals the current size.
    Unchanged { team: TeamName, size: u32 },

    /// Net-positive change of a registered team, handled as an admission.
    Grown(Admission),

    /// Net-negative change of a registered team.
    ///
    /// Pending seats are trimmed first; only the rest releases capacity.
    Shrunk {
        team: TeamName,
        /// Registered seats released.
        released: u32,
        /// Pending seats dropped.
        trimmed: u32,
        registered: u32,
        pending: u32,
        promotions: Vec<Promotion>,
    },

    /// Pending size of a waitlist-only team changed; capacity untouched.
    Requeued { team: TeamName, from: u32, to: u32 },

    /// Target size 0.
    Removed(Removal),
}

impl Resize {
    /// Net change of registered seats: positive when seats were consumed,
    /// negative when seats were freed. Promotions of other teams are not included.
    pub fn seat_delta(&self) -> i64 {
        match self {
            Resize::Unchanged { .. } | Resize::Requeued { .. } => 0,
            Resize::Grown(a) => i64::from(a.admitted),
            Resize::Shrunk { released, .. } => -i64::from(*released),
            Resize::Removed(r) => -i64::from(r.freed_registered),
        }
    }

    /// Team the resize applied to.
    pub fn team(&self) -> &TeamName {
        match self {
            Resize::Unchanged { team, .. }
            | Resize::Shrunk { team, .. }
            | Resize::Requeued { team, .. } => team,
            Resize::Grown(a) => &a.team,
            Resize::Removed(r) => &r.team,
        }
    }

    /// Promotions triggered by the resize.
    pub fn promotions(&self) -> &[Promotion] {
        match self {
            Resize::Shrunk { promotions, .. } => promotions,
            Resize::Removed(r) => &r.promotions,
            Resize::Grown(a) => &a.promoted,
            _ => &[],
        }
    }
}

/// Read-only view of one team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    pub team: TeamName,
    pub id: TeamId,
    pub registered: u32,
    pub pending: u32,
    /// 1-based waitlist position.
    pub position: Option<usize>,
}

impl Standing {
    /// Registered plus pending seats.
    #[inline]
    pub fn total(&self) -> u32 {
        self.registered + self.pending
    }
}
