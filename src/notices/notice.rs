//! # Notices emitted by the registrar after each committed operation.
//!
//! The [`NoticeKind`] enum classifies notices across four groups:
//! - **Team notices**: a team's seats changed (admitted, waitlisted, promoted, resized, removed)
//! - **Event notices**: capacity and lifecycle changes of the event itself
//! - **Gateway notices**: identity assignments and snapshot writes
//! - **Subscriber notices**: delivery problems inside the fan-out
//!
//! The [`Notice`] struct carries the payload: team name, seat counts, capacity,
//! requester and a reason string, set depending on the kind.
//!
//! ## Ordering guarantees
//! Each notice has a globally unique sequence number (`seq`) that increases monotonically.
//! Notices of one operation are published in the order the engine produced them,
//! e.g. `TeamRemoved` before the `TeamPromoted` notices it caused.
//!
//! ## Example
//! ```rust
//! use seatvisor::{Notice, NoticeKind};
//!
//! let n = Notice::new(NoticeKind::TeamPromoted)
//!     .with_team("Beta")
//!     .with_seats(5)
//!     .with_pending(0);
//!
//! assert_eq!(n.kind, NoticeKind::TeamPromoted);
//! assert_eq!(n.team.as_deref(), Some("Beta"));
//! assert_eq!(n.seats, Some(5));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for notice ordering.
static NOTICE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    // === Team notices ===
    /// Seats were granted to a team by an admission request.
    ///
    /// Sets:
    /// - `team`: team name
    /// - `seats`: seats granted by this request
    /// - `pending`: team's pending seats afterwards
    /// - `used`, `capacity`
    TeamAdmitted,

    /// Seats of a request were queued.
    ///
    /// Sets:
    /// - `team`: team name
    /// - `seats`: seats queued by this request
    /// - `pending`: team's pending seats afterwards
    /// - `position`: 1-based queue position
    TeamWaitlisted,

    /// Seats moved from the waitlist head into the registry.
    ///
    /// Sets:
    /// - `team`: team name
    /// - `seats`: seats moved
    /// - `pending`: seats still pending (0 = left the waitlist)
    /// - `used`, `capacity`
    TeamPromoted,

    /// A team was resized without being removed.
    ///
    /// Sets:
    /// - `team`: team name
    /// - `seats`: team's total size afterwards
    /// - `pending`: team's pending seats afterwards
    /// - `reason`: `grown`, `shrunk` or `requeued`
    TeamResized,

    /// A team left both registry and waitlist.
    ///
    /// Sets:
    /// - `team`: team name
    /// - `seats`: registered seats freed
    /// - `pending`: pending seats dropped
    /// - `requester`: requester that withdrew, if any
    TeamRemoved,

    // === Event notices ===
    /// Capacity grew.
    ///
    /// Sets:
    /// - `capacity`: new capacity
    /// - `seats`: seats added
    CapacityExpanded,

    /// Capacity was clamped to the seats in use.
    ///
    /// Sets:
    /// - `capacity`: new capacity
    /// - `seats`: seats withdrawn
    CapacityClamped,

    /// The event stopped accepting new teams.
    RegistrationClosed,

    /// The event accepts new teams again.
    RegistrationOpened,

    /// The per-team size limit changed.
    ///
    /// Sets:
    /// - `seats`: new limit
    TeamSizeLimitChanged,

    /// An event was created.
    ///
    /// Sets:
    /// - `reason`: event title
    /// - `capacity`
    EventCreated,

    /// The event was deleted by an operator.
    ///
    /// Sets:
    /// - `reason`: event title
    EventDeleted,

    /// The event passed its expiry and was deleted by the sweeper.
    ///
    /// Sets:
    /// - `reason`: event title
    EventExpired,

    // === Gateway notices ===
    /// A requester's team assignment was dropped.
    ///
    /// Sets:
    /// - `requester`: requester id
    /// - `team`: team the requester was assigned to
    AssignmentReleased,

    /// Writing a snapshot failed; the in-memory state is still committed.
    ///
    /// Sets:
    /// - `revision`: revision that was not written
    /// - `reason`: error message
    SnapshotFailed,

    // === Subscriber notices ===
    /// Subscriber panicked while handling a notice.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped a notice (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: `full` or `closed`
    SubscriberOverflow,
}

impl NoticeKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            NoticeKind::TeamAdmitted => "team_admitted",
            NoticeKind::TeamWaitlisted => "team_waitlisted",
            NoticeKind::TeamPromoted => "team_promoted",
            NoticeKind::TeamResized => "team_resized",
            NoticeKind::TeamRemoved => "team_removed",
            NoticeKind::CapacityExpanded => "capacity_expanded",
            NoticeKind::CapacityClamped => "capacity_clamped",
            NoticeKind::RegistrationClosed => "registration_closed",
            NoticeKind::RegistrationOpened => "registration_opened",
            NoticeKind::TeamSizeLimitChanged => "team_size_limit_changed",
            NoticeKind::EventCreated => "event_created",
            NoticeKind::EventDeleted => "event_deleted",
            NoticeKind::EventExpired => "event_expired",
            NoticeKind::AssignmentReleased => "assignment_released",
            NoticeKind::SnapshotFailed => "snapshot_failed",
            NoticeKind::SubscriberPanicked => "subscriber_panicked",
            NoticeKind::SubscriberOverflow => "subscriber_overflow",
        }
    }
}

/// Notice with optional payload.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`NoticeKind`]
#[derive(Clone, Debug)]
pub struct Notice {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Notice classification.
    pub kind: NoticeKind,

    /// Team display name.
    pub team: Option<Arc<str>>,
    /// Seat count; meaning depends on the kind.
    pub seats: Option<u32>,
    /// Pending seats of the team afterwards.
    pub pending: Option<u32>,
    /// 1-based waitlist position.
    pub position: Option<u32>,
    /// Used seats after the operation.
    pub used: Option<u32>,
    /// Capacity after the operation.
    pub capacity: Option<u32>,
    /// External requester identity.
    pub requester: Option<Arc<str>>,
    /// Snapshot revision.
    pub revision: Option<u64>,
    /// Name of the subscriber (subscriber notices only).
    pub subscriber: Option<&'static str>,
    /// Human-readable detail.
    pub reason: Option<Arc<str>>,
}

impl Notice {
    /// Creates a notice of the given kind with current timestamp and next sequence number.
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            seq: NOTICE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            team: None,
            seats: None,
            pending: None,
            position: None,
            used: None,
            capacity: None,
            requester: None,
            revision: None,
            subscriber: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_team(mut self, team: impl Into<Arc<str>>) -> Self {
        self.team = Some(team.into());
        self
    }

    #[inline]
    pub fn with_seats(mut self, seats: u32) -> Self {
        self.seats = Some(seats);
        self
    }

    #[inline]
    pub fn with_pending(mut self, pending: u32) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Attaches a waitlist position (`None` leaves the field unset).
    #[inline]
    pub fn with_position(mut self, position: Option<usize>) -> Self {
        self.position = position.map(|p| u32::try_from(p).unwrap_or(u32::MAX));
        self
    }

    /// Attaches the seat counters of the event.
    #[inline]
    pub fn with_usage(mut self, used: u32, capacity: u32) -> Self {
        self.used = Some(used);
        self.capacity = Some(capacity);
        self
    }

    #[inline]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    #[inline]
    pub fn with_requester(mut self, requester: impl Into<Arc<str>>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    #[inline]
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow notice.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut n = Notice::new(NoticeKind::SubscriberOverflow).with_reason(reason);
        n.subscriber = Some(subscriber);
        n
    }

    /// Creates a subscriber panic notice.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut n = Notice::new(NoticeKind::SubscriberPanicked).with_reason(info);
        n.subscriber = Some(subscriber);
        n
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, NoticeKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, NoticeKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Notice::new(NoticeKind::TeamAdmitted);
        let b = Notice::new(NoticeKind::TeamAdmitted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_subscriber_constructors() {
        let n = Notice::subscriber_overflow("log", "full");
        assert!(n.is_subscriber_overflow());
        assert_eq!(n.subscriber, Some("log"));
        assert_eq!(n.reason.as_deref(), Some("full"));

        let n = Notice::subscriber_panicked("log", "boom".into());
        assert!(n.is_subscriber_panic());
        assert_eq!(n.kind.as_label(), "subscriber_panicked");
    }
}
