//! # Allocator - the capacity and waitlist state machine.
//!
//! Owns the capacity counter, the [`TeamRegistry`] and the [`Waitlist`] of one
//! event and decides, for every size change, how many seats are granted now and
//! how many are queued.
//!
//! ## Admission
//! ```text
//! admit(team, n)
//!   ├─► validate (name, n > 0, accepting, max_team_size)   → Err, no change
//!   ├─► promote(available)                                   (queue drains first)
//!   ├─► available = capacity - used
//!   ├─ available >= n : registry += n                        (full)
//!   ├─ 0 < available < n : registry += available,
//!   │                      waitlist.merge(n - available)     (partial)
//!   └─ available == 0 : waitlist.merge(n)                   (queued)
//! ```
//!
//! ## Promotion
//! ```text
//! promote(freed)
//!   while freed > 0 && waitlist not empty:
//!     head = (team, pending)
//!     moved = min(pending, freed)
//!     registry[team] += moved; used += moved; freed -= moved
//!     moved == pending ─► pop head, continue
//!     moved <  pending ─► head.pending -= moved, stop
//! ```
//!
//! ## Rules
//! - `used_seats <= capacity` after every operation
//! - Every operation validates fully before it mutates; errors leave state untouched
//! - A team sits in both structures only after a partial admission or partial promotion
//! - Waitlist order is never changed; only the head is promoted

use tracing::debug;

use crate::error::AllocError;
use crate::ledger::{TeamRegistry, Waitlist};
use crate::model::{Registration, TeamId, TeamName, WaitlistEntry};

use super::outcome::{Admission, Promotion, Removal, Resize, Standing};
use super::policy::{Placement, SizeLimit};

/// Capacity-bounded seat allocation for one event.
///
/// All methods are synchronous and never block; callers serialize access
/// (see [`Registrar`](crate::Registrar)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocator {
    pub(super) capacity: u32,
    pub(super) used: u32,
    pub(super) max_team_size: u32,
    pub(super) accepting: bool,
    pub(super) registry: TeamRegistry,
    pub(super) waitlist: Waitlist,
}

/// Raw allocator state, as persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorParts {
    pub capacity: u32,
    pub used_seats: u32,
    pub max_team_size: u32,
    pub accepting: bool,
    pub teams: Vec<Registration>,
    pub waitlist: Vec<WaitlistEntry>,
}

impl Allocator {
    /// Creates an empty, accepting allocator.
    pub fn new(capacity: u32, max_team_size: u32) -> Self {
        Self {
            capacity,
            used: 0,
            max_team_size,
            accepting: true,
            registry: TeamRegistry::new(),
            waitlist: Waitlist::new(),
        }
    }

    /// Rebuilds an allocator from persisted parts.
    ///
    /// Fails with [`AllocError::InvalidInput`] if the parts describe a state no
    /// sequence of operations could have produced.
    pub fn from_parts(parts: AllocatorParts) -> Result<Self, AllocError> {
        let alloc = Self {
            capacity: parts.capacity,
            used: parts.used_seats,
            max_team_size: parts.max_team_size,
            accepting: parts.accepting,
            registry: TeamRegistry::from_rows(parts.teams),
            waitlist: Waitlist::from_rows(parts.waitlist),
        };
        alloc.verify()?;
        Ok(alloc)
    }

    /// Copies the state out for persistence.
    pub fn to_parts(&self) -> AllocatorParts {
        AllocatorParts {
            capacity: self.capacity,
            used_seats: self.used,
            max_team_size: self.max_team_size,
            accepting: self.accepting,
            teams: self.registry.iter().cloned().collect(),
            waitlist: self.waitlist.iter().cloned().collect(),
        }
    }

    /// Checks every structural invariant of the state.
    pub fn verify(&self) -> Result<(), AllocError> {
        if self.registry.iter().any(|r| r.size == 0) {
            return Err(AllocError::invalid("registration with zero size"));
        }
        if self.waitlist.iter().any(|e| e.pending == 0) {
            return Err(AllocError::invalid("waitlist entry with zero pending seats"));
        }
        if let Some(dup) = first_duplicate(self.registry.iter().map(|r| &r.name)) {
            return Err(AllocError::invalid(format!("team '{dup}' registered twice")));
        }
        if let Some(dup) = first_duplicate(self.waitlist.iter().map(|e| &e.name)) {
            return Err(AllocError::invalid(format!("team '{dup}' waitlisted twice")));
        }
        if self.registry.total() != u64::from(self.used) {
            return Err(AllocError::invalid(format!(
                "used seats {} do not match registered total {}",
                self.used,
                self.registry.total()
            )));
        }
        if self.used > self.capacity {
            return Err(AllocError::invalid(format!(
                "used seats {} exceed capacity {}",
                self.used, self.capacity
            )));
        }
        Ok(())
    }

    /// Requests `requested` additional seats for a team.
    ///
    /// Creates the team if it does not exist yet (requires the event to accept
    /// new teams). `requested` is an increase, not an absolute size.
    pub fn admit(&mut self, team: &str, requested: u32) -> Result<Admission, AllocError> {
        let name = TeamName::parse(team)?;
        if requested == 0 {
            return Err(AllocError::invalid("requested seats must be positive"));
        }
        let current = self.footprint(&name);
        if current == 0 && !self.accepting {
            return Err(AllocError::RegistrationsClosed);
        }
        self.check_limit(current + u64::from(requested))?;

        let admission = self.place(&name, requested, Placement::Auto);
        self.debug_verify();
        Ok(admission)
    }

    /// Creates a new team of `size` seats.
    ///
    /// Unlike [`admit`](Self::admit), fails with [`AllocError::DuplicateName`] if
    /// the team already exists in either structure.
    pub fn register(
        &mut self,
        team: &str,
        size: u32,
        placement: Placement,
    ) -> Result<Admission, AllocError> {
        let name = TeamName::parse(team)?;
        if size == 0 {
            return Err(AllocError::invalid("team size must be positive"));
        }
        if self.footprint(&name) > 0 {
            return Err(AllocError::DuplicateName {
                team: name.to_string(),
            });
        }
        if !self.accepting {
            return Err(AllocError::RegistrationsClosed);
        }
        self.check_limit(u64::from(size))?;

        let admission = self.place(&name, size, placement);
        self.debug_verify();
        Ok(admission)
    }

    /// Resizes a team to an absolute size, enforcing `max_team_size`.
    pub fn resize(&mut self, team: &str, new_size: u32) -> Result<Resize, AllocError> {
        self.resize_with(team, new_size, SizeLimit::Enforce)
    }

    /// Resizes a team to an absolute size.
    ///
    /// The target is the team's whole footprint (registered + pending):
    /// - `0` removes the team;
    /// - growth of a registered team is admitted like a new request;
    /// - growth or shrink of a waitlist-only team only changes its pending seats;
    /// - shrink trims pending seats first, then releases registered seats and promotes.
    pub fn resize_with(
        &mut self,
        team: &str,
        new_size: u32,
        limit: SizeLimit,
    ) -> Result<Resize, AllocError> {
        let name = TeamName::parse(team)?;
        let registered = self.registry.size_of(&name);
        let pending = self.waitlist.pending_of(&name);
        if registered == 0 && pending == 0 {
            return Err(AllocError::NotFound {
                team: name.to_string(),
            });
        }
        if limit == SizeLimit::Enforce {
            self.check_limit(u64::from(new_size))?;
        }

        let (name, _) = self.canonical(&name);
        let current = u64::from(registered) + u64::from(pending);
        let target = u64::from(new_size);

        let outcome = if new_size == 0 {
            let removal = self.take_team(&name).ok_or_else(|| AllocError::NotFound {
                team: name.to_string(),
            })?;
            Resize::Removed(removal)
        } else if target == current {
            Resize::Unchanged {
                team: name,
                size: new_size,
            }
        } else if registered == 0 {
            self.waitlist.set_pending(&name, new_size);
            debug!(team = %name, from = pending, to = new_size, "waitlist entry resized");
            Resize::Requeued {
                team: name,
                from: pending,
                to: new_size,
            }
        } else if target > current {
            let grow = u32::try_from(target - current).unwrap_or(u32::MAX);
            Resize::Grown(self.place(&name, grow, Placement::Auto))
        } else {
            self.shrink(name, registered, pending, current - target)
        };

        self.debug_verify();
        Ok(outcome)
    }

    /// Removes a team from both structures and promotes into the freed seats.
    ///
    /// Fails with [`AllocError::NotFound`] only if the team is in neither.
    pub fn remove(&mut self, team: &str) -> Result<Removal, AllocError> {
        let name = TeamName::parse(team)?;
        let removal = self.take_team(&name).ok_or_else(|| AllocError::NotFound {
            team: name.to_string(),
        })?;
        self.debug_verify();
        Ok(removal)
    }

    /// Moves up to `freed` seats from the waitlist head into the registry.
    ///
    /// `freed` is clamped to the free capacity, so promotion can never push
    /// `used_seats` above `capacity`. `promote(0)` is a no-op.
    pub fn promote(&mut self, freed: u32) -> Vec<Promotion> {
        let mut budget = freed.min(self.available());
        let mut promoted = Vec::new();

        while budget > 0 {
            let Some(head) = self.waitlist.front() else {
                break;
            };
            let moved = head.pending.min(budget);
            let remaining = head.pending - moved;
            let (name, id) = (head.name.clone(), head.id.clone());

            let registered = self.registry.grow(&name, id.clone(), moved);
            self.used += moved;
            budget -= moved;
            if remaining == 0 {
                self.waitlist.pop_front();
            } else {
                self.waitlist.set_front(remaining);
            }

            debug!(team = %name, moved, remaining, used = self.used, "promoted from waitlist");
            promoted.push(Promotion {
                team: name,
                id,
                moved,
                remaining,
                registered,
            });
            if remaining > 0 {
                break;
            }
        }
        promoted
    }

    /// Read-only view of a team.
    pub fn standing(&self, team: &str) -> Result<Standing, AllocError> {
        let name = TeamName::parse(team)?;
        let registered = self.registry.size_of(&name);
        let pending = self.waitlist.pending_of(&name);
        if registered == 0 && pending == 0 {
            return Err(AllocError::NotFound {
                team: name.to_string(),
            });
        }
        let (team, id) = self.canonical(&name);
        Ok(Standing {
            team,
            id,
            registered,
            pending,
            position: self.waitlist.position(&name),
        })
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn used_seats(&self) -> u32 {
        self.used
    }

    /// Free seats (`capacity - used_seats`).
    #[inline]
    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.used)
    }

    #[inline]
    pub fn max_team_size(&self) -> u32 {
        self.max_team_size
    }

    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    #[inline]
    pub fn registry(&self) -> &TeamRegistry {
        &self.registry
    }

    #[inline]
    pub fn waitlist(&self) -> &Waitlist {
        &self.waitlist
    }

    /// Grants what capacity allows and queues the rest (or everything, for
    /// [`Placement::Waitlist`]). Caller has validated the request.
    fn place(&mut self, name: &TeamName, seats: u32, placement: Placement) -> Admission {
        let (name, id) = self.canonical(name);
        let (promoted, admitted) = match placement {
            Placement::Auto => {
                // Queued teams come first; afterwards the queue is empty or no seat is free.
                let promoted = self.promote(self.available());
                (promoted, seats.min(self.available()))
            }
            Placement::Waitlist => (Vec::new(), 0),
        };
        let waitlisted = seats - admitted;

        let registered = if admitted > 0 {
            self.used += admitted;
            self.registry.grow(&name, id.clone(), admitted)
        } else {
            self.registry.size_of(&name)
        };
        let pending = if waitlisted > 0 {
            self.waitlist
                .merge_into(&name, id.clone(), i64::from(waitlisted))
        } else {
            self.waitlist.pending_of(&name)
        };

        debug!(
            team = %name,
            admitted,
            waitlisted,
            used = self.used,
            capacity = self.capacity,
            "seats placed"
        );
        Admission {
            position: self.waitlist.position(&name),
            team: name,
            id,
            admitted,
            waitlisted,
            registered,
            pending,
            promoted,
        }
    }

    /// Reduces a registered team's footprint by `excess` seats.
    fn shrink(&mut self, name: TeamName, registered: u32, pending: u32, excess: u64) -> Resize {
        let trimmed = u32::try_from(excess.min(u64::from(pending))).unwrap_or(pending);
        if trimmed > 0 {
            self.waitlist.set_pending(&name, pending - trimmed);
        }
        let released = u32::try_from(excess - u64::from(trimmed)).unwrap_or(registered);
        let released = released.min(registered);

        let mut left = registered;
        let mut promotions = Vec::new();
        if released > 0 {
            left = self.registry.shrink(&name, released);
            self.used -= released;
            promotions = self.promote(released);
        }
        debug!(team = %name, released, trimmed, used = self.used, "team shrunk");
        Resize::Shrunk {
            team: name,
            released,
            trimmed,
            registered: left,
            pending: pending - trimmed,
            promotions,
        }
    }

    /// Drops a team from both structures. `None` if it is in neither.
    fn take_team(&mut self, name: &TeamName) -> Option<Removal> {
        let reg = self.registry.take(name);
        let entry = self.waitlist.remove(name);
        let (team, id) = match (&reg, &entry) {
            (Some(r), _) => (r.name.clone(), r.id.clone()),
            (None, Some(e)) => (e.name.clone(), e.id.clone()),
            (None, None) => return None,
        };

        let freed_registered = reg.map_or(0, |r| r.size);
        let dropped_pending = entry.map_or(0, |e| e.pending);
        self.used -= freed_registered;
        debug!(team = %team, freed_registered, dropped_pending, "team removed");

        let promotions = self.promote(freed_registered);
        Some(Removal {
            team,
            id,
            freed_registered,
            dropped_pending,
            promotions,
        })
    }

    /// Stored display name and id of a team, or derived ones for a new team.
    fn canonical(&self, name: &TeamName) -> (TeamName, TeamId) {
        if let Some(reg) = self.registry.find(name) {
            return (reg.name.clone(), reg.id.clone());
        }
        if let Some((_, entry)) = self.waitlist.find(name) {
            return (entry.name.clone(), entry.id.clone());
        }
        (name.clone(), TeamId::derive(name))
    }

    /// Registered plus pending seats of a team.
    fn footprint(&self, name: &TeamName) -> u64 {
        u64::from(self.registry.size_of(name)) + u64::from(self.waitlist.pending_of(name))
    }

    fn check_limit(&self, size: u64) -> Result<(), AllocError> {
        if size > u64::from(self.max_team_size) {
            return Err(AllocError::SizeLimitExceeded {
                requested: u32::try_from(size).unwrap_or(u32::MAX),
                limit: self.max_team_size,
            });
        }
        Ok(())
    }

    #[inline]
    pub(super) fn debug_verify(&self) {
        debug_assert!(self.verify().is_ok(), "allocator invariant broken: {self:?}");
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a TeamName>) -> Option<&'a TeamName> {
    let mut seen = std::collections::HashSet::new();
    names.into_iter().find(|n| !seen.insert(n.key()))
}
