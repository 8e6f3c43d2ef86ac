//! Lifecycle operations: capacity expansion, close/open and limit changes.
//!
//! ```text
//!            close()                     open()
//!  accepting ───────► not accepting ─────────────► accepting + promote(free)
//!
//!  expand_capacity(n > capacity) ─► capacity = n, promote(n - old)
//!  clamp_capacity()              ─► capacity = used (hard close)
//! ```

use tracing::info;

use crate::error::AllocError;

use super::allocator::Allocator;
use super::outcome::Promotion;

impl Allocator {
    /// Raises capacity and promotes into the added seats.
    ///
    /// Fails with [`AllocError::InvalidCapacity`] unless `new_capacity > capacity`.
    pub fn expand_capacity(&mut self, new_capacity: u32) -> Result<Vec<Promotion>, AllocError> {
        if new_capacity <= self.capacity {
            return Err(AllocError::InvalidCapacity {
                current: self.capacity,
                requested: new_capacity,
            });
        }
        let added = new_capacity - self.capacity;
        self.capacity = new_capacity;
        info!(capacity = new_capacity, added, "capacity expanded");

        let promotions = self.promote(added);
        self.debug_verify();
        Ok(promotions)
    }

    /// Stops accepting new teams. Capacity and existing teams are untouched.
    pub fn close(&mut self) -> Result<(), AllocError> {
        if !self.accepting {
            return Err(AllocError::AlreadyInState { state: "closed" });
        }
        self.accepting = false;
        info!(used = self.used, capacity = self.capacity, "registrations closed");
        Ok(())
    }

    /// Accepts new teams again and promotes into any free capacity.
    pub fn open(&mut self) -> Result<Vec<Promotion>, AllocError> {
        if self.accepting {
            return Err(AllocError::AlreadyInState { state: "open" });
        }
        self.accepting = true;
        info!(used = self.used, capacity = self.capacity, "registrations opened");

        let promotions = self.promote(self.available());
        self.debug_verify();
        Ok(promotions)
    }

    /// Shrinks capacity to the seats in use and returns how many were withdrawn.
    ///
    /// The accepting flag is left as is; later requests queue until capacity grows.
    pub fn clamp_capacity(&mut self) -> u32 {
        let withdrawn = self.available();
        self.capacity = self.used;
        info!(capacity = self.capacity, withdrawn, "capacity clamped to usage");
        withdrawn
    }

    /// Sets the per-team ceiling and returns the previous one.
    ///
    /// Teams already above a lowered limit keep their size.
    pub fn set_max_team_size(&mut self, limit: u32) -> Result<u32, AllocError> {
        if limit == 0 {
            return Err(AllocError::invalid("team size limit must be positive"));
        }
        let previous = std::mem::replace(&mut self.max_team_size, limit);
        info!(previous, limit, "team size limit changed");
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocatorParts;
    use crate::model::{Registration, TeamId, TeamName, WaitlistEntry};

    #[test]
    fn test_expand_requires_growth() {
        let mut alloc = Allocator::new(60, 9);
        assert_eq!(
            alloc.expand_capacity(60).unwrap_err(),
            AllocError::InvalidCapacity {
                current: 60,
                requested: 60
            }
        );
        assert!(alloc.expand_capacity(10).is_err());
        assert!(alloc.expand_capacity(61).unwrap().is_empty());
        assert_eq!(alloc.capacity(), 61);
    }

    #[test]
    fn test_close_open_are_not_idempotent() {
        let mut alloc = Allocator::new(10, 9);
        assert_eq!(
            alloc.open().unwrap_err(),
            AllocError::AlreadyInState { state: "open" }
        );
        alloc.close().unwrap();
        assert!(!alloc.is_accepting());
        assert_eq!(
            alloc.close().unwrap_err(),
            AllocError::AlreadyInState { state: "closed" }
        );
        assert!(alloc.open().unwrap().is_empty());
        assert!(alloc.is_accepting());
    }

    #[test]
    fn test_open_promotes_into_free_capacity() {
        let alpha = TeamName::parse("Alpha").unwrap();
        let bravo = TeamName::parse("Bravo").unwrap();
        // seats freed by a restored snapshot while closed
        let mut alloc = Allocator::from_parts(AllocatorParts {
            capacity: 12,
            used_seats: 8,
            max_team_size: 9,
            accepting: false,
            teams: vec![Registration {
                id: TeamId::derive(&alpha),
                name: alpha,
                size: 8,
            }],
            waitlist: vec![WaitlistEntry {
                id: TeamId::derive(&bravo),
                name: bravo,
                pending: 6,
            }],
        })
        .unwrap();

        let promotions = alloc.open().unwrap();
        assert_eq!(promotions.len(), 1);
        assert_eq!((promotions[0].moved, promotions[0].remaining), (4, 2));
        assert_eq!(alloc.used_seats(), 12);
    }

    #[test]
    fn test_clamp_capacity_queues_later_requests() {
        let mut alloc = Allocator::new(30, 9);
        alloc.admit("Alpha", 8).unwrap();

        assert_eq!(alloc.clamp_capacity(), 22);
        assert_eq!(alloc.capacity(), 8);
        assert!(alloc.is_accepting());
        assert_eq!(alloc.clamp_capacity(), 0);

        let a = alloc.admit("Bravo", 4).unwrap();
        assert_eq!((a.admitted, a.waitlisted), (0, 4));
    }

    #[test]
    fn test_set_max_team_size() {
        let mut alloc = Allocator::new(30, 9);
        alloc.admit("Alpha", 9).unwrap();

        assert_eq!(alloc.set_max_team_size(0).unwrap_err().as_label(), "invalid_input");
        assert_eq!(alloc.set_max_team_size(4).unwrap(), 9);
        assert_eq!(alloc.standing("Alpha").unwrap().registered, 9);
        assert!(alloc.admit("Bravo", 5).is_err());
        assert_eq!(alloc.set_max_team_size(18).unwrap(), 4);
        assert!(alloc.resize("Alpha", 18).is_ok());
    }
}
