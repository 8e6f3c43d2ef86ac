//! # Team registry - admitted teams keyed by case-insensitive name.
//!
//! Keeps registrations in insertion order so that snapshots and rosters are
//! stable across save/load. Lookups are linear; an event holds tens of teams.
//!
//! ## Rules
//! - A registration never has size 0; shrinking to zero drops it
//! - Callers compute deltas; the registry never clamps

use crate::error::AllocError;
use crate::model::{Registration, TeamId, TeamName};

/// Admitted teams of one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamRegistry {
    teams: Vec<Registration>,
}

impl TeamRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from stored rows (order preserved, not validated).
    pub(crate) fn from_rows(teams: Vec<Registration>) -> Self {
        Self { teams }
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &TeamName) -> Option<&Registration> {
        self.teams.iter().find(|r| r.name.matches(name))
    }

    /// Registered seats of a team (0 if absent).
    pub fn size_of(&self, name: &TeamName) -> u32 {
        self.find(name).map_or(0, |r| r.size)
    }

    /// Adds `seats` to a team, creating it with `id` if absent. Returns the new size.
    pub fn grow(&mut self, name: &TeamName, id: TeamId, seats: u32) -> u32 {
        if let Some(reg) = self.teams.iter_mut().find(|r| r.name.matches(name)) {
            reg.size += seats;
            return reg.size;
        }
        self.teams.push(Registration {
            name: name.clone(),
            id,
            size: seats,
        });
        seats
    }

    /// Removes `seats` from a team and returns the new size.
    ///
    /// The registration is dropped when it reaches zero.
    /// `seats` must not exceed the current size.
    pub fn shrink(&mut self, name: &TeamName, seats: u32) -> u32 {
        let Some(idx) = self.index_of(name) else {
            debug_assert_eq!(seats, 0, "shrinking an absent team");
            return 0;
        };
        let reg = &mut self.teams[idx];
        debug_assert!(seats <= reg.size, "shrink below zero");
        reg.size = reg.size.saturating_sub(seats);
        let left = reg.size;
        if left == 0 {
            self.teams.remove(idx);
        }
        left
    }

    /// Removes a team and returns its registration.
    ///
    /// Fails with [`AllocError::NotFound`] if absent.
    pub fn remove(&mut self, name: &TeamName) -> Result<Registration, AllocError> {
        self.take(name).ok_or_else(|| AllocError::NotFound {
            team: name.to_string(),
        })
    }

    /// Removes a team if present.
    pub(crate) fn take(&mut self, name: &TeamName) -> Option<Registration> {
        let idx = self.index_of(name)?;
        Some(self.teams.remove(idx))
    }

    /// Sum of all registered sizes.
    pub fn total(&self) -> u64 {
        self.teams.iter().map(|r| u64::from(r.size)).sum()
    }

    /// Registrations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.teams.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    fn index_of(&self, name: &TeamName) -> Option<usize> {
        self.teams.iter().position(|r| r.name.matches(name))
    }
}
