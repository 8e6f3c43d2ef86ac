//! # Waitlist - FIFO of pending requests.
//!
//! Insertion order is promotion order: the head is the oldest request and is
//! promoted first. Requests from a team that is already queued merge into its
//! existing entry and keep its position.
//!
//! ## Rules
//! - At most one entry per team (case-insensitive)
//! - An entry never has `pending == 0`; merging or setting to zero removes it
//! - Entries are never reordered; only the head is consumed by promotion

use std::collections::VecDeque;

use crate::model::{TeamId, TeamName, WaitlistEntry};

/// Ordered pending requests of one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Waitlist {
    queue: VecDeque<WaitlistEntry>,
}

impl Waitlist {
    /// Creates an empty waitlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a waitlist from stored rows (order preserved, not validated).
    pub(crate) fn from_rows(rows: Vec<WaitlistEntry>) -> Self {
        Self {
            queue: rows.into(),
        }
    }

    /// Finds a team's entry and its 0-based index.
    pub fn find(&self, name: &TeamName) -> Option<(usize, &WaitlistEntry)> {
        self.queue
            .iter()
            .enumerate()
            .find(|(_, e)| e.name.matches(name))
    }

    /// Pending seats of a team (0 if not queued).
    pub fn pending_of(&self, name: &TeamName) -> u32 {
        self.find(name).map_or(0, |(_, e)| e.pending)
    }

    /// 1-based queue position of a team.
    pub fn position(&self, name: &TeamName) -> Option<usize> {
        self.find(name).map(|(idx, _)| idx + 1)
    }

    /// Appends a new entry at the tail (lowest promotion priority).
    pub fn append(&mut self, name: &TeamName, id: TeamId, pending: u32) {
        debug_assert!(self.find(name).is_none(), "duplicate waitlist entry");
        if pending > 0 {
            self.queue.push_back(WaitlistEntry {
                name: name.clone(),
                id,
                pending,
            });
        }
    }

    /// Adds `delta` to a team's pending seats and returns the new value.
    ///
    /// - Existing entry: adjusted in place; removed if the result is `<= 0`.
    /// - No entry and `delta > 0`: appended at the tail with `id`.
    pub fn merge_into(&mut self, name: &TeamName, id: TeamId, delta: i64) -> u32 {
        match self.queue.iter().position(|e| e.name.matches(name)) {
            Some(idx) => {
                let next = i64::from(self.queue[idx].pending) + delta;
                if next <= 0 {
                    self.queue.remove(idx);
                    0
                } else {
                    let next = u32::try_from(next).unwrap_or(u32::MAX);
                    self.queue[idx].pending = next;
                    next
                }
            }
            None if delta > 0 => {
                let pending = u32::try_from(delta).unwrap_or(u32::MAX);
                self.append(name, id, pending);
                pending
            }
            None => 0,
        }
    }

    /// Sets a queued team's pending seats in place. Returns the previous value.
    ///
    /// Setting zero removes the entry. Returns `None` if the team is not queued.
    pub fn set_pending(&mut self, name: &TeamName, pending: u32) -> Option<u32> {
        let idx = self.queue.iter().position(|e| e.name.matches(name))?;
        let prev = self.queue[idx].pending;
        if pending == 0 {
            self.queue.remove(idx);
        } else {
            self.queue[idx].pending = pending;
        }
        Some(prev)
    }

    /// Oldest entry.
    pub fn front(&self) -> Option<&WaitlistEntry> {
        self.queue.front()
    }

    /// Removes and returns the oldest entry.
    pub fn pop_front(&mut self) -> Option<WaitlistEntry> {
        self.queue.pop_front()
    }

    /// Replaces the head's pending seats without changing its position.
    pub fn set_front(&mut self, pending: u32) {
        debug_assert!(pending > 0, "set_front to zero; use pop_front");
        if let Some(head) = self.queue.front_mut() {
            head.pending = pending;
        }
    }

    /// Removes a team's entry, wherever it is.
    pub fn remove(&mut self, name: &TeamName) -> Option<WaitlistEntry> {
        let idx = self.queue.iter().position(|e| e.name.matches(name))?;
        self.queue.remove(idx)
    }

    /// Sum of all pending seats.
    pub fn total_pending(&self) -> u64 {
        self.queue.iter().map(|e| u64::from(e.pending)).sum()
    }

    /// Entries in promotion order.
    pub fn iter(&self) -> impl Iterator<Item = &WaitlistEntry> {
        self.queue.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> TeamName {
        TeamName::parse(s).unwrap()
    }

    fn merge(wl: &mut Waitlist, s: &str, delta: i64) -> u32 {
        let n = name(s);
        let id = TeamId::derive(&n);
        wl.merge_into(&n, id, delta)
    }

    fn order(wl: &Waitlist) -> Vec<(&str, u32)> {
        wl.iter().map(|e| (e.name.as_str(), e.pending)).collect()
    }

    #[test]
    fn test_merge_keeps_position() {
        let mut wl = Waitlist::new();
        merge(&mut wl, "Gamma", 10);
        merge(&mut wl, "Delta", 15);
        assert_eq!(merge(&mut wl, "gamma", 2), 12);
        assert_eq!(order(&wl), [("Gamma", 12), ("Delta", 15)]);
        assert_eq!(wl.position(&name("DELTA")), Some(2));
    }

    #[test]
    fn test_merge_to_zero_removes() {
        let mut wl = Waitlist::new();
        merge(&mut wl, "Gamma", 3);
        assert_eq!(merge(&mut wl, "Gamma", -5), 0);
        assert!(wl.is_empty());
        assert_eq!(merge(&mut wl, "Gamma", -1), 0);
        assert!(wl.is_empty());
    }

    #[test]
    fn test_set_front_and_pop_front() {
        let mut wl = Waitlist::new();
        merge(&mut wl, "Gamma", 10);
        merge(&mut wl, "Delta", 15);
        wl.set_front(4);
        assert_eq!(wl.front().unwrap().pending, 4);
        let head = wl.pop_front().unwrap();
        assert_eq!(head.name.as_str(), "Gamma");
        assert_eq!(order(&wl), [("Delta", 15)]);
    }

    #[test]
    fn test_set_pending_and_remove() {
        let mut wl = Waitlist::new();
        merge(&mut wl, "Gamma", 10);
        merge(&mut wl, "Delta", 15);
        merge(&mut wl, "Echo", 7);
        assert_eq!(wl.set_pending(&name("delta"), 5), Some(15));
        assert_eq!(order(&wl), [("Gamma", 10), ("Delta", 5), ("Echo", 7)]);
        assert_eq!(wl.set_pending(&name("Zulu"), 5), None);
        assert_eq!(wl.remove(&name("Delta")).unwrap().pending, 5);
        assert_eq!(wl.total_pending(), 17);
        assert_eq!(wl.set_pending(&name("gamma"), 0), Some(10));
        assert_eq!(order(&wl), [("Echo", 7)]);
    }
}
