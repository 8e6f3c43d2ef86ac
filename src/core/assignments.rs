//! # Requester ↔ team assignments.
//!
//! Maps an external requester identity (a chat user, an account id) to the one
//! team it acts for. The allocation engine never reads this map; the registrar
//! consults it for requester-facing operations and cleans it up when a team
//! disappears.
//!
//! ## Rules
//! - A requester is assigned to at most one team
//! - Several requesters may share a team
//! - Removing a team releases every requester assigned to it

use std::collections::BTreeMap;

use crate::model::TeamName;

/// Requester assignments of one event, ordered by requester id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignments {
    by_requester: BTreeMap<String, TeamName>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Team the requester is assigned to.
    pub fn team_of(&self, requester: &str) -> Option<&TeamName> {
        self.by_requester.get(requester)
    }

    /// Assigns a requester to a team, replacing any earlier assignment.
    pub fn assign(&mut self, requester: &str, team: TeamName) {
        self.by_requester.insert(requester.to_string(), team);
    }

    /// Drops a requester's assignment.
    pub fn release(&mut self, requester: &str) -> Option<TeamName> {
        self.by_requester.remove(requester)
    }

    /// Drops every assignment to `team` and returns the released requesters.
    pub fn release_team(&mut self, team: &TeamName) -> Vec<String> {
        let released: Vec<String> = self
            .requesters_of(team)
            .map(str::to_string)
            .collect();
        for requester in &released {
            self.by_requester.remove(requester);
        }
        released
    }

    /// Requesters assigned to `team`, in id order.
    pub fn requesters_of<'a>(&'a self, team: &'a TeamName) -> impl Iterator<Item = &'a str> + 'a {
        self.by_requester
            .iter()
            .filter(move |(_, t)| t.matches(team))
            .map(|(r, _)| r.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TeamName)> {
        self.by_requester.iter().map(|(r, t)| (r.as_str(), t))
    }

    /// Rows for persistence (`requester → team display name`).
    pub(crate) fn to_rows(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.by_requester
            .iter()
            .map(|(r, t)| (r.clone(), t.to_string()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_requester.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_requester.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(s: &str) -> TeamName {
        TeamName::parse(s).unwrap()
    }

    #[test]
    fn test_release_team_drops_all_members() {
        let mut a = Assignments::new();
        a.assign("u1", team("Alpha"));
        a.assign("u2", team("alpha"));
        a.assign("u3", team("Beta"));

        let released = a.release_team(&team("ALPHA"));
        assert_eq!(released, ["u1", "u2"]);
        assert_eq!(a.len(), 1);
        assert_eq!(a.team_of("u3"), Some(&team("Beta")));
    }

    #[test]
    fn test_assign_replaces() {
        let mut a = Assignments::new();
        a.assign("u1", team("Alpha"));
        a.assign("u1", team("Beta"));
        assert_eq!(a.team_of("u1").map(TeamName::as_str), Some("Beta"));
        assert_eq!(a.release("u1"), Some(team("beta")));
        assert!(a.is_empty());
    }
}
