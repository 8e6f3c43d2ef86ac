//! Read-only queries over an event: search and roster export.

use crate::allocation::Allocator;
use crate::error::AllocError;
use crate::model::{TeamId, TeamName};

use super::assignments::Assignments;

/// One match of [`Registrar::search`](crate::Registrar::search).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchHit {
    Registered {
        team: TeamName,
        id: TeamId,
        size: u32,
    },
    Waitlisted {
        team: TeamName,
        id: TeamId,
        pending: u32,
        /// 1-based queue position.
        position: usize,
    },
    Requester {
        requester: String,
        team: TeamName,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterStatus {
    Registered,
    Waitlisted,
}

/// One export row. A partially admitted team yields one row per status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterRow {
    pub team: TeamName,
    pub id: TeamId,
    pub seats: u32,
    pub status: RosterStatus,
    /// First assigned requester (by id order).
    pub requester: Option<String>,
}

/// Case-insensitive substring search over team names, team ids and requester ids.
pub(super) fn search(
    alloc: &Allocator,
    assignments: &Assignments,
    term: &str,
) -> Result<Vec<SearchHit>, AllocError> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AllocError::invalid("search term must not be empty"));
    }
    let hit = |name: &TeamName, id: &TeamId| {
        name.key().contains(&needle) || id.as_str().contains(&needle)
    };

    let mut hits = Vec::new();
    for reg in alloc.registry().iter().filter(|r| hit(&r.name, &r.id)) {
        hits.push(SearchHit::Registered {
            team: reg.name.clone(),
            id: reg.id.clone(),
            size: reg.size,
        });
    }
    for (idx, entry) in alloc.waitlist().iter().enumerate() {
        if hit(&entry.name, &entry.id) {
            hits.push(SearchHit::Waitlisted {
                team: entry.name.clone(),
                id: entry.id.clone(),
                pending: entry.pending,
                position: idx + 1,
            });
        }
    }
    for (requester, team) in assignments.iter() {
        if requester.to_lowercase().contains(&needle) {
            hits.push(SearchHit::Requester {
                requester: requester.to_string(),
                team: team.clone(),
            });
        }
    }
    Ok(hits)
}

/// Registered teams in registry order, then queued teams in promotion order.
pub(super) fn roster(alloc: &Allocator, assignments: &Assignments) -> Vec<RosterRow> {
    let requester = |team: &TeamName| assignments.requesters_of(team).next().map(str::to_string);

    let registered = alloc.registry().iter().map(|r| RosterRow {
        team: r.name.clone(),
        id: r.id.clone(),
        seats: r.size,
        status: RosterStatus::Registered,
        requester: requester(&r.name),
    });
    let queued = alloc.waitlist().iter().map(|e| RosterRow {
        team: e.name.clone(),
        id: e.id.clone(),
        seats: e.pending,
        status: RosterStatus::Waitlisted,
        requester: requester(&e.name),
    });
    registered.chain(queued).collect()
}
