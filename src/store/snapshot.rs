//! # Snapshot document.
//!
//! The serialized form of one registrar state. Written as JSON:
//!
//! ```text
//! {
//!   "revision": 7,
//!   "event": {
//!     "title": "Spring Cup", "description": "", "expires_at": 1767225600,
//!     "capacity": 96, "used_seats": 60, "max_team_size": 9, "accepting": true,
//!     "teams":    [ { "name": "Alpha", "id": "3a5e1c0f9b", "size": 9 }, ... ],
//!     "waitlist": [ { "name": "Beta",  "id": "0c2d11aa47", "pending": 5 }, ... ],
//!     "assignments": { "user-17": "Alpha" }
//!   }
//! }
//! ```
//!
//! ## Legacy input
//! Older files are migrated once, while decoding:
//! - `max_slots` / `slots_used` / `name` for `capacity` / `used_seats` / `title`
//! - `teams` as a map of `name → size` or `name → { "size": n, "id": "..." }`
//! - waitlist rows as `["name", size]` or `["name", size, "id"]`
//! - missing ids are derived from the team name
//!
//! ## Rules
//! - [`EventRecord::restore`] rejects any record the engine could not have produced
//!   (zero sizes, duplicate teams, `used_seats != Σ sizes`, `used_seats > capacity`)

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::allocation::{Allocator, AllocatorParts};
use crate::error::StoreError;
use crate::model::{EventInfo, Registration, TeamId, TeamName, WaitlistEntry};

/// Versioned registrar state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Commit counter of the registrar; higher is newer.
    #[serde(default)]
    pub revision: u64,
    /// Active event, if any.
    #[serde(default)]
    pub event: Option<EventRecord>,
}

/// One persisted event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Expiry as unix seconds.
    #[serde(default)]
    pub expires_at: Option<u64>,
    #[serde(alias = "max_slots")]
    pub capacity: u32,
    #[serde(alias = "slots_used")]
    pub used_seats: u32,
    pub max_team_size: u32,
    #[serde(default = "accepting_default")]
    pub accepting: bool,
    #[serde(deserialize_with = "teams_any")]
    pub teams: Vec<TeamRow>,
    #[serde(default, deserialize_with = "waitlist_any")]
    pub waitlist: Vec<WaitlistRow>,
    /// Requester id → team name.
    #[serde(default, alias = "user_team_assignments")]
    pub assignments: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRow {
    pub name: String,
    #[serde(default)]
    pub id: String,
    pub size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistRow {
    pub name: String,
    #[serde(default)]
    pub id: String,
    pub pending: u32,
}

/// Decoded and validated event state.
#[derive(Debug)]
pub(crate) struct Restored {
    pub info: EventInfo,
    pub alloc: Allocator,
    pub assignments: BTreeMap<String, String>,
}

impl EventRecord {
    /// Captures the current event state.
    pub fn capture(
        info: &EventInfo,
        alloc: &Allocator,
        assignments: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let parts = alloc.to_parts();
        Self {
            title: info.title.clone(),
            description: info.description.clone(),
            expires_at: info.expires_at.map(unix_secs),
            capacity: parts.capacity,
            used_seats: parts.used_seats,
            max_team_size: parts.max_team_size,
            accepting: parts.accepting,
            teams: parts
                .teams
                .into_iter()
                .map(|r| TeamRow {
                    name: r.name.to_string(),
                    id: r.id.to_string(),
                    size: r.size,
                })
                .collect(),
            waitlist: parts
                .waitlist
                .into_iter()
                .map(|e| WaitlistRow {
                    name: e.name.to_string(),
                    id: e.id.to_string(),
                    pending: e.pending,
                })
                .collect(),
            assignments: assignments.into_iter().collect(),
        }
    }

    /// Rebuilds the event state, failing with [`StoreError::Corrupt`] on invalid records.
    pub(crate) fn restore(self) -> Result<Restored, StoreError> {
        let teams = self
            .teams
            .into_iter()
            .map(|row| {
                let (name, id) = identity(&row.name, row.id)?;
                Ok(Registration {
                    name,
                    id,
                    size: row.size,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        let waitlist = self
            .waitlist
            .into_iter()
            .map(|row| {
                let (name, id) = identity(&row.name, row.id)?;
                Ok(WaitlistEntry {
                    name,
                    id,
                    pending: row.pending,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let alloc = Allocator::from_parts(AllocatorParts {
            capacity: self.capacity,
            used_seats: self.used_seats,
            max_team_size: self.max_team_size,
            accepting: self.accepting,
            teams,
            waitlist,
        })
        .map_err(|e| corrupt(e.to_string()))?;

        Ok(Restored {
            info: EventInfo {
                title: self.title,
                description: self.description,
                expires_at: self
                    .expires_at
                    .map(|secs| UNIX_EPOCH + Duration::from_secs(secs)),
            },
            alloc,
            assignments: self.assignments,
        })
    }
}

fn identity(raw: &str, id: String) -> Result<(TeamName, TeamId), StoreError> {
    let name = TeamName::parse(raw).map_err(|e| corrupt(e.to_string()))?;
    let id = if id.is_empty() {
        TeamId::derive(&name)
    } else {
        TeamId::from_stored(id)
    };
    Ok((name, id))
}

fn corrupt(reason: String) -> StoreError {
    StoreError::Corrupt { reason }
}

fn unix_secs(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

fn accepting_default() -> bool {
    true
}

fn teams_any<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<TeamRow>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Teams {
        Rows(Vec<TeamRow>),
        Legacy(LegacyTeams),
    }

    Ok(match Teams::deserialize(d)? {
        Teams::Rows(rows) => rows,
        Teams::Legacy(LegacyTeams(rows)) => rows,
    })
}

fn waitlist_any<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<WaitlistRow>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Row {
        Triple(String, u32, String),
        Pair(String, u32),
        Current(WaitlistRow),
    }

    let rows = Vec::<Row>::deserialize(d)?;
    Ok(rows
        .into_iter()
        .map(|row| match row {
            Row::Triple(name, pending, id) => WaitlistRow { name, id, pending },
            Row::Pair(name, pending) => WaitlistRow {
                name,
                id: String::new(),
                pending,
            },
            Row::Current(row) => row,
        })
        .collect())
}

/// `name → size | {size, id}` map, decoded in document order.
struct LegacyTeams(Vec<TeamRow>);

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyTeam {
    Size(u32),
    Record {
        size: u32,
        #[serde(default)]
        id: Option<String>,
    },
}

impl<'de> Deserialize<'de> for LegacyTeams {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct TeamsVisitor;

        impl<'de> Visitor<'de> for TeamsVisitor {
            type Value = LegacyTeams;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of team name to size or {size, id}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LegacyTeams, A::Error> {
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, team)) = map.next_entry::<String, LegacyTeam>()? {
                    let (size, id) = match team {
                        LegacyTeam::Size(size) => (size, String::new()),
                        LegacyTeam::Record { size, id } => (size, id.unwrap_or_default()),
                    };
                    rows.push(TeamRow { name, id, size });
                }
                Ok(LegacyTeams(rows))
            }
        }

        d.deserialize_map(TeamsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (EventInfo, Allocator) {
        let mut alloc = Allocator::new(60, 60);
        alloc.admit("Alpha", 56).unwrap();
        alloc.admit("Beta", 9).unwrap();
        alloc.admit("Gamma", 3).unwrap();
        let info = EventInfo::new("Spring Cup")
            .with_description("bring snacks")
            .with_expiry(UNIX_EPOCH + Duration::from_secs(1_767_225_600));
        (info, alloc)
    }

    #[test]
    fn test_capture_restore_is_lossless() {
        let (info, alloc) = sample();
        let assignments = [("user-1".to_string(), "Beta".to_string())];
        let record = EventRecord::capture(&info, &alloc, assignments);

        let json = serde_json::to_string(&Snapshot {
            revision: 3,
            event: Some(record),
        })
        .unwrap();
        let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.revision, 3);

        let restored = snapshot.event.unwrap().restore().unwrap();
        assert_eq!(restored.info, info);
        assert_eq!(restored.alloc, alloc);
        assert_eq!(restored.assignments["user-1"], "Beta");
    }

    #[test]
    fn test_legacy_document_is_migrated() {
        let json = r#"{
            "event": {
                "name": "Old Cup",
                "max_slots": 20,
                "slots_used": 12,
                "max_team_size": 9,
                "teams": { "Zulu": 5, "alpha": { "size": 7, "id": "abc123" } },
                "waitlist": [["Gamma", 4], ["Delta", 2, "d1"]]
            }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.revision, 0);

        let restored = snapshot.event.unwrap().restore().unwrap();
        let teams: Vec<_> = restored
            .alloc
            .registry()
            .iter()
            .map(|r| (r.name.as_str(), r.id.as_str().to_string(), r.size))
            .collect();
        let zulu_id = TeamId::derive(&TeamName::parse("zulu").unwrap());
        assert_eq!(
            teams,
            [
                ("Zulu", zulu_id.to_string(), 5),
                ("alpha", "abc123".to_string(), 7)
            ]
        );
        let queue: Vec<_> = restored
            .alloc
            .waitlist()
            .iter()
            .map(|e| (e.name.as_str(), e.id.as_str(), e.pending))
            .collect();
        assert_eq!(queue[1], ("Delta", "d1", 2));
        assert_eq!(queue[0].0, "Gamma");
        assert!(restored.alloc.is_accepting());
        assert_eq!(restored.info.title, "Old Cup");
    }

    #[test]
    fn test_invalid_records_are_corrupt() {
        let (info, alloc) = sample();
        let good = EventRecord::capture(&info, &alloc, []);

        let mut bad = good.clone();
        bad.used_seats += 1;
        assert_eq!(bad.restore().unwrap_err().as_label(), "store_corrupt");

        let mut bad = good.clone();
        bad.teams.push(TeamRow {
            name: "ALPHA".into(),
            id: String::new(),
            size: 1,
        });
        bad.used_seats += 1;
        bad.capacity += 1;
        assert!(matches!(bad.restore(), Err(StoreError::Corrupt { .. })));

        let mut bad = good.clone();
        bad.waitlist[0].pending = 0;
        assert!(bad.restore().is_err());

        let mut bad = good;
        bad.teams[0].name = "   ".into();
        assert!(bad.restore().is_err());
    }
}
