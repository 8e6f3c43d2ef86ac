//! # Team identity and per-team records.
//!
//! A team is addressed by name, case-insensitively and ignoring surrounding
//! whitespace. [`TeamName`] keeps the display form the team was created with and
//! compares by key, so `"Alpha "` and `"alpha"` are the same team.
//!
//! [`TeamId`] is the first 10 hex characters of `SHA-256(key)`; it does not change
//! when a caller spells the name differently.
//!
//! ## Example
//! ```rust
//! use seatvisor::{TeamId, TeamName};
//!
//! let a = TeamName::parse("  Alpha ").unwrap();
//! let b = TeamName::parse("ALPHA").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "Alpha");
//! assert_eq!(TeamId::derive(&a), TeamId::derive(&b));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use sha2::{Digest, Sha256};

use crate::error::AllocError;

/// Length of a derived [`TeamId`] in hex characters.
const ID_LEN: usize = 10;

/// Case-insensitive team name.
#[derive(Clone, Debug)]
pub struct TeamName {
    display: String,
    key: String,
}

impl TeamName {
    /// Parses a caller-supplied name.
    ///
    /// Fails with [`AllocError::InvalidInput`] when the name is empty after trimming.
    pub fn parse(raw: &str) -> Result<Self, AllocError> {
        let display = raw.trim();
        if display.is_empty() {
            return Err(AllocError::invalid("team name must not be empty"));
        }
        Ok(Self {
            display: display.to_string(),
            key: display.to_lowercase(),
        })
    }

    /// Display form (trimmed, original casing).
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lookup key (trimmed, lowercase).
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True if `other` names the same team.
    #[inline]
    pub fn matches(&self, other: &TeamName) -> bool {
        self.key == other.key
    }
}

impl PartialEq for TeamName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TeamName {}

impl Hash for TeamName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Opaque, stable team reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TeamId(String);

impl TeamId {
    /// Derives the id of a team from its key.
    pub fn derive(name: &TeamName) -> Self {
        let digest = Sha256::digest(name.key().as_bytes());
        Self(
            digest[..ID_LEN / 2]
                .iter()
                .map(|byte| format!("{byte:02x}"))
                .collect(),
        )
    }

    /// Wraps an id read from storage (ids written by older versions are kept as-is).
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One admitted team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub name: TeamName,
    pub id: TeamId,
    /// Admitted seats, always `> 0` while the registration exists.
    pub size: u32,
}

/// One pending request on the waitlist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub name: TeamName,
    pub id: TeamId,
    /// Seats still waiting, always `> 0` while the entry exists.
    pub pending: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_keys_lowercase() {
        let name = TeamName::parse("\tRed Foxes  ").unwrap();
        assert_eq!(name.as_str(), "Red Foxes");
        assert_eq!(name.key(), "red foxes");
        assert_eq!(name.to_string(), "Red Foxes");
    }

    #[test]
    fn test_parse_rejects_blank() {
        let err = TeamName::parse("   ").unwrap_err();
        assert_eq!(err.as_label(), "invalid_input");
    }

    #[test]
    fn test_id_is_stable_and_short() {
        let a = TeamId::derive(&TeamName::parse("Alpha").unwrap());
        let b = TeamId::derive(&TeamName::parse(" alpha").unwrap());
        let c = TeamId::derive(&TeamName::parse("Beta").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), ID_LEN);
        assert!(a.as_str().chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_id_is_sha256_prefix_of_key() {
        let id = TeamId::derive(&TeamName::parse("ALPHA").unwrap());
        assert_eq!(id.as_str(), "8ed3f6ad68");
    }
}
