//! Error types used by the allocation engine, the persistence gateway and the registrar.
//!
//! This module defines three enums:
//!
//! - [`AllocError`] - rejections produced by the allocation engine itself.
//! - [`StoreError`] - failures while reading or writing snapshots.
//! - [`RegistrarError`] - everything the async [`Registrar`](crate::Registrar) can return.
//!
//! Every variant is produced **before** any state is touched: an operation either
//! commits completely or returns one of these errors and leaves the event unchanged.
//! All types provide `as_label` for logs/metrics.

use std::io;

use thiserror::Error;

/// # Rejections produced by the allocation engine.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// Non-positive size, empty name or otherwise malformed request.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the request.
        reason: String,
    },

    /// The team is neither registered nor waitlisted.
    #[error("team '{team}' is neither registered nor waitlisted")]
    NotFound {
        /// Team name as given by the caller.
        team: String,
    },

    /// A team with the same case-insensitive name already exists.
    #[error("team '{team}' already exists")]
    DuplicateName {
        /// Team name as given by the caller.
        team: String,
    },

    /// Requested or resized team size exceeds the per-team ceiling.
    #[error("team size {requested} exceeds the limit of {limit}")]
    SizeLimitExceeded {
        /// Total size the team would end up with.
        requested: u32,
        /// Current `max_team_size`.
        limit: u32,
    },

    /// A new team identity was requested while the event is not accepting new teams.
    #[error("registrations are closed")]
    RegistrationsClosed,

    /// Capacity may only grow through expansion.
    #[error("capacity {requested} must be greater than the current {current}")]
    InvalidCapacity {
        /// Current capacity.
        current: u32,
        /// Requested capacity.
        requested: u32,
    },

    /// Lifecycle transition into the state the event is already in.
    #[error("event is already {state}")]
    AlreadyInState {
        /// Name of the state (`open`, `closed`, `expanded`).
        state: &'static str,
    },
}

impl AllocError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        AllocError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use seatvisor::AllocError;
    ///
    /// let err = AllocError::RegistrationsClosed;
    /// assert_eq!(err.as_label(), "registrations_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AllocError::InvalidInput { .. } => "invalid_input",
            AllocError::NotFound { .. } => "not_found",
            AllocError::DuplicateName { .. } => "duplicate_name",
            AllocError::SizeLimitExceeded { .. } => "size_limit_exceeded",
            AllocError::RegistrationsClosed => "registrations_closed",
            AllocError::InvalidCapacity { .. } => "invalid_capacity",
            AllocError::AlreadyInState { .. } => "already_in_state",
        }
    }
}

/// # Errors produced by the persistence gateway.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("snapshot io failed: {0}")]
    Io(#[from] io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot decoded but describes an impossible event.
    #[error("snapshot is corrupt: {reason}")]
    Corrupt {
        /// Which invariant the snapshot violates.
        reason: String,
    },
}

impl StoreError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "store_io",
            StoreError::Json(_) => "store_json",
            StoreError::Corrupt { .. } => "store_corrupt",
        }
    }
}

/// # Errors returned by the [`Registrar`](crate::Registrar).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistrarError {
    /// The allocation engine rejected the operation.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// Loading a snapshot failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No event has been created (or it was deleted/expired).
    #[error("no active event")]
    NoActiveEvent,

    /// An event already exists; delete it first.
    #[error("an event already exists")]
    EventExists,

    /// The requester already belongs to another team.
    #[error("requester '{requester}' is already assigned to team '{team}'")]
    AlreadyAssigned {
        /// External requester identity.
        requester: String,
        /// Team the requester is assigned to.
        team: String,
    },

    /// The requester has no team assignment.
    #[error("requester '{requester}' is not assigned to a team")]
    NotAssigned {
        /// External requester identity.
        requester: String,
    },
}

impl RegistrarError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use seatvisor::{AllocError, RegistrarError};
    ///
    /// let err = RegistrarError::from(AllocError::RegistrationsClosed);
    /// assert_eq!(err.as_label(), "registrations_closed");
    /// assert_eq!(RegistrarError::NoActiveEvent.as_label(), "no_active_event");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrarError::Alloc(e) => e.as_label(),
            RegistrarError::Store(e) => e.as_label(),
            RegistrarError::NoActiveEvent => "no_active_event",
            RegistrarError::EventExists => "event_exists",
            RegistrarError::AlreadyAssigned { .. } => "already_assigned",
            RegistrarError::NotAssigned { .. } => "not_assigned",
        }
    }

    /// Returns the engine error, if this is one.
    pub fn as_alloc(&self) -> Option<&AllocError> {
        match self {
            RegistrarError::Alloc(e) => Some(e),
            _ => None,
        }
    }
}
