//! # Data model shared by the engine, the store and the registrar.
//!
//! - [`TeamName`] trimmed display form plus a lowercase key; equality uses the key
//! - [`TeamId`] stable external reference derived from the key
//! - [`Registration`] one admitted team and its seat count
//! - [`WaitlistEntry`] one pending request and its seat count
//! - [`EventInfo`] descriptive data and expiry of the event

mod info;
mod team;

pub use info::EventInfo;
pub use team::{Registration, TeamId, TeamName, WaitlistEntry};
