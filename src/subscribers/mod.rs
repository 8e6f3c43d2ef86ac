//! # Notice subscribers.
//!
//! The notification gateway of the registrar: [`Subscribe`] implementations
//! receive every [`Notice`](crate::Notice) through a [`SubscriberSet`].
//!
//! ```text
//! Registrar ── publish(Notice) ──► Bus ──► listener ──► SubscriberSet
//!                                                          │
//!                                              ┌───────────┼───────────┐
//!                                              ▼           ▼           ▼
//!                                          LogWriter   Announcer    Custom
//! ```
//!
//! ## Contents
//! - [`Subscribe`] trait
//! - [`SubscriberSet`] per-subscriber queues and workers
//! - [`LogWriter`] `tracing` output (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
