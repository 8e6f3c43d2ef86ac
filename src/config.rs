//! # Global registrar configuration.
//!
//! Provides [`Config`], the settings a [`Registrar`](crate::Registrar) is built with.
//!
//! Config is used in two ways:
//! 1. **Event creation**: `create_event` seeds `capacity` and `max_team_size` from it.
//! 2. **Runtime wiring**: bus capacity and the sweeper interval.
//!
//! `Config` implements `Deserialize` with every field defaulted, so an embedding
//! application can load a partial document:
//! ```rust
//! use seatvisor::Config;
//!
//! let cfg: Config = serde_json::from_str(r#"{ "max_slots": 60 }"#).unwrap();
//! assert_eq!(cfg.max_slots, 60);
//! assert_eq!(cfg.max_team_size, 9);
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Settings for the registrar runtime.
///
/// ## Field semantics
/// - `max_slots`: capacity of a newly created event
/// - `max_team_size`: per-team ceiling of a newly created event
/// - `expanded_max_team_size`: ceiling applied by `raise_team_size_limit`
/// - `sweep_interval_secs`: period of the background sweeper (`0` = sweeper disabled)
/// - `bus_capacity`: notice bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity of a newly created event.
    pub max_slots: u32,

    /// Per-team size ceiling of a newly created event.
    pub max_team_size: u32,

    /// Ceiling applied when organizers raise the team size limit.
    pub expanded_max_team_size: u32,

    /// Seconds between two sweeps (promotion + expiry check).
    pub sweep_interval_secs: u64,

    /// Capacity of the notice bus broadcast channel ring buffer.
    ///
    /// Slow listeners that lag behind more than `bus_capacity` notices will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the sweep period, or `None` when sweeping is disabled.
    #[inline]
    pub fn sweep_interval(&self) -> Option<Duration> {
        match self.sweep_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_slots = 96`
    /// - `max_team_size = 9`
    /// - `expanded_max_team_size = 18`
    /// - `sweep_interval_secs = 60`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_slots: 96,
            max_team_size: 9,
            expanded_max_team_size: 18,
            sweep_interval_secs: 60,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "expanded_max_team_size": 24, "sweep_interval_secs": 0 }"#)
                .unwrap();
        assert_eq!(cfg.max_slots, 96);
        assert_eq!(cfg.expanded_max_team_size, 24);
        assert!(cfg.sweep_interval().is_none());
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(Config::default().sweep_interval(), Some(Duration::from_secs(60)));
    }
}
