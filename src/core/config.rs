//! # Run configuration.
//!
//! Provides [`Config`] centralized settings for a [`Coordinator`](crate::Coordinator).
//!
//! ## Sentinel values
//! - `workers = 0` → valid; the run yields no results and ends immediately
//! - `tick = 0s` → workers do not sleep, they only yield once
//! - `bus_capacity = 0` → clamped to 1
//!
//! ## Event budget
//! A run publishes at most [`Config::event_budget`] events: per worker
//! `Starting`, `Sent`, `Terminated` (or `Starting`, `Failed`) and one
//! `ResultReceived`, plus `ChannelClosed` and `AllFinished` once. The bus and
//! the subscriber queues of a run are never sized below it, so no lifecycle
//! event is dropped however many workers are launched.

use std::time::Duration;

use crate::{delays::DelayBounds, error::RuntimeError};

/// Settings for one fan-out/fan-in run.
///
/// ## Field semantics
/// - `workers`: number of workers launched by `run_all()`
/// - `delay`: inclusive bounds each worker samples its delay from
/// - `tick`: wall-clock length of one delay unit
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of workers to launch.
    pub workers: usize,

    /// Inclusive delay bounds, in delay units.
    pub delay: DelayBounds,

    /// Duration of one delay unit for the default sleep work.
    ///
    /// Ignored when a custom [`Work`](crate::Work) is installed.
    pub tick: Duration,

    /// Minimum capacity of the event bus broadcast channel ring buffer.
    ///
    /// A run raises it to [`Config::event_budget`] when more workers are launched.
    pub bus_capacity: usize,
}

impl Config {
    /// Checks the settings that cannot be clamped.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        self.delay.validate().map(|_| ())
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Upper bound on the lifecycle events one run publishes on its bus.
    #[inline]
    pub fn event_budget(&self) -> usize {
        self.workers.saturating_mul(4).saturating_add(2)
    }

    /// Bus capacity for a run: never below the run's event budget.
    #[inline]
    pub(crate) fn run_bus_capacity(&self) -> usize {
        self.bus_capacity_clamped().max(self.event_budget())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `workers = 5`
    /// - `delay = [1, 5]`
    /// - `tick = 1s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            workers: 5,
            delay: DelayBounds::default(),
            tick: Duration::from_secs(1),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_run() {
        let cfg = Config::default();
        assert_eq!(cfg.workers, 5);
        assert_eq!(cfg.delay, DelayBounds { min: 1, max: 5 });
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn clamps_bus_capacity() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn run_bus_grows_with_worker_count() {
        let small = Config::default();
        assert_eq!(small.event_budget(), 22);
        assert_eq!(small.run_bus_capacity(), 1024);

        let large = Config {
            workers: 3000,
            ..Config::default()
        };
        assert_eq!(large.event_budget(), 12_002);
        assert_eq!(large.run_bus_capacity(), 12_002);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let cfg = Config {
            delay: DelayBounds { min: 9, max: 1 },
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(RuntimeError::InvalidBounds { min: 9, max: 1 })
        ));
    }
}
