//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing count of simulated seconds held in
//! [`SimTime`].  The fleet never reads the wall clock: every timestamp that
//! matters (reservation grants, wait starts, stale cut-offs) is derived from
//! the [`FleetClock`] advanced by the caller-supplied `dt` each tick, so a
//! run is reproducible regardless of host speed.
//!
//! Continuous seconds rather than an integer tick counter because movement
//! progress, battery drain, and the stale/wait timeouts are all rate × time
//! quantities; the tick length is whatever `dt` the driver passes in.

use std::fmt;
use std::ops::Sub;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp, in seconds since simulation start.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Seconds elapsed from `earlier` to `self`.  Negative if `earlier` is
    /// in the future; callers compare against thresholds, so that is fine.
    #[inline]
    pub fn secs_since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    /// The timestamp `secs` seconds after `self`.
    #[inline]
    pub fn offset(self, secs: f64) -> SimTime {
        SimTime(self.0 + secs)
    }
}

impl Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}s", self.0)
    }
}

// ── FleetClock ────────────────────────────────────────────────────────────────

/// The simulation clock — advanced once per fleet tick.
///
/// Cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetClock {
    now: SimTime,
}

impl FleetClock {
    pub fn new() -> Self {
        Self { now: SimTime::ZERO }
    }

    /// Current simulation time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Advance the clock by `dt` seconds.  Non-positive `dt` is ignored so a
    /// buggy driver cannot run time backwards.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.now = self.now.offset(dt);
        }
    }
}

impl fmt::Display for FleetClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.now.fmt(f)
    }
}
