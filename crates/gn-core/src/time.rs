//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  Every tick advances
//! each agent by the same step `dt` (seconds), held in `SimClock`:
//!
//!   elapsed = tick * dt
//!
//! Agents integrate motion continuously (`speed * dt` grid cells per tick),
//! so `dt` is an `f32` rather than the integer second counts used for
//! scheduling.  Callers that drive the world with a variable frame time can
//! bypass the clock and pass `dt` to `World::update` directly.

use std::fmt;

use crate::{NavError, NavResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and the fixed step it represents.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds of simulated time per tick.
    pub dt_secs: f32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(dt_secs: f32) -> Self {
        Self { dt_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.dt_secs as f64
    }

    /// How many ticks an agent moving at `speed` cells/s needs to cover
    /// `distance` cells.  Rounds up.  `None` for a stationary agent.
    pub fn ticks_for_distance(&self, distance: f32, speed: f32) -> Option<u64> {
        if speed <= 0.0 || self.dt_secs <= 0.0 {
            return None;
        }
        Some((distance / (speed * self.dt_secs)).ceil().max(0.0) as u64)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from JSON by the application and handed to the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Seconds per tick.  Default: 1.0, so speeds read as cells per tick.
    pub dt_secs: f32,

    /// Total ticks to simulate with `World::run`.
    pub total_ticks: u64,

    /// Whether an agent with its footprint disabled still treats other
    /// agents' reservations as obstacles when it searches.  Footprint-disabled
    /// agents are always invisible to everyone else.  Default: `false`.
    pub ghosts_respect_reservations: bool,

    /// Distance under which a waypoint counts as reached.
    pub arrival_epsilon: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt_secs:                     1.0,
            total_ticks:                 1_000,
            ghosts_respect_reservations: false,
            arrival_epsilon:             1e-4,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt_secs)
    }

    /// Reject configurations that would make motion meaningless.
    pub fn validate(&self) -> NavResult<()> {
        if !self.dt_secs.is_finite() || self.dt_secs < 0.0 {
            return Err(NavError::Config(format!("dt_secs must be finite and >= 0, got {}", self.dt_secs)));
        }
        if !self.arrival_epsilon.is_finite() || self.arrival_epsilon <= 0.0 {
            return Err(NavError::Config(format!(
                "arrival_epsilon must be finite and > 0, got {}",
                self.arrival_epsilon
            )));
        }
        Ok(())
    }
}
