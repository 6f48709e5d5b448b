//! Plain data row types written by output backends.

use gn_agent::{AgentEvent, NavState};

/// One agent lifecycle event.  Positions are in grid space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentEventRow {
    pub tick:     u64,
    pub agent_id: u32,
    pub map_id:   u32,
    pub event:    AgentEvent,
    /// State after the transition that fired the event.
    pub state:    NavState,
    pub x:        f32,
    pub y:        f32,
}

/// Aggregate agent state at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    /// Simulated time at the start of the tick, in milliseconds.
    pub elapsed_ms:   u64,
    pub agents:       u64,
    pub idle:         u64,
    pub seeking:      u64,
    pub blocked:      u64,
    pub arrived:      u64,
    pub events:       u64,
    pub reservations: u64,
}
