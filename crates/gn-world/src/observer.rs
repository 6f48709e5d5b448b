//! World observer trait for progress reporting and event collection.

use gn_agent::{AgentEvent, NavigationAgent};
use gn_core::Tick;

/// Aggregate agent state at the end of a tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickSummary {
    pub agents:       usize,
    pub idle:         usize,
    pub seeking:      usize,
    pub blocked:      usize,
    pub arrived:      usize,
    /// Lifecycle events fired during the tick.
    pub events:       usize,
    /// Sum of reservation counts over every map.
    pub reservations: u64,
}

/// Callbacks invoked by [`World::run`][crate::World::run] and
/// [`World::step`][crate::World::step].
///
/// All methods default to no-ops.  Unlike per-agent signals, an observer
/// sees every agent's events and is the place to hang output writers.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl WorldObserver for Arrivals {
///     fn on_agent_event(&mut self, _tick: Tick, _agent: &NavigationAgent, event: AgentEvent) {
///         if event == AgentEvent::Arrive {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called at the start of each tick, before any agent updates.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for each lifecycle event, right after the agent's own signal
    /// has been fired.
    fn on_agent_event(&mut self, _tick: Tick, _agent: &NavigationAgent, _event: AgentEvent) {}

    /// Called after every agent has been updated.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called once after `run` reaches `config.end_tick()`.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}
