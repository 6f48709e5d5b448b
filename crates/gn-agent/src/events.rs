//! Lifecycle events and the per-agent signal set that carries them.

use std::fmt;

use gn_core::Signal;

use crate::NavigationAgent;

/// A lifecycle transition reported by an agent call.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentEvent {
    /// Began moving toward a goal (from Idle, Blocked or Arrived).
    Start,
    /// Pursuit halted by an explicit `stop`.
    Stop,
    /// Came within tolerance of the goal.
    Arrive,
    /// The goal became unreachable.
    Blocked,
}

impl AgentEvent {
    pub const ALL: [AgentEvent; 4] = [
        AgentEvent::Start,
        AgentEvent::Stop,
        AgentEvent::Arrive,
        AgentEvent::Blocked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentEvent::Start   => "start",
            AgentEvent::Stop    => "stop",
            AgentEvent::Arrive  => "arrive",
            AgentEvent::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AgentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four signals every agent exposes.  Receivers get the agent after the
/// transition has been applied.
#[derive(Debug, Default)]
pub struct AgentSignals {
    pub on_start:   Signal<NavigationAgent>,
    pub on_stop:    Signal<NavigationAgent>,
    pub on_arrive:  Signal<NavigationAgent>,
    pub on_blocked: Signal<NavigationAgent>,
}

impl AgentSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self, event: AgentEvent) -> &Signal<NavigationAgent> {
        match event {
            AgentEvent::Start   => &self.on_start,
            AgentEvent::Stop    => &self.on_stop,
            AgentEvent::Arrive  => &self.on_arrive,
            AgentEvent::Blocked => &self.on_blocked,
        }
    }

    /// Deliver `event` to its signal.  Returns the number of callbacks run.
    pub fn fire(&self, event: AgentEvent, agent: &NavigationAgent) -> usize {
        self.signal(event).notify(agent)
    }

    /// Disconnect everything on all four signals.
    pub fn clear(&self) {
        for event in AgentEvent::ALL {
            self.signal(event).clear();
        }
    }
}
