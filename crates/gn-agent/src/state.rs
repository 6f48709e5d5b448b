//! Navigation state machine.

use std::fmt;

/// Where an agent is in its pursuit of the current goal.
///
/// ```text
///            set_goal                 path found
///   Idle ───────────────► (search) ───────────────► Seeking ──► Arrived
///    ▲                       │ no path                  │
///    │ stop                  ▼                          │ path invalidated,
///    └──────────────────── Blocked ◄────────────────────┘ no alternative
/// ```
///
/// `Blocked` is left as soon as a later search succeeds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavState {
    /// No goal pursuit in progress.
    #[default]
    Idle,
    /// Following a path.
    Seeking,
    /// Pursuing a goal that is currently unreachable.
    Blocked,
    /// Reached the goal within tolerance; pursuit ended.
    Arrived,
}

impl NavState {
    /// `true` for `Seeking` and `Blocked`.
    #[inline]
    pub fn is_pursuing(self) -> bool {
        matches!(self, NavState::Seeking | NavState::Blocked)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NavState::Idle    => "idle",
            NavState::Seeking => "seeking",
            NavState::Blocked => "blocked",
            NavState::Arrived => "arrived",
        }
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
