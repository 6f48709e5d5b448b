//! `gn-agent` — agents that move across a `GridMap`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`state`]   | `NavState` — Idle / Seeking / Blocked / Arrived                |
//! | [`events`]  | `AgentEvent`, `AgentSignals` — the four lifecycle signals      |
//! | [`motion`]  | `advance` — budgeted travel along a waypoint queue             |
//! | [`agent`]   | `NavigationAgent`, `AgentRecord`                               |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                                 |
//!
//! # Update model
//!
//! An agent never owns its map.  Every mutating call that touches occupancy
//! takes `&mut GridMap`, so the world decides which map an agent is bound to
//! and the borrow checker guarantees that only one agent updates it at a
//! time.  Lifecycle events are *returned* from each call rather than
//! dispatched here; the world routes them through the agent's
//! [`AgentSignals`] after the agent's borrow has ended, so callbacks may look
//! the agent up again without aliasing.
//!
//! # Reservation invariant
//!
//! The cells in `NavigationAgent::reserved_cells` are exactly the cells this
//! agent currently holds one reservation on.  Every path that changes the
//! footprint (construction, teleport, toggling, motion, resize, retirement)
//! goes through one diff-based sync, so per cell the number of reserves always
//! equals the number of releases once the agent is retired.

pub mod agent;
pub mod error;
pub mod events;
pub mod motion;
pub mod state;


pub use agent::{AgentRecord, NavigationAgent};
pub use error::{AgentError, AgentResult};
pub use events::{AgentEvent, AgentSignals};
pub use motion::{Advance, advance};
pub use state::NavState;
