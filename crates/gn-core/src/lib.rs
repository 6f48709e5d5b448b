//! `gn-core` — foundational types for the `gridnav` navigation engine.
//!
//! This crate is a dependency of every other `gn-*` crate.  It has no `gn-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `MapId`, `ReceiverId`                        |
//! | [`geo`]     | `GridPoint`, `Point`, `Size`                            |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                         |
//! | [`signal`]  | `Signal`, `Receiver` — multi-subscriber callback bus    |
//! | [`error`]   | `NavError`, `NavResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, geometry and config.|

pub mod error;
pub mod geo;
pub mod ids;
pub mod signal;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NavError, NavResult};
pub use geo::{GridPoint, Point, Size};
pub use ids::{AgentId, MapId, ReceiverId};
pub use signal::{Receiver, Signal};
pub use time::{SimClock, SimConfig, Tick};
