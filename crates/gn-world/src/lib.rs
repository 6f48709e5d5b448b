//! `gn-world` — the arena that owns maps and agents and runs the tick loop.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`world`]    | `World<P>` — map/agent arenas, update order, tick loop     |
//! | [`facade`]   | `PathMap`, `PathAgent` — local-space handles               |
//! | [`layout`]   | `MapLayout` — grid ↔ local ↔ world arithmetic              |
//! | [`debug`]    | `DebugView` — per-cell overlay quads and colours           |
//! | [`observer`] | `WorldObserver`, `NoopObserver`, `TickSummary`             |
//! | [`snapshot`] | `WorldSnapshot` — JSON save/load                           |
//! | [`builder`]  | `MapBuilder`, `AgentBuilder`                               |
//! | [`error`]    | `WorldError`, `WorldResult<T>`                             |
//!
//! # Tick
//!
//! ```text
//! step():
//!   observer.on_tick_start(now)
//!   for agent in creation order:
//!     events = agent.update(dt, its map, planner, config)
//!     for event in events: agent signal, then observer.on_agent_event
//!   recolour visible debug overlays
//!   observer.on_tick_end(now, summary)
//!   clock.advance()
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gn_core::{Point, SimConfig, Size};
//! use gn_world::{AgentBuilder, MapBuilder, NoopObserver, World};
//!
//! let mut world = World::new(SimConfig::default())?;
//! let map = MapBuilder::new(Size::new(16, 16)).build(&mut world)?;
//! let id = AgentBuilder::new(map, Point::new(1.5, 1.5))
//!     .goal(Point::new(14.5, 14.5), 0.0)
//!     .spawn(&mut world)?;
//! let _r = world.signals(id)?.on_arrive.connect(|a| println!("{} arrived", a.id()));
//! world.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod debug;
pub mod error;
pub mod facade;
pub mod layout;
pub mod observer;
pub mod snapshot;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::{AgentBuilder, MapBuilder};
pub use debug::{Color, DebugTile, DebugView};
pub use error::{WorldError, WorldResult};
pub use facade::{PathAgent, PathMap};
pub use layout::MapLayout;
pub use observer::{NoopObserver, TickSummary, WorldObserver};
pub use snapshot::{AgentSnapshot, MapSnapshot, WorldSnapshot};
pub use world::World;
