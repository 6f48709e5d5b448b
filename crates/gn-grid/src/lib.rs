//! `gn-grid` — the shared occupancy grid.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`map`]       | `GridMap`, `MapCell`, `Blocking`                        |
//! | [`footprint`] | `Footprint` — the square of cells an agent occupies     |
//! | [`error`]     | `GridError`, `GridResult<T>`                            |
//!
//! # Occupancy model
//!
//! Every cell carries a permanent `static_blocked` flag (map authoring) and a
//! transient reservation count (one per agent footprint covering it).  The
//! map knows nothing about agents; a searching agent passes its own reserved
//! cells so they are not counted against it.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Footprint`/`MapCell`.  |

pub mod error;
pub mod footprint;
pub mod map;


pub use error::{GridError, GridResult};
pub use footprint::Footprint;
pub use map::{Blocking, GridMap, MapCell};
