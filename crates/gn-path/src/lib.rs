//! `gn-path` — grid search for navigation agents.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`path`]    | `Path` — the cells returned by a successful search          |
//! | [`planner`] | `PathPlanner` trait, `PathRequest`, `AStarPlanner`          |
//! | [`smooth`]  | line-of-sight cell walk and waypoint shortcutting           |
//!
//! Planning is stateless: every call reads the map as it is at that moment
//! and returns a fresh [`Path`] or `None`.  "No path" is a normal outcome,
//! which is why the planner returns `Option` rather than `Result`.

pub mod path;
pub mod planner;
pub mod smooth;


pub use path::Path;
pub use planner::{AStarPlanner, PathPlanner, PathRequest, find_path};
pub use smooth::{line_clear, segment_cells, smooth};
