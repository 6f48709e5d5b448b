//! Fluent builders for populating a [`World`].
//!
//! ```rust,ignore
//! let mut world = World::new(SimConfig::default())?;
//! let map = MapBuilder::new(Size::new(40, 20))
//!     .cell_size(Size::new(32.0, 32.0))
//!     .block_region(GridPoint::new(20, 0), Size::new(1, 8))
//!     .build(&mut world)?;
//! let agent = AgentBuilder::new(map, Point::new(2.5, 10.5))
//!     .speed(3.0)
//!     .goal(Point::new(37.5, 10.5), 0.0)
//!     .spawn(&mut world)?;
//! ```

use gn_core::{AgentId, GridPoint, MapId, Point, Size};
use gn_path::PathPlanner;

use crate::{MapLayout, World, WorldResult};

// ── MapBuilder ────────────────────────────────────────────────────────────────

/// Builder for a map and its layout.
///
/// | Method           | Default              |
/// |------------------|----------------------|
/// | `.corners(b)`    | `true`               |
/// | `.cell_size(s)`  | `1 × 1`              |
/// | `.offset(p)`     | `(0, 0)`             |
/// | `.origin(p)`     | `(0, 0)`             |
/// | `.show_debug()`  | hidden               |
#[derive(Clone, Debug)]
pub struct MapBuilder {
    size:       Size<i32>,
    corners:    bool,
    layout:     MapLayout,
    regions:    Vec<(GridPoint, Size<i32>)>,
    show_debug: bool,
}

impl MapBuilder {
    pub fn new(size: Size<i32>) -> Self {
        Self {
            size,
            corners:    true,
            layout:     MapLayout::default(),
            regions:    Vec::new(),
            show_debug: false,
        }
    }

    pub fn corners(mut self, corners: bool) -> Self {
        self.corners = corners;
        self
    }

    pub fn cell_size(mut self, cell_size: Size<f32>) -> Self {
        self.layout.cell_size = cell_size;
        self
    }

    pub fn offset(mut self, offset: Point) -> Self {
        self.layout.offset = offset;
        self
    }

    pub fn origin(mut self, origin: Point) -> Self {
        self.layout.origin = origin;
        self
    }

    pub fn block(self, cell: GridPoint) -> Self {
        self.block_region(cell, Size::new(1, 1))
    }

    /// Statically block the rectangle at `origin`.  Parts outside the grid
    /// are ignored.
    pub fn block_region(mut self, origin: GridPoint, extent: Size<i32>) -> Self {
        self.regions.push((origin, extent));
        self
    }

    pub fn show_debug(mut self) -> Self {
        self.show_debug = true;
        self
    }

    pub fn build<P: PathPlanner>(self, world: &mut World<P>) -> WorldResult<MapId> {
        let id = world.add_map(self.size, self.corners, self.layout)?;
        let mut map = world.path_map(id)?;
        for (origin, extent) in self.regions {
            map.set_static_region(origin, extent, true)?;
        }
        if self.show_debug {
            map.show()?;
        }
        Ok(id)
    }
}

// ── AgentBuilder ──────────────────────────────────────────────────────────────

/// Builder for one agent.  Positions, goals, speeds and tolerances are in
/// grid units.
///
/// | Method              | Default                     |
/// |---------------------|-----------------------------|
/// | `.footprint(n)`     | `1`                         |
/// | `.speed(s)`         | `1.0` cells per second      |
/// | `.goal(p, t)`       | none (agent starts idle)    |
/// | `.ghost()`          | footprint enabled           |
#[derive(Clone, Debug)]
pub struct AgentBuilder {
    map:       MapId,
    position:  Point,
    footprint: i32,
    speed:     Option<f32>,
    goal:      Option<(Point, f32)>,
    ghost:     bool,
}

impl AgentBuilder {
    pub fn new(map: MapId, position: Point) -> Self {
        Self { map, position, footprint: 1, speed: None, goal: None, ghost: false }
    }

    /// Start at the centre of `cell`.
    pub fn at_cell(map: MapId, cell: GridPoint) -> Self {
        Self::new(map, cell.center())
    }

    pub fn footprint(mut self, size: i32) -> Self {
        self.footprint = size;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn goal(mut self, goal: Point, tolerance: f32) -> Self {
        self.goal = Some((goal, tolerance));
        self
    }

    /// Spawn with the footprint disabled.
    pub fn ghost(mut self) -> Self {
        self.ghost = true;
        self
    }

    pub fn spawn<P: PathPlanner>(self, world: &mut World<P>) -> WorldResult<AgentId> {
        let id = world.add_agent(self.map, self.position, self.footprint)?;
        let mut agent = world.path_agent(id)?;
        if self.ghost {
            agent.disable_footprint()?;
        }
        if let Some(speed) = self.speed {
            agent.set_grid_speed(speed)?;
        }
        if let Some((goal, tolerance)) = self.goal {
            agent.set_grid_goal(goal, tolerance)?;
        }
        Ok(id)
    }
}
