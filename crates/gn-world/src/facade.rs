//! Local-space handles over world maps and agents.
//!
//! [`PathMap`] and [`PathAgent`] are short-lived borrows of a [`World`] that
//! speak the embedding scene's local coordinates.  Every `local_*` call is
//! the matching `grid_*` call passed through the map's [`MapLayout`], so the
//! two views always agree.
//!
//! Requests that would put an agent's footprint outside its grid are clamped
//! to the nearest valid cell (with a `warn!`) rather than rejected.
//! Non-finite inputs are still errors.

use log::warn;

use gn_agent::{AgentSignals, NavState, NavigationAgent};
use gn_core::{AgentId, GridPoint, MapId, Point, Size};
use gn_grid::{GridMap, MapCell};
use gn_path::PathPlanner;

use crate::world::MapSlot;
use crate::{DebugTile, MapLayout, World, WorldResult};

impl<P: PathPlanner> World<P> {
    /// A local-space handle on map `id`.
    pub fn path_map(&mut self, id: MapId) -> WorldResult<PathMap<'_, P>> {
        self.map_slot(id)?;
        Ok(PathMap { world: self, id })
    }

    /// A local-space handle on agent `id`.
    pub fn path_agent(&mut self, id: AgentId) -> WorldResult<PathAgent<'_, P>> {
        self.agent_slot(id)?;
        Ok(PathAgent { world: self, id })
    }
}

// ── PathMap ───────────────────────────────────────────────────────────────────

pub struct PathMap<'w, P: PathPlanner> {
    world: &'w mut World<P>,
    id:    MapId,
}

impl<P: PathPlanner> PathMap<'_, P> {
    pub fn id(&self) -> MapId {
        self.id
    }

    fn slot(&self) -> WorldResult<&MapSlot> {
        self.world.map_slot(self.id)
    }

    fn slot_mut(&mut self) -> WorldResult<&mut MapSlot> {
        self.world.map_slot_mut(self.id)
    }

    pub fn grid(&self) -> WorldResult<&GridMap> {
        Ok(&self.slot()?.map)
    }

    pub fn layout(&self) -> WorldResult<MapLayout> {
        Ok(self.slot()?.layout)
    }

    pub fn grid_size(&self) -> WorldResult<Size<i32>> {
        Ok(self.slot()?.map.size())
    }

    // ── Layout ────────────────────────────────────────────────────────────

    pub fn cell_size(&self) -> WorldResult<Size<f32>> {
        Ok(self.slot()?.layout.cell_size)
    }

    pub fn set_cell_size(&mut self, cell_size: Size<f32>) -> WorldResult<()> {
        let slot = self.slot_mut()?;
        let layout = MapLayout { cell_size, ..slot.layout };
        layout.validate()?;
        slot.layout = layout;
        slot.debug.reposition(&slot.layout);
        Ok(())
    }

    /// Local-space rectangle covered by the grid.
    pub fn bounds(&self) -> WorldResult<(Point, Point)> {
        let slot = self.slot()?;
        Ok(slot.layout.bounds(slot.map.size()))
    }

    /// Fit the grid to the local rectangle `min..max`: the offset becomes
    /// `min` and the cell size the rectangle divided by the grid size.
    pub fn set_bounds(&mut self, min: Point, max: Point) -> WorldResult<()> {
        let slot = self.slot_mut()?;
        slot.layout.fit_bounds(min, max, slot.map.size())?;
        slot.debug.reposition(&slot.layout);
        Ok(())
    }

    pub fn set_origin(&mut self, origin: Point) -> WorldResult<()> {
        let slot = self.slot_mut()?;
        let layout = slot.layout.with_origin(origin);
        layout.validate()?;
        slot.layout = layout;
        Ok(())
    }

    pub fn local_from_grid(&self, grid: Point) -> WorldResult<Point> {
        Ok(self.slot()?.layout.local_from_grid(grid))
    }

    pub fn local_from_cell(&self, cell: GridPoint) -> WorldResult<Point> {
        Ok(self.slot()?.layout.local_from_cell(cell))
    }

    pub fn grid_from_local(&self, local: Point) -> WorldResult<Point> {
        Ok(self.slot()?.layout.grid_from_local(local))
    }

    pub fn local_from_grid_distance(&self, grid: f32) -> WorldResult<f32> {
        Ok(self.slot()?.layout.local_from_grid_distance(grid))
    }

    pub fn grid_from_local_distance(&self, local: f32) -> WorldResult<f32> {
        Ok(self.slot()?.layout.grid_from_local_distance(local))
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    pub fn node_from_grid(&self, cell: GridPoint) -> WorldResult<MapCell> {
        Ok(*self.slot()?.map.get(cell)?)
    }

    pub fn node_from_local(&self, local: Point) -> WorldResult<MapCell> {
        let slot = self.slot()?;
        Ok(*slot.map.get(slot.layout.cell_from_local(local))?)
    }

    pub fn in_bounds(&self, cell: GridPoint) -> WorldResult<bool> {
        Ok(self.slot()?.map.in_bounds(cell))
    }

    pub fn blocked(&self, cell: GridPoint) -> WorldResult<bool> {
        Ok(self.slot()?.map.blocked(cell))
    }

    pub fn statically_blocked(&self, cell: GridPoint) -> WorldResult<bool> {
        Ok(self.slot()?.map.statically_blocked(cell))
    }

    pub fn corners(&self) -> WorldResult<bool> {
        Ok(self.slot()?.map.corners())
    }

    // ── Authoring ─────────────────────────────────────────────────────────

    pub fn set_corners(&mut self, corners: bool) -> WorldResult<()> {
        self.slot_mut()?.map.set_corners(corners);
        Ok(())
    }

    pub fn set_static_blocked(&mut self, cell: GridPoint, blocked: bool) -> WorldResult<()> {
        let slot = self.slot_mut()?;
        slot.map.set_static_blocked(cell, blocked)?;
        slot.debug.recolor(&slot.map);
        Ok(())
    }

    /// Returns the number of cells whose flag changed.
    pub fn set_static_region(&mut self, origin: GridPoint, extent: Size<i32>, blocked: bool) -> WorldResult<usize> {
        let slot = self.slot_mut()?;
        let changed = slot.map.set_static_region(origin, extent, blocked);
        slot.debug.recolor(&slot.map);
        Ok(changed)
    }

    /// Resize the grid, clamping bound agents and rebuilding the overlay.
    pub fn resize_grid(&mut self, size: Size<i32>) -> WorldResult<()> {
        self.world.resize_grid(self.id, size)
    }

    // ── Debug overlay ─────────────────────────────────────────────────────

    pub fn show(&mut self) -> WorldResult<()> {
        let slot = self.slot_mut()?;
        slot.debug.show(&slot.map, &slot.layout);
        Ok(())
    }

    pub fn hide(&mut self) -> WorldResult<()> {
        self.slot_mut()?.debug.hide();
        Ok(())
    }

    pub fn debug_visible(&self) -> WorldResult<bool> {
        Ok(self.slot()?.debug.visible())
    }

    pub fn debug_tiles(&self) -> WorldResult<&[DebugTile]> {
        Ok(self.slot()?.debug.tiles())
    }
}

// ── PathAgent ─────────────────────────────────────────────────────────────────

pub struct PathAgent<'w, P: PathPlanner> {
    world: &'w mut World<P>,
    id:    AgentId,
}

impl<P: PathPlanner> PathAgent<'_, P> {
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn agent(&self) -> WorldResult<&NavigationAgent> {
        self.world.agent(self.id)
    }

    pub fn signals(&self) -> WorldResult<&AgentSignals> {
        self.world.signals(self.id)
    }

    fn layout(&self) -> WorldResult<MapLayout> {
        let map = self.agent()?.map();
        Ok(*self.world.layout(map)?)
    }

    /// Clamp a grid-space point so a footprint of `size` anchored there
    /// lies inside `map`.
    fn clamp(map: &GridMap, point: Point, size: i32, what: &str) -> Point {
        let cell = point.cell();
        let anchor = map.clamp_anchor(cell, size);
        if anchor == cell {
            point
        } else {
            warn!("{what} {point} puts footprint {size} outside the {} grid; clamped to {anchor}", map.size());
            anchor.center()
        }
    }

    // ── Position ──────────────────────────────────────────────────────────

    pub fn grid_position(&self) -> WorldResult<Point> {
        Ok(self.agent()?.position())
    }

    pub fn local_position(&self) -> WorldResult<Point> {
        Ok(self.layout()?.local_from_grid(self.grid_position()?))
    }

    pub fn world_position(&self) -> WorldResult<Point> {
        let layout = self.layout()?;
        Ok(layout.world_from_local(layout.local_from_grid(self.grid_position()?)))
    }

    pub fn set_grid_position(&mut self, position: Point) -> WorldResult<()> {
        self.world.with_agent_map(self.id, |agent, slot| {
            let position = Self::clamp(&slot.map, position, agent.footprint_size(), "position");
            agent.set_position(&mut slot.map, position)?;
            Ok(())
        })
    }

    /// Place the agent at the centre of `cell`.
    pub fn set_grid_cell(&mut self, cell: GridPoint) -> WorldResult<()> {
        self.set_grid_position(cell.center())
    }

    pub fn set_local_position(&mut self, local: Point) -> WorldResult<()> {
        let grid = self.layout()?.grid_from_local(local);
        self.set_grid_position(grid)
    }

    // ── Goal ──────────────────────────────────────────────────────────────

    pub fn grid_goal(&self) -> WorldResult<Point> {
        Ok(self.agent()?.goal())
    }

    pub fn local_goal(&self) -> WorldResult<Point> {
        Ok(self.layout()?.local_from_grid(self.grid_goal()?))
    }

    pub fn set_grid_goal(&mut self, goal: Point, tolerance: f32) -> WorldResult<()> {
        self.world.with_agent_map(self.id, |agent, slot| {
            let goal = Self::clamp(&slot.map, goal, agent.footprint_size(), "goal");
            agent.set_goal(goal, tolerance)?;
            Ok(())
        })
    }

    /// Head for the centre of `cell`.
    pub fn set_grid_goal_cell(&mut self, cell: GridPoint, tolerance: f32) -> WorldResult<()> {
        self.set_grid_goal(cell.center(), tolerance)
    }

    /// `tolerance` is a local-space distance.
    pub fn set_local_goal(&mut self, goal: Point, tolerance: f32) -> WorldResult<()> {
        let layout = self.layout()?;
        self.set_grid_goal(layout.grid_from_local(goal), layout.grid_from_local_distance(tolerance))
    }

    // ── Speed ─────────────────────────────────────────────────────────────

    /// Grid cells per second.
    pub fn grid_speed(&self) -> WorldResult<f32> {
        Ok(self.agent()?.speed())
    }

    /// Local units per second.
    pub fn local_speed(&self) -> WorldResult<f32> {
        Ok(self.layout()?.local_from_grid_distance(self.grid_speed()?))
    }

    pub fn set_grid_speed(&mut self, speed: f32) -> WorldResult<()> {
        self.world.with_agent_map(self.id, |agent, _| Ok(agent.set_speed(speed)?))
    }

    pub fn set_local_speed(&mut self, speed: f32) -> WorldResult<()> {
        let grid = self.layout()?.grid_from_local_distance(speed);
        self.set_grid_speed(grid)
    }

    // ── Control and state ─────────────────────────────────────────────────

    pub fn pathfinding(&self) -> WorldResult<bool> {
        Ok(self.agent()?.pathfinding())
    }

    pub fn state(&self) -> WorldResult<NavState> {
        Ok(self.agent()?.state())
    }

    /// Remaining waypoints in grid space.
    pub fn path(&self) -> WorldResult<Vec<Point>> {
        Ok(self.agent()?.waypoints().collect())
    }

    /// Remaining waypoints in local space.
    pub fn local_path(&self) -> WorldResult<Vec<Point>> {
        let layout = self.layout()?;
        Ok(self.agent()?.waypoints().map(|p| layout.local_from_grid(p)).collect())
    }

    /// Halt and fire `on_stop`.
    pub fn stop(&mut self) -> WorldResult<()> {
        self.world.stop_agent(self.id)
    }

    // ── Footprint ─────────────────────────────────────────────────────────

    /// Footprint side length in cells.
    pub fn grid_size(&self) -> WorldResult<i32> {
        Ok(self.agent()?.footprint_size())
    }

    pub fn set_grid_size(&mut self, size: i32) -> WorldResult<()> {
        self.world.with_agent_map(self.id, |agent, slot| {
            agent.set_footprint_size(&mut slot.map, size)?;
            if agent.clamp_to(&mut slot.map)? {
                warn!("{} clamped after footprint resize to {size}", agent.id());
            }
            Ok(())
        })
    }

    pub fn grid_overlaps(&self, cell: GridPoint) -> WorldResult<bool> {
        Ok(self.agent()?.overlaps(cell))
    }

    pub fn local_overlaps(&self, local: Point) -> WorldResult<bool> {
        let cell = self.layout()?.cell_from_local(local);
        self.grid_overlaps(cell)
    }

    pub fn has_footprint(&self) -> WorldResult<bool> {
        Ok(self.agent()?.footprint_enabled())
    }

    pub fn enable_footprint(&mut self) -> WorldResult<()> {
        self.world
            .with_agent_map(self.id, |agent, slot| Ok(agent.enable_footprint(&mut slot.map)?))
    }

    pub fn disable_footprint(&mut self) -> WorldResult<()> {
        self.world
            .with_agent_map(self.id, |agent, slot| Ok(agent.disable_footprint(&mut slot.map)?))
    }
}
