//! The navigation agent.
//!
//! # Per-tick update
//!
//! [`NavigationAgent::update`] runs, in order:
//!
//! 1. **Footprint sync.**  Reserve the cells under the current position if
//!    they differ from what the agent holds.
//! 2. **Arrival check.**  Already within tolerance → `Arrived`.
//! 3. **Path validation.**  Search when there is no path, or when a cell
//!    crossed by the remaining path is no longer enterable for this agent's
//!    footprint.  A found path is shortcut by line of sight from the current
//!    position.  A failed search moves the agent to `Blocked`.
//! 4. **Motion.**  Spend `speed × dt` along the waypoints, halting before a
//!    stretch that crosses a cell that became occupied (the next update
//!    replans).
//! 5. **Footprint sync** at the new position.
//!
//! Events produced along the way are returned in the order they happened.

use std::collections::VecDeque;

use log::{debug, trace};

use gn_core::{AgentId, GridPoint, MapId, Point, SimConfig};
use gn_grid::{Blocking, Footprint, GridMap};
use gn_path::{PathPlanner, PathRequest, line_clear, smooth};

use crate::motion::advance;
use crate::{AgentError, AgentEvent, AgentResult, NavState};

pub const DEFAULT_SPEED: f32 = 1.0;

// ── AgentRecord ───────────────────────────────────────────────────────────────

/// The persisted subset of an agent.  Path, state and tolerance are not
/// stored; a restored agent resumes pursuit if it is away from its goal.
/// Stopping and arriving both move the goal onto the position, so only an
/// agent that was still pursuing is restored as pursuing.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRecord {
    pub map:               MapId,
    pub position:          Point,
    pub goal:              Point,
    pub speed:             f32,
    pub footprint_size:    i32,
    pub footprint_enabled: bool,
}

// ── NavigationAgent ───────────────────────────────────────────────────────────

/// One body with a square footprint, travelling over a single `GridMap`.
///
/// Positions are in grid units: `(3.5, 3.5)` is the centre of cell `(3, 3)`.
#[derive(Debug)]
pub struct NavigationAgent {
    id:                AgentId,
    map:               MapId,
    position:          Point,
    goal:              Point,
    tolerance:         f32,
    speed:             f32,
    footprint_size:    i32,
    footprint_enabled: bool,
    pathfinding:       bool,
    state:             NavState,
    waypoints:         VecDeque<Point>,
    /// Cells this agent currently holds one reservation on.
    reserved:          Vec<GridPoint>,
}

impl NavigationAgent {
    /// Place a new idle agent at `position` and reserve its footprint.
    pub fn new(
        id:             AgentId,
        map_id:         MapId,
        map:            &mut GridMap,
        position:       Point,
        footprint_size: i32,
    ) -> AgentResult<Self> {
        if footprint_size < 1 {
            return Err(AgentError::InvalidFootprint(footprint_size));
        }
        if !position.is_finite() {
            return Err(AgentError::InvalidPosition(position));
        }
        let mut agent = Self {
            id,
            map: map_id,
            position,
            goal: position,
            tolerance: 0.0,
            speed: DEFAULT_SPEED,
            footprint_size,
            footprint_enabled: true,
            pathfinding: false,
            state: NavState::Idle,
            waypoints: VecDeque::new(),
            reserved: Vec::new(),
        };
        agent.sync_footprint(map)?;
        Ok(agent)
    }

    /// Rebuild an agent from a persisted record.
    pub fn from_record(
        id:      AgentId,
        record:  &AgentRecord,
        map:     &mut GridMap,
        epsilon: f32,
    ) -> AgentResult<Self> {
        Self::validate_speed(record.speed)?;
        if !record.goal.is_finite() {
            return Err(AgentError::InvalidPosition(record.goal));
        }
        let mut agent = Self::new(id, record.map, map, record.position, record.footprint_size)?;
        agent.speed = record.speed;
        agent.goal = record.goal;
        agent.pathfinding = record.position.distance(record.goal) > epsilon;
        if !record.footprint_enabled {
            agent.disable_footprint(map)?;
        }
        Ok(agent)
    }

    pub fn record(&self) -> AgentRecord {
        AgentRecord {
            map:               self.map,
            position:          self.position,
            goal:              self.goal,
            speed:             self.speed,
            footprint_size:    self.footprint_size,
            footprint_enabled: self.footprint_enabled,
        }
    }

    /// A copy of this agent on the same map, under `id`.
    ///
    /// The copy gets its own reservation and an empty path.  If this agent
    /// was pursuing a goal the copy pursues it too, starting from `Idle` so
    /// its first successful search reports `Start`.
    pub fn clone_as(&self, id: AgentId, map: &mut GridMap) -> AgentResult<Self> {
        let mut copy = Self {
            id,
            map:               self.map,
            position:          self.position,
            goal:              self.goal,
            tolerance:         self.tolerance,
            speed:             self.speed,
            footprint_size:    self.footprint_size,
            footprint_enabled: self.footprint_enabled,
            pathfinding:       self.pathfinding,
            state:             NavState::Idle,
            waypoints:         VecDeque::new(),
            reserved:          Vec::new(),
        };
        copy.sync_footprint(map)?;
        Ok(copy)
    }

    /// Release every reservation.  Call once when the agent is destroyed.
    pub fn retire(mut self, map: &mut GridMap) -> AgentResult<()> {
        for cell in self.reserved.drain(..) {
            map.release(cell)?;
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The map this agent is bound to.
    #[inline]
    pub fn map(&self) -> MapId {
        self.map
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Grid units per second.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn footprint_size(&self) -> i32 {
        self.footprint_size
    }

    #[inline]
    pub fn footprint_enabled(&self) -> bool {
        self.footprint_enabled
    }

    /// `true` while the agent is pursuing a goal.
    #[inline]
    pub fn pathfinding(&self) -> bool {
        self.pathfinding
    }

    #[inline]
    pub fn state(&self) -> NavState {
        self.state
    }

    /// Remaining waypoints; the last one is the goal point itself.
    pub fn waypoints(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.waypoints.iter().copied()
    }

    pub fn reserved_cells(&self) -> &[GridPoint] {
        &self.reserved
    }

    /// The footprint at the current position, whether or not it is enabled.
    pub fn footprint(&self) -> Footprint {
        Footprint::at(self.position, self.footprint_size)
    }

    /// `true` if the footprint at the current position covers `cell`.
    pub fn overlaps(&self, cell: GridPoint) -> bool {
        self.footprint().contains(cell)
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Teleport to `position`.  Any path in progress is discarded and
    /// recomputed on the next update.
    pub fn set_position(&mut self, map: &mut GridMap, position: Point) -> AgentResult<()> {
        if !position.is_finite() {
            return Err(AgentError::InvalidPosition(position));
        }
        self.position = position;
        self.waypoints.clear();
        self.sync_footprint(map)
    }

    /// Start pursuing `goal`; arrival counts within `tolerance`.
    ///
    /// A goal change while `Seeking` keeps the state (no new `Start`); from
    /// any other state the agent restarts from `Idle`, so both `Start` and
    /// `Blocked` can fire again for the new goal.
    pub fn set_goal(&mut self, goal: Point, tolerance: f32) -> AgentResult<()> {
        if !goal.is_finite() {
            return Err(AgentError::InvalidPosition(goal));
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(AgentError::InvalidTolerance(tolerance));
        }
        self.goal = goal;
        self.tolerance = tolerance;
        self.waypoints.clear();
        self.pathfinding = true;
        if self.state != NavState::Seeking {
            self.state = NavState::Idle;
        }
        trace!("{} goal set to {goal} (tolerance {tolerance})", self.id);
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f32) -> AgentResult<()> {
        Self::validate_speed(speed)?;
        self.speed = speed;
        Ok(())
    }

    fn validate_speed(speed: f32) -> AgentResult<()> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(AgentError::InvalidSpeed(speed));
        }
        Ok(())
    }

    /// Abandon the current goal.  Always reports `Stop`.
    ///
    /// The goal collapses onto the current position.
    pub fn stop(&mut self) -> AgentEvent {
        self.pathfinding = false;
        self.goal = self.position;
        self.waypoints.clear();
        self.state = NavState::Idle;
        debug!("{} stopped at {}", self.id, self.position);
        AgentEvent::Stop
    }

    /// Start occupying cells again.
    pub fn enable_footprint(&mut self, map: &mut GridMap) -> AgentResult<()> {
        self.footprint_enabled = true;
        self.sync_footprint(map)
    }

    /// Stop occupying cells: the agent becomes invisible to other agents'
    /// searches and releases everything it holds.
    pub fn disable_footprint(&mut self, map: &mut GridMap) -> AgentResult<()> {
        self.footprint_enabled = false;
        self.sync_footprint(map)
    }

    /// Change the footprint side length and re-reserve.
    pub fn set_footprint_size(&mut self, map: &mut GridMap, size: i32) -> AgentResult<()> {
        if size < 1 {
            return Err(AgentError::InvalidFootprint(size));
        }
        self.footprint_size = size;
        self.waypoints.clear();
        self.sync_footprint(map)
    }

    /// Forget reserved cells that no longer exist after `map` shrank, and
    /// drop the path.  The map has already discarded those reservations.
    pub fn prune_reserved_outside(&mut self, map: &GridMap) {
        self.reserved.retain(|c| map.in_bounds(*c));
        self.waypoints.clear();
    }

    /// Pull the position back so the footprint lies inside `map`.  Returns
    /// `true` if the agent moved.
    pub fn clamp_to(&mut self, map: &mut GridMap) -> AgentResult<bool> {
        let cell = self.position.cell();
        let anchor = map.clamp_anchor(cell, self.footprint_size);
        if anchor == cell {
            return Ok(false);
        }
        debug!("{} clamped from {} to {anchor}", self.id, self.position);
        self.set_position(map, anchor.center())?;
        Ok(true)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance by `dt` seconds.  See the module docs for the phase order.
    pub fn update<P: PathPlanner + ?Sized>(
        &mut self,
        dt:      f32,
        map:     &mut GridMap,
        planner: &P,
        config:  &SimConfig,
    ) -> AgentResult<Vec<AgentEvent>> {
        let mut events = Vec::new();
        self.sync_footprint(map)?;
        if !self.pathfinding {
            return Ok(events);
        }

        let epsilon = config.arrival_epsilon;
        if self.position.distance(self.goal) <= self.tolerance + epsilon {
            self.arrive(&mut events);
            return Ok(events);
        }

        let blocking = self.blocking(config);
        if self.waypoints.is_empty() || !self.remaining_path_clear(map, blocking) {
            if !self.replan(map, planner, blocking, &mut events) {
                return Ok(events);
            }
        }

        let grid: &GridMap = map;
        let request = PathRequest::new(self.position.cell(), self.goal.cell(), self.footprint_size, &self.reserved)
            .with_blocking(blocking);
        let step = advance(
            self.position,
            &mut self.waypoints,
            self.goal,
            self.tolerance,
            self.speed * dt,
            epsilon,
            |from, to| line_clear(grid, from, to, &request),
        );
        self.position = step.position;
        if step.halted {
            trace!("{} halted at {}: next cell occupied", self.id, self.position);
            self.waypoints.clear();
        }
        if step.arrived {
            self.arrive(&mut events);
        }

        self.sync_footprint(map)?;
        Ok(events)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn blocking(&self, config: &SimConfig) -> Blocking {
        if self.footprint_enabled || config.ghosts_respect_reservations {
            Blocking::StaticAndDynamic
        } else {
            Blocking::StaticOnly
        }
    }

    fn request(&self, blocking: Blocking) -> PathRequest<'_> {
        PathRequest::new(self.position.cell(), self.goal.cell(), self.footprint_size, &self.reserved)
            .with_blocking(blocking)
    }

    /// Every leg from the current position through the queued waypoints.
    fn remaining_path_clear(&self, map: &GridMap, blocking: Blocking) -> bool {
        let request = self.request(blocking);
        let mut from = self.position;
        self.waypoints.iter().all(|&wp| {
            let clear = line_clear(map, from, wp, &request);
            from = wp;
            clear
        })
    }

    /// Search from the current cell to the goal cell.  Returns `false` when
    /// the goal is unreachable.
    fn replan<P: PathPlanner + ?Sized>(
        &mut self,
        map:      &GridMap,
        planner:  &P,
        blocking: Blocking,
        events:   &mut Vec<AgentEvent>,
    ) -> bool {
        let request = self.request(blocking);
        let planned = planner.find_path(map, &request).map(|path| {
            let mut raw: Vec<Point> = path.waypoints().collect();
            raw.pop();
            raw.push(self.goal);
            let waypoints = smooth(map, self.position, &raw, &request);
            trace!(
                "{} planned {} cells, {} waypoints after shortcuts (cost {:.2})",
                self.id, raw.len(), waypoints.len(), path.cost
            );
            waypoints
        });

        match planned {
            Some(waypoints) => {
                self.waypoints = waypoints.into();
                if self.state != NavState::Seeking {
                    debug!("{} {} -> seeking", self.id, self.state);
                    self.state = NavState::Seeking;
                    events.push(AgentEvent::Start);
                }
                true
            }
            None => {
                self.waypoints.clear();
                if self.state != NavState::Blocked {
                    debug!("{} {} -> blocked: no path to {}", self.id, self.state, self.goal);
                    self.state = NavState::Blocked;
                    events.push(AgentEvent::Blocked);
                }
                false
            }
        }
    }

    /// A stop inside the tolerance ring becomes the new goal.
    fn arrive(&mut self, events: &mut Vec<AgentEvent>) {
        debug!("{} arrived at {} (goal {})", self.id, self.position, self.goal);
        self.goal = self.position;
        self.pathfinding = false;
        self.waypoints.clear();
        self.state = NavState::Arrived;
        events.push(AgentEvent::Arrive);
    }

    /// Make `reserved` equal the in-bounds cells of the current footprint
    /// (or nothing when the footprint is disabled), touching only the cells
    /// that changed.
    fn sync_footprint(&mut self, map: &mut GridMap) -> AgentResult<()> {
        let wanted: Vec<GridPoint> = if self.footprint_enabled {
            self.footprint().cells().filter(|c| map.in_bounds(*c)).collect()
        } else {
            Vec::new()
        };
        if wanted == self.reserved {
            return Ok(());
        }
        for cell in self.reserved.iter().filter(|c| !wanted.contains(c)) {
            map.release(*cell)?;
        }
        for cell in wanted.iter().filter(|c| !self.reserved.contains(c)) {
            map.reserve(*cell)?;
        }
        self.reserved = wanted;
        Ok(())
    }
}
