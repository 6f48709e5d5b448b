//! Planner trait and the default footprint-aware A* implementation.
//!
//! # Pluggability
//!
//! Agents call search through the [`PathPlanner`] trait, so applications can
//! swap in a different search (jump-point search, cached hierarchies) without
//! touching the agent code.  The default [`AStarPlanner`] is sufficient for
//! grids of a few hundred cells per side.
//!
//! # Costs
//!
//! Orthogonal steps cost 1, diagonal steps cost √2.  The heuristic is octile
//! distance when the map allows corners and Manhattan distance otherwise;
//! both are admissible, so returned paths are shortest.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use log::{debug, trace};

use gn_core::GridPoint;
use gn_grid::{Blocking, Footprint, GridMap};

use crate::Path;

// ── Request ───────────────────────────────────────────────────────────────────

/// One search query.
#[derive(Debug, Clone, Copy)]
pub struct PathRequest<'a> {
    pub start:     GridPoint,
    pub goal:      GridPoint,
    /// Side length of the searching agent's square footprint.
    pub footprint: i32,
    /// Cells currently reserved by the searching agent; not obstacles to it.
    pub own:       &'a [GridPoint],
    /// Whether other agents' reservations count as obstacles.
    pub blocking:  Blocking,
}

impl<'a> PathRequest<'a> {
    /// A request that treats every reservation except `own` as an obstacle.
    pub fn new(start: GridPoint, goal: GridPoint, footprint: i32, own: &'a [GridPoint]) -> Self {
        Self { start, goal, footprint, own, blocking: Blocking::StaticAndDynamic }
    }

    pub fn with_blocking(mut self, blocking: Blocking) -> Self {
        self.blocking = blocking;
        self
    }
}

// ── PathPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable search engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one planner can be shared by
/// every world in a process.  The engine itself only ever calls it from the
/// simulation thread.
pub trait PathPlanner: Send + Sync {
    /// Search from `request.start` to `request.goal`.
    ///
    /// Returns `None` when the goal is unreachable for the footprint,
    /// including when either endpoint is outside the map.
    fn find_path(&self, map: &GridMap, request: &PathRequest<'_>) -> Option<Path>;
}

/// Search with the default [`AStarPlanner`].
pub fn find_path(
    map:       &GridMap,
    footprint: i32,
    start:     GridPoint,
    goal:      GridPoint,
    own:       &[GridPoint],
) -> Option<Path> {
    AStarPlanner::default().find_path(map, &PathRequest::new(start, goal, footprint, own))
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// A* over 4- or 8-connected cells with a square-footprint clearance test.
///
/// A cell is expandable when every cell of the footprint centred on it is in
/// bounds and not blocked for the searching agent.  A diagonal step is only
/// expanded when both orthogonal cells it passes between are expandable, so
/// a path never slips through a blocked corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner {
    /// Give up after expanding this many nodes.  `None` searches the whole
    /// reachable area.
    pub max_expansions: Option<usize>,
}

impl AStarPlanner {
    pub fn with_limit(max_expansions: usize) -> Self {
        Self { max_expansions: Some(max_expansions) }
    }
}

impl PathPlanner for AStarPlanner {
    fn find_path(&self, map: &GridMap, request: &PathRequest<'_>) -> Option<Path> {
        trace!(
            "[AStar] find_path: start={} goal={} footprint={}",
            request.start, request.goal, request.footprint
        );
        astar(map, request, self.max_expansions)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Open-set entry.  The "greatest" entry is the best one to expand next:
/// lowest f, then lowest h (closest to the goal), then lowest cell index
/// (upper rows first, then left columns).
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f:     f32,
    h:     f32,
    index: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lazily evaluated per-cell clearance for the request's footprint.
struct Clearance<'m, 'r> {
    map:     &'m GridMap,
    request: &'r PathRequest<'r>,
    cache:   Vec<Option<bool>>,
}

impl Clearance<'_, '_> {
    fn clear(&mut self, cell: GridPoint) -> bool {
        if !self.map.in_bounds(cell) {
            return false;
        }
        let i = cell_index(self.map, cell);
        if let Some(known) = self.cache[i] {
            return known;
        }
        let footprint = Footprint::centered(cell, self.request.footprint);
        let clear = self.map.footprint_clear(&footprint, self.request.own, self.request.blocking);
        self.cache[i] = Some(clear);
        clear
    }
}

#[inline]
fn cell_index(map: &GridMap, cell: GridPoint) -> usize {
    (cell.y * map.width() + cell.x) as usize
}

#[inline]
fn cell_at(map: &GridMap, index: usize) -> GridPoint {
    GridPoint::new(index as i32 % map.width(), index as i32 / map.width())
}

fn heuristic(from: GridPoint, to: GridPoint, corners: bool) -> f32 {
    let dx = (from.x - to.x).abs() as f32;
    let dy = (from.y - to.y).abs() as f32;
    if corners {
        let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
        lo * SQRT_2 + (hi - lo)
    } else {
        dx + dy
    }
}

fn astar(map: &GridMap, request: &PathRequest<'_>, limit: Option<usize>) -> Option<Path> {
    let (start, goal) = (request.start, request.goal);

    if request.footprint < 1 || !map.in_bounds(start) || !map.in_bounds(goal) {
        debug!("[AStar] no path: endpoint outside map or invalid footprint ({start} -> {goal})");
        return None;
    }
    if start == goal {
        return Some(Path { start, cells: vec![], cost: 0.0, expanded: 0 });
    }

    let corners = map.corners();
    let n = map.size().area();
    let mut clearance = Clearance { map, request, cache: vec![None; n] };

    if !clearance.clear(goal) {
        debug!("[AStar] no path: goal {goal} not clear for footprint {}", request.footprint);
        return None;
    }

    // g[i] = best known cost to reach cell i; came_from[i] = predecessor index.
    let mut g         = vec![f32::INFINITY; n];
    let mut came_from = vec![usize::MAX; n];
    let mut closed    = vec![false; n];
    let mut open      = BinaryHeap::new();

    let start_i = cell_index(map, start);
    let goal_i  = cell_index(map, goal);
    g[start_i] = 0.0;
    let h0 = heuristic(start, goal, corners);
    open.push(OpenNode { f: h0, h: h0, index: start_i });

    let mut expanded = 0usize;

    while let Some(OpenNode { index, .. }) = open.pop() {
        if closed[index] {
            continue;
        }
        if index == goal_i {
            return Some(reconstruct(map, &came_from, start, goal_i, g[goal_i], expanded));
        }
        closed[index] = true;
        expanded += 1;
        if limit.is_some_and(|max| expanded > max) {
            debug!("[AStar] no path: expansion limit reached after {expanded} nodes");
            return None;
        }

        let cell = cell_at(map, index);

        for (dx, dy) in GridPoint::ORTHOGONAL {
            let next = cell.offset(dx, dy);
            if clearance.clear(next) {
                relax(map, &mut g, &mut came_from, &closed, &mut open, index, next, 1.0, goal, corners);
            }
        }

        if corners {
            for (dx, dy) in GridPoint::DIAGONAL {
                let next = cell.offset(dx, dy);
                let flank_x = cell.offset(dx, 0);
                let flank_y = cell.offset(0, dy);
                if clearance.clear(flank_x) && clearance.clear(flank_y) && clearance.clear(next) {
                    relax(map, &mut g, &mut came_from, &closed, &mut open, index, next, SQRT_2, goal, corners);
                }
            }
        }
    }

    debug!("[AStar] no path: {start} -> {goal} after expanding {expanded} nodes");
    None
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn relax(
    map:       &GridMap,
    g:         &mut [f32],
    came_from: &mut [usize],
    closed:    &[bool],
    open:      &mut BinaryHeap<OpenNode>,
    from:      usize,
    next:      GridPoint,
    step:      f32,
    goal:      GridPoint,
    corners:   bool,
) {
    let i = cell_index(map, next);
    if closed[i] {
        return;
    }
    let tentative = g[from] + step;
    if tentative < g[i] {
        g[i] = tentative;
        came_from[i] = from;
        let h = heuristic(next, goal, corners);
        open.push(OpenNode { f: tentative + h, h, index: i });
    }
}

fn reconstruct(
    map:       &GridMap,
    came_from: &[usize],
    start:     GridPoint,
    goal:      usize,
    cost:      f32,
    expanded:  usize,
) -> Path {
    let mut cells = Vec::new();
    let mut cur = goal;
    while came_from[cur] != usize::MAX {
        cells.push(cell_at(map, cur));
        cur = came_from[cur];
    }
    cells.reverse();
    Path { start, cells, cost, expanded }
}
