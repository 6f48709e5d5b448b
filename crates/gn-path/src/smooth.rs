//! Line-of-sight shortcuts over a planned path.
//!
//! A* returns cell centres.  An agent standing off a centre, or heading for a
//! goal point that is not a centre, follows them more directly once every
//! waypoint a clear straight segment can skip has been dropped.
//!
//! "Clear" is tested cell by cell along the segment: the footprint anchored
//! on every cell the segment enters must be clear for the requester, using
//! the same test the planner applies to each expanded cell.  A segment that
//! passes exactly through a cell corner enters both cells beside it, which
//! matches the planner's flank rule for diagonal steps.

use gn_core::{GridPoint, Point};
use gn_grid::{Footprint, GridMap};

use crate::PathRequest;

/// Crossing parameters closer than this count as passing through a corner.
const CORNER_EPS: f32 = 1e-6;

/// Cells visited by the segment `from → to`, in travel order.
///
/// The first entry is `from.cell()` and the last is `to.cell()`.
pub fn segment_cells(from: Point, to: Point) -> Vec<GridPoint> {
    let mut cell = from.cell();
    let end = to.cell();
    let mut cells = vec![cell];

    let d = to - from;
    let (step_x, mut t_x, dt_x) = axis(from.x, d.x, cell.x);
    let (step_y, mut t_y, dt_y) = axis(from.y, d.y, cell.y);

    while cell != end {
        let open_x = cell.x != end.x;
        let open_y = cell.y != end.y;
        if open_x && open_y && (t_x - t_y).abs() <= CORNER_EPS {
            cells.push(cell.offset(step_x, 0));
            cells.push(cell.offset(0, step_y));
            cell = cell.offset(step_x, step_y);
            t_x += dt_x;
            t_y += dt_y;
        } else if open_x && (!open_y || t_x < t_y) {
            cell = cell.offset(step_x, 0);
            t_x += dt_x;
        } else {
            cell = cell.offset(0, step_y);
            t_y += dt_y;
        }
        cells.push(cell);
    }
    cells
}

/// Step direction, parameter of the first boundary crossing, and parameter
/// spacing between later crossings along one axis.
fn axis(origin: f32, delta: f32, cell: i32) -> (i32, f32, f32) {
    if delta > 0.0 {
        (1, (cell as f32 + 1.0 - origin) / delta, 1.0 / delta)
    } else if delta < 0.0 {
        (-1, (cell as f32 - origin) / delta, -1.0 / delta)
    } else {
        (0, f32::INFINITY, f32::INFINITY)
    }
}

/// `true` if a body can slide straight from `from` to `to`.
///
/// The cell under `from` is not tested; the body is already there.
pub fn line_clear(map: &GridMap, from: Point, to: Point, request: &PathRequest<'_>) -> bool {
    segment_cells(from, to).into_iter().skip(1).all(|cell| {
        map.footprint_clear(&Footprint::centered(cell, request.footprint), request.own, request.blocking)
    })
}

/// Drop every waypoint that a clear straight segment can skip.
///
/// `from` is the body's current position.  The last waypoint is always kept.
/// On a map without corners only axis-aligned shortcuts are taken.
pub fn smooth(map: &GridMap, from: Point, waypoints: &[Point], request: &PathRequest<'_>) -> Vec<Point> {
    let mut out = Vec::with_capacity(waypoints.len());
    let mut anchor = from;
    let mut i = 0;
    while i < waypoints.len() {
        let furthest = ((i + 1)..waypoints.len())
            .rev()
            .find(|&j| shortcut(map, anchor, waypoints[j], request))
            .unwrap_or(i);
        out.push(waypoints[furthest]);
        anchor = waypoints[furthest];
        i = furthest + 1;
    }
    out
}

fn shortcut(map: &GridMap, from: Point, to: Point, request: &PathRequest<'_>) -> bool {
    (map.corners() || from.x == to.x || from.y == to.y) && line_clear(map, from, to, request)
}
