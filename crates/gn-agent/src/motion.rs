//! Budgeted travel along a waypoint queue.
//!
//! Motion is straight-line between consecutive waypoints.  Whatever distance
//! is left over after reaching a waypoint carries into the next leg within
//! the same tick, so an agent moving at `speed` always covers
//! `speed × dt` per tick until it arrives or is halted.

use std::collections::VecDeque;

use gn_core::Point;

/// Outcome of one [`advance`] call.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Advance {
    pub position:  Point,
    /// Distance actually covered.
    pub travelled: f32,
    /// The goal is within tolerance of `position`.
    pub arrived:   bool,
    /// Motion stopped early because the next stretch crossed a cell that
    /// could not be entered.  The queue is left untouched.
    pub halted:    bool,
}

/// Move from `position` along `waypoints` by at most `budget`.
///
/// Reached waypoints are popped.  Before each stretch that leaves the current
/// cell, `can_travel(from, to)` is asked about exactly the stretch about to be
/// covered; on the final leg the agent stops as soon as it is within
/// `tolerance` of `goal`.
pub fn advance(
    position:       Point,
    waypoints:      &mut VecDeque<Point>,
    goal:           Point,
    tolerance:      f32,
    budget:         f32,
    epsilon:        f32,
    mut can_travel: impl FnMut(Point, Point) -> bool,
) -> Advance {
    let mut pos       = position;
    let mut left      = budget.max(0.0);
    let mut travelled = 0.0;
    let mut halted    = false;

    loop {
        if pos.distance(goal) <= tolerance + epsilon {
            return Advance { position: pos, travelled, arrived: true, halted };
        }
        let Some(&target) = waypoints.front() else { break };
        if left <= 0.0 {
            break;
        }
        let to     = target - pos;
        let dist   = to.length();
        let last   = waypoints.len() == 1;
        let wanted = if last { (dist - tolerance).max(0.0) } else { dist };
        let reach  = wanted <= left + epsilon;

        let (end, covered, popped) = match (reach, wanted < dist) {
            (true, false) => (target, wanted, true),
            // Final leg, stopping at the tolerance ring.
            (true, true)  => (pos + to * (wanted / dist), wanted, false),
            (false, _)    => (pos + to * (left / dist), left, false),
        };
        if end.cell() != pos.cell() && !can_travel(pos, end) {
            halted = true;
            break;
        }

        if popped {
            waypoints.pop_front();
        }
        pos        = end;
        left      -= covered;
        travelled += covered;
    }

    Advance { position: pos, travelled, arrived: false, halted }
}
