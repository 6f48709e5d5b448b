//! Search result type.

use gn_core::{GridPoint, Point};

/// The result of a successful search: the cells to visit in order, from the
/// first step after `start` up to and including `goal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Cell the search started from (not repeated in `cells`).
    pub start: GridPoint,
    /// Cells to traverse in order; empty when `start == goal`.
    pub cells: Vec<GridPoint>,
    /// Total step cost: 1 per orthogonal step, √2 per diagonal step.
    pub cost: f32,
    /// Number of nodes expanded by the search.
    pub expanded: usize,
}

impl Path {
    /// `true` if the start already is the goal.
    pub fn is_trivial(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The last cell of the path (the start for a trivial path).
    pub fn goal(&self) -> GridPoint {
        self.cells.last().copied().unwrap_or(self.start)
    }

    /// Cell centres of every step, in grid space.
    pub fn waypoints(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().map(|c| c.center())
    }

    /// Consecutive `(from, to)` cell pairs, starting at `start`.
    pub fn steps(&self) -> impl Iterator<Item = (GridPoint, GridPoint)> + '_ {
        std::iter::once(self.start)
            .chain(self.cells.iter().copied())
            .zip(self.cells.iter().copied())
    }
}
