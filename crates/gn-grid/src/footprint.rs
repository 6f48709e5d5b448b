//! The square block of cells an agent body covers.

use gn_core::{GridPoint, Point, Size};

/// A `size × size` block of cells, stored by its top-left cell.
///
/// Footprints are anchored on the cell that contains the body's position:
/// for odd sizes the block extends `(size-1)/2` cells on every side; even
/// sizes extend one cell further right and down than left and up.  Agents
/// and the planner use the same anchoring, so a cell the planner accepted is
/// exactly the block the agent reserves when it stands there.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub origin: GridPoint,
    pub size:   i32,
}

impl Footprint {
    /// Footprint of a body of side `size` anchored on `cell`.
    #[inline]
    pub fn centered(cell: GridPoint, size: i32) -> Self {
        let back = (size - 1).max(0) / 2;
        Self { origin: cell.offset(-back, -back), size }
    }

    /// Footprint of a body of side `size` at continuous `position`.
    #[inline]
    pub fn at(position: Point, size: i32) -> Self {
        Self::centered(position.cell(), size)
    }

    /// Every covered cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let o = self.origin;
        let s = self.size.max(0);
        (0..s).flat_map(move |dy| (0..s).map(move |dx| o.offset(dx, dy)))
    }

    pub fn contains(&self, cell: GridPoint) -> bool {
        cell.x >= self.origin.x
            && cell.y >= self.origin.y
            && cell.x < self.origin.x + self.size
            && cell.y < self.origin.y + self.size
    }

    /// `true` if every covered cell lies inside a grid of `grid` size.
    pub fn within(&self, grid: Size<i32>) -> bool {
        self.origin.x >= 0
            && self.origin.y >= 0
            && self.origin.x + self.size <= grid.width
            && self.origin.y + self.size <= grid.height
    }
}
