//! The occupancy grid.
//!
//! # Data layout
//!
//! Cells are stored row-major in a single `Vec<MapCell>`:
//!
//! ```text
//! index(x, y) = y * width + x
//! ```
//!
//! The planner's inner loop is a bounds check plus one indexed load per
//! footprint cell, so the grid stays a flat array rather than a map of
//! occupied cells.

use gn_core::{GridPoint, Size};

use crate::{Footprint, GridError, GridResult};

// ── MapCell ───────────────────────────────────────────────────────────────────

/// Per-cell occupancy record.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapCell {
    /// Permanent, map-authored obstacle.
    pub static_blocked: bool,
    /// Number of agent footprints currently covering this cell.
    pub reservations: u32,
}

impl MapCell {
    /// Static obstacle or at least one reservation.
    #[inline]
    pub fn blocked(&self) -> bool {
        self.static_blocked || self.reservations > 0
    }
}

/// Which kinds of occupancy count as obstacles for a query.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Blocking {
    /// Only map-authored obstacles block.
    StaticOnly,
    /// Static obstacles and other agents' reservations block.
    #[default]
    StaticAndDynamic,
}

// ── GridMap ───────────────────────────────────────────────────────────────────

/// A `width × height` occupancy grid shared by every agent bound to it.
///
/// Cloning is deliberately not derived: copying reservation counts would
/// break the reserve/release pairing of the agents on the source map.  Use
/// [`GridMap::clone_static`] for an agent-free copy.
#[derive(Debug)]
pub struct GridMap {
    size:    Size<i32>,
    cells:   Vec<MapCell>,
    corners: bool,
}

impl GridMap {
    /// An open grid of `size` cells.  `corners` enables diagonal travel.
    pub fn new(size: Size<i32>, corners: bool) -> GridResult<Self> {
        if size.area() == 0 {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![MapCell::default(); size.area()],
            corners,
        })
    }

    /// Same dimensions, obstacles and corner policy; no reservations.
    pub fn clone_static(&self) -> Self {
        Self {
            size:    self.size,
            cells:   self
                .cells
                .iter()
                .map(|c| MapCell { static_blocked: c.static_blocked, reservations: 0 })
                .collect(),
            corners: self.corners,
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn size(&self) -> Size<i32> {
        self.size
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Reallocate to `new_size`.
    ///
    /// Static obstacles and reservations inside the overlap of the old and new
    /// bounds are kept; new cells start open.  Reservations that fall outside
    /// are discarded, so agents bound to this map must prune their reserved
    /// cells afterwards.
    pub fn resize(&mut self, new_size: Size<i32>) -> GridResult<()> {
        if new_size.area() == 0 {
            return Err(GridError::InvalidSize(new_size));
        }
        let mut cells = vec![MapCell::default(); new_size.area()];
        let keep_w = self.size.width.min(new_size.width);
        let keep_h = self.size.height.min(new_size.height);
        for y in 0..keep_h {
            for x in 0..keep_w {
                let old = (y * self.size.width + x) as usize;
                let new = (y * new_size.width + x) as usize;
                cells[new] = self.cells[old];
            }
        }
        self.cells = cells;
        self.size = new_size;
        Ok(())
    }

    // ── Corner policy ─────────────────────────────────────────────────────

    /// Whether diagonal moves are allowed.
    #[inline]
    pub fn corners(&self) -> bool {
        self.corners
    }

    pub fn set_corners(&mut self, corners: bool) {
        self.corners = corners;
    }

    // ── Cell access ───────────────────────────────────────────────────────

    #[inline]
    pub fn in_bounds(&self, cell: GridPoint) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size.width && cell.y < self.size.height
    }

    #[inline]
    fn index(&self, cell: GridPoint) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.size.width + cell.x) as usize)
    }

    fn out_of_range(&self, cell: GridPoint) -> GridError {
        GridError::OutOfRange { cell, size: self.size }
    }

    /// The occupancy record of `cell`.
    pub fn get(&self, cell: GridPoint) -> GridResult<&MapCell> {
        self.index(cell)
            .map(|i| &self.cells[i])
            .ok_or_else(|| self.out_of_range(cell))
    }

    /// Static obstacle or any reservation.  Out-of-bounds cells are blocked.
    #[inline]
    pub fn blocked(&self, cell: GridPoint) -> bool {
        self.index(cell).is_none_or(|i| self.cells[i].blocked())
    }

    /// Static obstacle only; ignores reservations.  Out-of-bounds cells are
    /// blocked.
    #[inline]
    pub fn statically_blocked(&self, cell: GridPoint) -> bool {
        self.index(cell).is_none_or(|i| self.cells[i].static_blocked)
    }

    /// Current reservation count of `cell` (0 outside the grid).
    #[inline]
    pub fn reservations(&self, cell: GridPoint) -> u32 {
        self.index(cell).map_or(0, |i| self.cells[i].reservations)
    }

    /// Blocked from the point of view of an agent that itself holds
    /// reservations on `own`.
    pub fn blocked_for(&self, cell: GridPoint, own: &[GridPoint], blocking: Blocking) -> bool {
        let Some(i) = self.index(cell) else {
            return true;
        };
        let c = &self.cells[i];
        if c.static_blocked {
            return true;
        }
        match blocking {
            Blocking::StaticOnly => false,
            Blocking::StaticAndDynamic => {
                let mine = own.iter().filter(|&&o| o == cell).count() as u32;
                c.reservations > mine
            }
        }
    }

    /// The cell nearest to `cell` on which a footprint of side `size` lies
    /// entirely inside the grid.  Footprints wider than the grid are pinned
    /// to the top-left.
    pub fn clamp_anchor(&self, cell: GridPoint, size: i32) -> GridPoint {
        let back = (size - 1).max(0) / 2;
        let clamp = |v: i32, extent: i32| v.clamp(back, (extent - size + back).max(back));
        GridPoint::new(clamp(cell.x, self.size.width), clamp(cell.y, self.size.height))
    }

    /// `true` if every cell of `footprint` is in bounds and not blocked for
    /// the agent holding `own`.
    pub fn footprint_clear(&self, footprint: &Footprint, own: &[GridPoint], blocking: Blocking) -> bool {
        footprint.within(self.size)
            && footprint.cells().all(|c| !self.blocked_for(c, own, blocking))
    }

    // ── Authoring ─────────────────────────────────────────────────────────

    pub fn set_static_blocked(&mut self, cell: GridPoint, blocked: bool) -> GridResult<()> {
        let i = self.index(cell).ok_or_else(|| self.out_of_range(cell))?;
        self.cells[i].static_blocked = blocked;
        Ok(())
    }

    /// Set the static flag on every in-bounds cell of the rectangle starting
    /// at `origin`.  Returns the number of cells changed.
    pub fn set_static_region(&mut self, origin: GridPoint, extent: Size<i32>, blocked: bool) -> usize {
        let mut changed = 0;
        for y in origin.y..origin.y + extent.height {
            for x in origin.x..origin.x + extent.width {
                if let Some(i) = self.index(GridPoint::new(x, y)) {
                    if self.cells[i].static_blocked != blocked {
                        self.cells[i].static_blocked = blocked;
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// All statically blocked cells in row-major order.
    pub fn static_cells(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let w = self.size.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.static_blocked)
            .map(move |(i, _)| GridPoint::new(i as i32 % w, i as i32 / w))
    }

    // ── Reservations ──────────────────────────────────────────────────────

    /// Add one footprint reservation to `cell`.
    pub fn reserve(&mut self, cell: GridPoint) -> GridResult<()> {
        let i = self.index(cell).ok_or_else(|| self.out_of_range(cell))?;
        self.cells[i].reservations += 1;
        Ok(())
    }

    /// Remove one footprint reservation from `cell`.
    ///
    /// Releasing a cell with no reservation is a bookkeeping bug in the
    /// caller: debug builds panic, release builds report
    /// [`GridError::ReservationMismatch`] and leave the count at zero.
    pub fn release(&mut self, cell: GridPoint) -> GridResult<()> {
        let i = self.index(cell).ok_or_else(|| self.out_of_range(cell))?;
        let count = &mut self.cells[i].reservations;
        debug_assert!(*count > 0, "release of unreserved cell {cell}");
        if *count == 0 {
            return Err(GridError::ReservationMismatch(cell));
        }
        *count -= 1;
        Ok(())
    }

    /// Sum of all reservation counts.
    pub fn total_reservations(&self) -> u64 {
        self.cells.iter().map(|c| c.reservations as u64).sum()
    }
}
