//! Grid ↔ local ↔ world coordinate arithmetic.
//!
//! ```text
//! local = grid × cell_size + offset
//! world = local + origin
//! ```
//!
//! `offset` is the local-space position of the grid's top-left corner and
//! `origin` is the translation of the map's local space inside the world.
//! Scalar distances (speeds, tolerances) scale by the mean of the cell width
//! and height.

use serde::{Deserialize, Serialize};

use gn_core::{GridPoint, Point, Size};

use crate::{WorldError, WorldResult};

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLayout {
    pub cell_size: Size<f32>,
    pub offset:    Point,
    pub origin:    Point,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            cell_size: Size::new(1.0, 1.0),
            offset:    Point::ZERO,
            origin:    Point::ZERO,
        }
    }
}

impl MapLayout {
    pub fn new(cell_size: Size<f32>, offset: Point) -> WorldResult<Self> {
        let layout = Self { cell_size, offset, origin: Point::ZERO };
        layout.validate()?;
        Ok(layout)
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Cell sizes must be finite and positive; offsets finite.
    pub fn validate(&self) -> WorldResult<()> {
        let Size { width, height } = self.cell_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidLayout(format!("cell size {} must be positive", self.cell_size)));
        }
        if !self.offset.is_finite() || !self.origin.is_finite() {
            return Err(WorldError::InvalidLayout(format!(
                "offset {} / origin {} must be finite",
                self.offset, self.origin
            )));
        }
        Ok(())
    }

    // ── Points ────────────────────────────────────────────────────────────

    #[inline]
    pub fn local_from_grid(&self, grid: Point) -> Point {
        grid.scale(self.cell_size.to_point()) + self.offset
    }

    /// Local-space centre of `cell`.
    #[inline]
    pub fn local_from_cell(&self, cell: GridPoint) -> Point {
        self.local_from_grid(cell.center())
    }

    #[inline]
    pub fn grid_from_local(&self, local: Point) -> Point {
        (local - self.offset).unscale(self.cell_size.to_point())
    }

    #[inline]
    pub fn cell_from_local(&self, local: Point) -> GridPoint {
        self.grid_from_local(local).cell()
    }

    #[inline]
    pub fn world_from_local(&self, local: Point) -> Point {
        local + self.origin
    }

    #[inline]
    pub fn local_from_world(&self, world: Point) -> Point {
        world - self.origin
    }

    // ── Scalars ───────────────────────────────────────────────────────────

    #[inline]
    pub fn local_from_grid_distance(&self, grid: f32) -> f32 {
        grid * self.cell_size.mean()
    }

    #[inline]
    pub fn grid_from_local_distance(&self, local: f32) -> f32 {
        local / self.cell_size.mean()
    }

    // ── Bounds ────────────────────────────────────────────────────────────

    /// Local-space rectangle `(min, max)` covered by a grid of `grid` cells.
    pub fn bounds(&self, grid: Size<i32>) -> (Point, Point) {
        let extent = Point::new(grid.width as f32, grid.height as f32);
        (self.offset, self.local_from_grid(extent))
    }

    /// Stretch the layout so a grid of `grid` cells exactly covers the
    /// rectangle `min..max`.
    pub fn fit_bounds(&mut self, min: Point, max: Point, grid: Size<i32>) -> WorldResult<()> {
        let span = max - min;
        let fitted = Self {
            cell_size: Size::new(span.x / grid.width as f32, span.y / grid.height as f32),
            offset:    min,
            origin:    self.origin,
        };
        fitted.validate()?;
        *self = fitted;
        Ok(())
    }
}
