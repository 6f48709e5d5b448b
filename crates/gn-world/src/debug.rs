//! Debug overlay geometry for a map: one coloured quad per cell.
//!
//! The overlay is plain data for whatever renderer the application uses.
//! It is only kept current while visible; the world recolours visible
//! overlays after every tick and rebuilds them on resize or layout changes.

use gn_core::{GridPoint, Point, Size};
use gn_grid::GridMap;

use crate::MapLayout;

/// RGBA, each channel in `0.0..=1.0`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Checkerboard colours for open cells.
pub const OPEN_TILES: [Color; 2] = [
    Color::rgba(0.25, 0.25, 0.25, 0.35),
    Color::rgba(0.35, 0.35, 0.35, 0.35),
];
pub const STATIC_BLOCKED_TILE: Color = Color::rgba(0.8, 0.1, 0.1, 0.6);
pub const RESERVED_TILE: Color = Color::rgba(0.9, 0.7, 0.1, 0.6);

/// Colour of `cell` on `map`.
pub fn tile_color(map: &GridMap, cell: GridPoint) -> Color {
    if map.statically_blocked(cell) {
        STATIC_BLOCKED_TILE
    } else if map.reservations(cell) > 0 {
        RESERVED_TILE
    } else {
        OPEN_TILES[((cell.x + cell.y) & 1) as usize]
    }
}

/// One cell quad.  Corners run top-left, top-right, bottom-right,
/// bottom-left in local space.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DebugTile {
    pub corners: [Point; 4],
    pub color:   Color,
}

#[derive(Debug, Default)]
pub struct DebugView {
    visible: bool,
    grid:    Size<i32>,
    tiles:   Vec<DebugTile>,
}

impl DebugView {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Make visible and bring the overlay up to date.
    pub fn show(&mut self, map: &GridMap, layout: &MapLayout) {
        self.visible = true;
        self.rebuild(map, layout);
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Row-major tiles; empty until first shown.
    pub fn tiles(&self) -> &[DebugTile] {
        &self.tiles
    }

    pub fn tile(&self, cell: GridPoint) -> Option<&DebugTile> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.grid.width || cell.y >= self.grid.height {
            return None;
        }
        self.tiles.get((cell.y * self.grid.width + cell.x) as usize)
    }

    /// Reallocate to the map's size, then reposition and recolour.  No-op
    /// while hidden.
    pub fn rebuild(&mut self, map: &GridMap, layout: &MapLayout) {
        if !self.visible {
            return;
        }
        self.grid = map.size();
        let blank = DebugTile { corners: [Point::ZERO; 4], color: OPEN_TILES[0] };
        self.tiles = vec![blank; self.grid.area()];
        self.reposition(layout);
        self.recolor(map);
    }

    /// Recompute quad corners after a cell-size or offset change.
    pub fn reposition(&mut self, layout: &MapLayout) {
        if !self.visible {
            return;
        }
        let w = self.grid.width;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            let cell = GridPoint::new(i as i32 % w, i as i32 / w);
            let tl = Point::from(cell);
            tile.corners = [
                layout.local_from_grid(tl),
                layout.local_from_grid(tl + Point::new(1.0, 0.0)),
                layout.local_from_grid(tl + Point::new(1.0, 1.0)),
                layout.local_from_grid(tl + Point::new(0.0, 1.0)),
            ];
        }
    }

    /// Refresh colours from current occupancy.
    pub fn recolor(&mut self, map: &GridMap) {
        if !self.visible {
            return;
        }
        let w = self.grid.width;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            tile.color = tile_color(map, GridPoint::new(i as i32 % w, i as i32 / w));
        }
    }
}
