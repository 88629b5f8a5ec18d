use serde::Serialize;

use crate::geometry::{Rect, Size};

/// Regular tile grid over a raster.
///
/// Tiles are numbered row by row. Edge tiles are clipped to the raster
/// bounds, so every tile rectangle lies inside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileGrid {
    /// Raster size in pixels
    pub size: Size,

    /// Nominal tile size in pixels
    pub tile_size: Size,
}

impl TileGrid {
    pub const fn new(size: Size, tile_size: Size) -> Self {
        Self { size, tile_size }
    }

    /// Number of tile columns.
    pub fn tiles_x(&self) -> usize {
        tiles_along(self.size.width, self.tile_size.width)
    }

    /// Number of tile rows.
    pub fn tiles_y(&self) -> usize {
        tiles_along(self.size.height, self.tile_size.height)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles_x() * self.tiles_y()
    }

    /// Rectangle of the tile at `index`, or `None` if out of range.
    pub fn tile_rect(&self, index: usize) -> Option<Rect> {
        if index >= self.tile_count() {
            return None;
        }
        let tiles_x = self.tiles_x();
        let column = (index % tiles_x) as i32;
        let row = (index / tiles_x) as i32;

        let x = column * self.tile_size.width;
        let y = row * self.tile_size.height;
        let width = self.tile_size.width.min(self.size.width - x);
        let height = self.tile_size.height.min(self.size.height - y);

        Some(Rect::new(x, y, width, height))
    }
}

fn tiles_along(extent: i32, tile: i32) -> usize {
    if extent <= 0 || tile <= 0 {
        return 0;
    }
    ((extent - 1) / tile + 1) as usize
}
