use std::fmt;

use serde::Serialize;

use crate::geometry::Size;
use crate::tile::TileGrid;

/// Physical pixel size of a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
}

impl Resolution {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Metadata for one pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelInfo {
    /// Level index (0 = full resolution)
    pub level: usize,

    /// Level dimensions in pixels
    pub size: Size,

    /// Width of this level relative to level 0
    pub scale: f64,

    /// Objective magnification at this level (0 if unknown)
    pub magnification: f64,

    /// Nominal tile size of the level grid
    pub tile_size: Size,
}

impl LevelInfo {
    /// Tile grid covering this level.
    pub fn grid(&self) -> TileGrid {
        TileGrid::new(self.size, self.tile_size)
    }

    pub fn tile_count(&self) -> usize {
        self.grid().tile_count()
    }

    /// Per-axis scale factors from `base` (level 0 size) into this level.
    pub fn scale_from(&self, base: Size) -> (f64, f64) {
        let axis = |level: i32, base: i32| {
            if base > 0 {
                level as f64 / base as f64
            } else {
                1.0
            }
        };
        (
            axis(self.size.width, base.width),
            axis(self.size.height, base.height),
        )
    }
}

impl fmt::Display for LevelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {}: {} (scale {:.4}, magnification {:.2}, tiles {})",
            self.level, self.size, self.scale, self.magnification, self.tile_size
        )
    }
}

/// Pick the pyramid level to read for a requested `zoom`.
///
/// `zoom_of(i)` returns the zoom of level `i` relative to the scene, levels
/// ordered from finest to coarsest. Returns:
/// - level 0 when `zoom` is at least the base zoom;
/// - the first level within 1% of `zoom`;
/// - otherwise the finer neighbour of the first level coarser than `zoom`,
///   so the composer only ever downsamples;
/// - the coarsest level if `zoom` is below every level.
pub fn find_zoom_level<F>(zoom: f64, num_levels: usize, zoom_of: F) -> usize
where
    F: Fn(usize) -> f64,
{
    if num_levels == 0 {
        return 0;
    }
    let base_zoom = zoom_of(0);
    if zoom >= base_zoom {
        return 0;
    }

    let mut last_zoom = base_zoom;
    for level in 1..num_levels {
        let current_zoom = zoom_of(level);
        if (current_zoom - zoom).abs() / current_zoom < 0.01 {
            return level;
        }
        if zoom <= last_zoom && zoom > current_zoom {
            return level - 1;
        }
        last_zoom = current_zoom;
    }
    num_levels - 1
}
