//! TileSource trait for format-agnostic tile access.
//!
//! A format driver implements [`TileSource`] for the tile grid it selected
//! for one read. The composer only ever sees this trait, so it works the same
//! for regular grids, striped images and formats with irregular tile layouts.

use crate::error::DriverError;
use crate::geometry::{Rect, Size};
use crate::raster::Raster;

/// Tile enumeration and decoding for one read pass.
///
/// # Context
///
/// Every call receives the driver-defined [`TileSource::Context`]. Drivers
/// use it to carry per-read state such as the pyramid level chosen for the
/// request, so a single source can serve any of its levels.
///
/// # Concurrency
///
/// [`TileSource::read_tile`] takes `&mut self`: sources usually own one
/// exclusive file handle and are not safe for concurrent decoding. Open one
/// source per thread for parallel reads.
pub trait TileSource {
    /// Per-read state chosen by the driver.
    type Context: ?Sized;

    /// Number of tiles covering the raster selected by `context`.
    fn tile_count(&self, context: &Self::Context) -> usize;

    /// Rectangle of a tile in the pixel space of the selected raster.
    ///
    /// Returns `None` if `tile_index` is out of range.
    fn tile_rect(&self, tile_index: usize, context: &Self::Context) -> Option<Rect>;

    /// Decode a tile, filtered and ordered to `channels`.
    ///
    /// An empty channel list means all channels in natural order.
    ///
    /// Returns `Ok(None)` when the tile exists but has no backing data (for
    /// example an unscanned region of a sparse slide). Errors are reserved for
    /// genuine failures such as a corrupt codestream.
    fn read_tile(
        &mut self,
        tile_index: usize,
        channels: &[usize],
        context: &Self::Context,
    ) -> Result<Option<Raster>, DriverError>;

    /// Allocate a raster of `size` for `channels`, filled with the driver's
    /// background value.
    fn initialize_block(
        &self,
        size: Size,
        channels: &[usize],
        context: &Self::Context,
    ) -> Result<Raster, DriverError>;
}
