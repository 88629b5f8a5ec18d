//! Tile composer.
//!
//! Builds one output raster for an arbitrary block of a tiled source at an
//! arbitrary output size.
//!
//! # Algorithm
//!
//! ```text
//!  block_rect (source px)          block_size (output px)
//!  ┌──────────────┐                ┌───────┐
//!  │  ┌──┬──┬──┐  │   scale_x/y    │       │
//!  │  ├──┼──┼──┤  │  ───────────▶  │       │
//!  │  └──┴──┴──┘  │                └───────┘
//!  └──────────────┘
//! ```
//!
//! 1. Derive `scale_x`, `scale_y` from `block_size / block_rect`.
//! 2. Pin the scaled block rectangle with [`scale_rect_to_size`].
//! 3. For every tile intersecting `block_rect`: decode it (or synthesize
//!    background when it has no data), resize it to its scaled rectangle
//!    computed with [`scale_rect`], and copy the overlap into the output.
//!
//! Tiles outside the block are never decoded.

use tracing::{debug, trace, warn};

use crate::error::SlideError;
use crate::geometry::{scale_rect, scale_rect_to_size, Rect, Size};
use crate::raster::Raster;

use super::source::TileSource;

/// Who provides the output raster of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferOwnership {
    /// The composer allocates the output through
    /// [`TileSource::initialize_block`], so it starts as background.
    ComposerAllocates,

    /// The caller's raster is composed into as-is and never cleared.
    /// Its size must equal the requested block size. On error the raster is
    /// left untouched.
    CallerOwns,
}

/// Counters for one composition pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ComposeStats {
    decoded: usize,
    absent: usize,
    skipped: usize,
}

/// Compose `block_rect` of `source` into `output` at `block_size`.
///
/// `output` changes only when composition succeeds. With
/// [`BufferOwnership::ComposerAllocates`] it is replaced by a new raster;
/// with [`BufferOwnership::CallerOwns`] pixels not covered by any tile keep
/// the caller's values.
///
/// # Errors
///
/// - `InvalidArgument`: `block_rect` without positive area, negative
///   `block_size`, or a caller buffer of the wrong size.
/// - `InvalidState`: the source reports a negative tile size, no geometry
///   for an index below its tile count, or a tile whose layout differs from
///   the output.
/// - `Driver`: any failure raised by the source, unmodified.
pub fn compose_rect<S>(
    source: &mut S,
    channels: &[usize],
    block_rect: Rect,
    block_size: Size,
    context: &S::Context,
    output: &mut Raster,
    ownership: BufferOwnership,
) -> Result<(), SlideError>
where
    S: TileSource + ?Sized,
{
    if block_rect.is_empty() {
        return Err(SlideError::invalid_argument(format!(
            "block rectangle {} has no area",
            block_rect
        )));
    }
    if block_size.is_negative() {
        return Err(SlideError::invalid_argument(format!(
            "negative block size {}",
            block_size
        )));
    }

    match ownership {
        BufferOwnership::ComposerAllocates => {
            let mut block = source.initialize_block(block_size, channels, context)?;
            if block.size() != block_size {
                return Err(SlideError::invalid_state(format!(
                    "tile source initialized a {} block, expected {}",
                    block.size(),
                    block_size
                )));
            }
            compose_into(source, channels, block_rect, block_size, context, &mut block)?;
            *output = block;
        }
        BufferOwnership::CallerOwns => {
            if output.size() != block_size {
                return Err(SlideError::invalid_argument(format!(
                    "output raster is {}, expected {}",
                    output.size(),
                    block_size
                )));
            }
            let mut block = output.clone();
            compose_into(source, channels, block_rect, block_size, context, &mut block)?;
            *output = block;
        }
    }
    Ok(())
}

/// Compose into a newly allocated, background-filled raster.
///
/// Shorthand for [`compose_rect`] with [`BufferOwnership::ComposerAllocates`].
pub fn compose<S>(
    source: &mut S,
    channels: &[usize],
    block_rect: Rect,
    block_size: Size,
    context: &S::Context,
) -> Result<Raster, SlideError>
where
    S: TileSource + ?Sized,
{
    let mut output = Raster::new(0, 0, 0, crate::raster::DataType::U8);
    compose_rect(
        source,
        channels,
        block_rect,
        block_size,
        context,
        &mut output,
        BufferOwnership::ComposerAllocates,
    )?;
    Ok(output)
}

fn compose_into<S>(
    source: &mut S,
    channels: &[usize],
    block_rect: Rect,
    block_size: Size,
    context: &S::Context,
    output: &mut Raster,
) -> Result<(), SlideError>
where
    S: TileSource + ?Sized,
{
    if block_size.is_empty() {
        debug!(%block_rect, %block_size, "empty block size, nothing to compose");
        return Ok(());
    }

    let scale_x = block_size.width as f64 / block_rect.width as f64;
    let scale_y = block_size.height as f64 / block_rect.height as f64;
    let scaled_block_rect = scale_rect_to_size(block_rect, block_size)?;

    let tile_count = source.tile_count(context);
    let mut stats = ComposeStats::default();

    for tile_index in 0..tile_count {
        let Some(tile_rect) = source.tile_rect(tile_index, context) else {
            return Err(SlideError::invalid_state(format!(
                "tile {} has no geometry, source reports {} tiles",
                tile_index, tile_count
            )));
        };
        if tile_rect.is_malformed() {
            return Err(SlideError::invalid_state(format!(
                "tile {} has negative size {}",
                tile_index,
                tile_rect.size()
            )));
        }
        if block_rect.intersect(&tile_rect).is_empty() {
            stats.skipped += 1;
            continue;
        }

        let tile = match source.read_tile(tile_index, channels, context)? {
            Some(tile) => {
                stats.decoded += 1;
                tile
            }
            None => {
                warn!(tile_index, %tile_rect, "tile has no data, using background");
                stats.absent += 1;
                source.initialize_block(tile_rect.size(), channels, context)?
            }
        };
        if tile.is_empty() {
            continue;
        }
        if tile.data_type() != output.data_type() || tile.channels() != output.channels() {
            return Err(SlideError::invalid_state(format!(
                "tile {} is {} x {} channels, block is {} x {} channels",
                tile_index,
                tile.data_type().name(),
                tile.channels(),
                output.data_type().name(),
                output.channels()
            )));
        }

        let scaled_tile_rect = scale_rect(tile_rect, scale_x, scale_y);
        let scaled_intersection = scaled_block_rect.intersect(&scaled_tile_rect);
        if scaled_intersection.is_empty() {
            continue;
        }
        let scaled_tile = tile.resize(
            scaled_tile_rect.width as u32,
            scaled_tile_rect.height as u32,
        )?;

        let block_part = scaled_intersection.relative_to(scaled_block_rect.x, scaled_block_rect.y);
        let tile_part = scaled_intersection.relative_to(scaled_tile_rect.x, scaled_tile_rect.y);
        scaled_tile.copy_region_into(tile_part, output, block_part.x, block_part.y)?;
        trace!(tile_index, %tile_rect, %scaled_intersection, "copied tile");
    }

    debug!(
        %block_rect,
        %block_size,
        tile_count,
        decoded = stats.decoded,
        absent = stats.absent,
        skipped = stats.skipped,
        "composed block"
    );
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
