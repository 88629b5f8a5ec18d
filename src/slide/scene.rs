//! Scene trait for format-agnostic block reads.
//!
//! A scene is one image plane of a slide, with channels and optional
//! Z-slices and time frames. Drivers implement the metadata accessors and a
//! single read hook, [`Scene::read_resampled_block_channels_ex`]. Every other
//! read operation is provided: it validates its arguments, fills in defaults
//! and forwards to the hook.
//!
//! # Read Operations
//!
//! | operation                          | resampled | channels | 4D |
//! |------------------------------------|-----------|----------|----|
//! | `read_block`                       |           |          |    |
//! | `read_block_channels`              |           | x        |    |
//! | `read_resampled_block`             | x         |          |    |
//! | `read_resampled_block_channels`    | x         | x        |    |
//! | `read_4d_block`                    |           |          | x  |
//! | `read_4d_block_channels`           |           | x        | x  |
//! | `read_resampled_4d_block`          | x         |          | x  |
//! | `read_resampled_4d_block_channels` | x         | x        | x  |
//!
//! `read_block_channels` and `read_4d_block_channels` are shorthands for
//! their resampled counterparts with the output size equal to the block
//! size. [`Scene::read`] takes all parameters at once as a [`BlockRequest`].
//!
//! # Auxiliary Images
//!
//! Some containers store small side images next to the main scene (slide
//! label, macro photo, thumbnail). They are exposed by name through
//! [`Scene::aux_image_names`] and [`Scene::aux_image`] as scenes of their own.

use crate::error::SlideError;
use crate::geometry::{Range, Rect, Size};
use crate::raster::{DataType, Raster};

use super::compression::Compression;
use super::level::{LevelInfo, Resolution};

// =============================================================================
// Block Request
// =============================================================================

/// All parameters of one block read.
///
/// # Example
///
/// ```
/// use slide_compose::geometry::{Range, Rect, Size};
/// use slide_compose::slide::BlockRequest;
///
/// let request = BlockRequest::new(Rect::new(0, 0, 1024, 1024))
///     .size(Size::new(256, 256))
///     .channels(&[2, 1, 0])
///     .z_range(Range::new(0, 3));
/// assert_eq!(request.output_size(), Size::new(256, 256));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRequest {
    /// Block in scene pixel coordinates
    pub rect: Rect,

    /// Output size; `None` reads at full resolution
    pub size: Option<Size>,

    /// Channel indices; empty means all
    pub channels: Vec<usize>,

    /// Z-slices to read; `[0, 0)` means the plain 2D read
    pub z_range: Range,

    /// Time frames to read; `[0, 0)` means the plain 2D read
    pub t_range: Range,
}

impl BlockRequest {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            size: None,
            channels: Vec::new(),
            z_range: Range::default(),
            t_range: Range::default(),
        }
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn channels(mut self, channels: &[usize]) -> Self {
        self.channels = channels.to_vec();
        self
    }

    pub fn z_range(mut self, range: Range) -> Self {
        self.z_range = range;
        self
    }

    pub fn t_range(mut self, range: Range) -> Self {
        self.t_range = range;
        self
    }

    /// Size of the raster the request produces per plane.
    pub fn output_size(&self) -> Size {
        self.size.unwrap_or_else(|| self.rect.size())
    }

    /// Whether the request selects Z-slices or time frames.
    pub fn is_4d(&self) -> bool {
        !(self.z_range.is_default() && self.t_range.is_default())
    }
}

// =============================================================================
// 4D Result
// =============================================================================

/// Stack of planes produced by a 4D read.
///
/// Planes are stored Z-fastest: the plane for slice `z` and frame `t` (both
/// relative to the requested ranges) is at `t * z_slices + z`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block4D {
    z_slices: usize,
    t_frames: usize,
    planes: Vec<Raster>,
}

impl Block4D {
    /// Wrap a single 2D plane.
    pub fn single(plane: Raster) -> Self {
        Self {
            z_slices: 1,
            t_frames: 1,
            planes: vec![plane],
        }
    }

    pub fn z_slices(&self) -> usize {
        self.z_slices
    }

    pub fn t_frames(&self) -> usize {
        self.t_frames
    }

    /// Plane for relative slice `z` and frame `t`.
    pub fn plane(&self, z: usize, t: usize) -> Option<&Raster> {
        if z >= self.z_slices || t >= self.t_frames {
            return None;
        }
        self.planes.get(t * self.z_slices + z)
    }

    pub fn planes(&self) -> &[Raster] {
        &self.planes
    }

    pub fn into_planes(self) -> Vec<Raster> {
        self.planes
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

// =============================================================================
// Scene Trait
// =============================================================================

/// Format-agnostic access to one scene of a slide.
///
/// Read operations take `&mut self`: drivers keep exclusive decoder state
/// (file handles, tile caches) inside the scene.
pub trait Scene {
    /// Path of the file the scene belongs to.
    fn file_path(&self) -> &str;

    fn name(&self) -> &str;

    /// Scene rectangle in level 0 pixel coordinates.
    fn rect(&self) -> Rect;

    fn num_channels(&self) -> usize;

    /// Sample type of a channel, or `None` if `channel` is out of range.
    fn channel_data_type(&self, channel: usize) -> Option<DataType>;

    fn channel_name(&self, _channel: usize) -> String {
        String::new()
    }

    fn num_z_slices(&self) -> usize {
        1
    }

    fn num_t_frames(&self) -> usize {
        1
    }

    /// Pixel size at level 0.
    fn resolution(&self) -> Resolution;

    /// Distance between Z-slices (0 if unknown or a single slice).
    fn z_slice_resolution(&self) -> f64 {
        0.0
    }

    /// Interval between time frames in seconds (0 if unknown).
    fn t_frame_resolution(&self) -> f64 {
        0.0
    }

    /// Objective magnification at level 0 (0 if unknown).
    fn magnification(&self) -> f64;

    /// Compression of the stored pixel data.
    fn compression(&self) -> Compression;

    /// Names of the auxiliary images attached to the scene.
    fn aux_image_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn num_aux_images(&self) -> usize {
        self.aux_image_names().len()
    }

    /// Auxiliary image called `name`, or `None` if there is none.
    fn aux_image(&mut self, _name: &str) -> Option<&mut dyn Scene> {
        None
    }

    /// Pyramid levels, finest first. Never empty for a readable scene.
    fn levels(&self) -> &[LevelInfo];

    fn num_zoom_levels(&self) -> usize {
        self.levels().len()
    }

    fn zoom_level_info(&self, level: usize) -> Option<&LevelInfo> {
        self.levels().get(level)
    }

    /// Read `rect` resampled to `size` for one Z-slice and time frame.
    ///
    /// Drivers pick a pyramid level and run exactly one composition.
    /// Arguments are already validated by the provided operations;
    /// `channels` is never empty.
    fn read_resampled_block_channels_ex(
        &mut self,
        rect: Rect,
        size: Size,
        channels: &[usize],
        z_index: usize,
        t_index: usize,
    ) -> Result<Raster, SlideError>;

    // -------------------------------------------------------------------------
    // Provided operations
    // -------------------------------------------------------------------------

    /// Complete an empty channel list to all channels in natural order.
    fn valid_channel_indices(&self, channels: &[usize]) -> Vec<usize> {
        if channels.is_empty() {
            (0..self.num_channels()).collect()
        } else {
            channels.to_vec()
        }
    }

    fn read_block(&mut self, rect: Rect) -> Result<Raster, SlideError> {
        self.read_resampled_block_channels(rect, rect.size(), &[])
    }

    fn read_block_channels(&mut self, rect: Rect, channels: &[usize]) -> Result<Raster, SlideError> {
        self.read_resampled_block_channels(rect, rect.size(), channels)
    }

    fn read_resampled_block(&mut self, rect: Rect, size: Size) -> Result<Raster, SlideError> {
        self.read_resampled_block_channels(rect, size, &[])
    }

    /// Read `rect` resampled to `size` with the given channels.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `rect` has no area, `size` is negative or a
    /// channel index is out of range. Driver failures are propagated.
    fn read_resampled_block_channels(
        &mut self,
        rect: Rect,
        size: Size,
        channels: &[usize],
    ) -> Result<Raster, SlideError> {
        validate_block(rect, size)?;
        let channels = checked_channels(self.num_channels(), &self.valid_channel_indices(channels))?;
        self.read_resampled_block_channels_ex(rect, size, &channels, 0, 0)
    }

    fn read_4d_block(
        &mut self,
        rect: Rect,
        z_range: Range,
        t_range: Range,
    ) -> Result<Block4D, SlideError> {
        self.read_resampled_4d_block_channels(rect, rect.size(), &[], z_range, t_range)
    }

    fn read_4d_block_channels(
        &mut self,
        rect: Rect,
        channels: &[usize],
        z_range: Range,
        t_range: Range,
    ) -> Result<Block4D, SlideError> {
        self.read_resampled_4d_block_channels(rect, rect.size(), channels, z_range, t_range)
    }

    fn read_resampled_4d_block(
        &mut self,
        rect: Rect,
        size: Size,
        z_range: Range,
        t_range: Range,
    ) -> Result<Block4D, SlideError> {
        self.read_resampled_4d_block_channels(rect, size, &[], z_range, t_range)
    }

    /// Read a stack of planes over Z-slices and time frames.
    ///
    /// Both ranges equal to `[0, 0)` degrade to the plain 2D read. On a
    /// scene with several slices or frames, a `[0, 0)` range selects index
    /// 0 of that axis.
    ///
    /// # Errors
    ///
    /// - `UnsupportedOperation`: non-default ranges on a scene with a single
    ///   slice and frame.
    /// - `InvalidArgument`: an empty or out-of-bounds range, plus everything
    ///   [`Scene::read_resampled_block_channels`] rejects.
    fn read_resampled_4d_block_channels(
        &mut self,
        rect: Rect,
        size: Size,
        channels: &[usize],
        z_range: Range,
        t_range: Range,
    ) -> Result<Block4D, SlideError> {
        if z_range.is_default() && t_range.is_default() {
            return self
                .read_resampled_block_channels(rect, size, channels)
                .map(Block4D::single);
        }

        let (num_z, num_t) = (self.num_z_slices(), self.num_t_frames());
        if num_z <= 1 && num_t <= 1 {
            return Err(SlideError::unsupported(format!(
                "4D block read (z {}, t {}) on a 2D scene",
                z_range, t_range
            )));
        }

        let z = resolve_range(z_range, num_z, "z-slice")?;
        let t = resolve_range(t_range, num_t, "time frame")?;
        validate_block(rect, size)?;
        let channels = checked_channels(self.num_channels(), &self.valid_channel_indices(channels))?;

        let mut planes = Vec::with_capacity(z.len() as usize * t.len() as usize);
        for t_index in t.start..t.end {
            for z_index in z.start..z.end {
                planes.push(self.read_resampled_block_channels_ex(
                    rect,
                    size,
                    &channels,
                    z_index as usize,
                    t_index as usize,
                )?);
            }
        }
        Ok(Block4D {
            z_slices: z.len() as usize,
            t_frames: t.len() as usize,
            planes,
        })
    }

    /// Read a block described by a [`BlockRequest`].
    fn read(&mut self, request: &BlockRequest) -> Result<Block4D, SlideError> {
        self.read_resampled_4d_block_channels(
            request.rect,
            request.output_size(),
            &request.channels,
            request.z_range,
            request.t_range,
        )
    }
}

fn validate_block(rect: Rect, size: Size) -> Result<(), SlideError> {
    if rect.is_empty() {
        return Err(SlideError::invalid_argument(format!(
            "block rectangle {} has no area",
            rect
        )));
    }
    if size.is_negative() {
        return Err(SlideError::invalid_argument(format!(
            "negative block size {}",
            size
        )));
    }
    Ok(())
}

fn checked_channels(num_channels: usize, channels: &[usize]) -> Result<Vec<usize>, SlideError> {
    if let Some(&bad) = channels.iter().find(|&&c| c >= num_channels) {
        return Err(SlideError::invalid_argument(format!(
            "channel {} out of range, scene has {} channels",
            bad, num_channels
        )));
    }
    Ok(channels.to_vec())
}

/// Map a requested range onto `[0, count)`; `[0, 0)` selects index 0.
fn resolve_range(range: Range, count: usize, axis: &str) -> Result<Range, SlideError> {
    let resolved = if range.is_default() {
        Range::new(0, 1)
    } else {
        range
    };
    if resolved.is_empty() || resolved.start < 0 || resolved.end as i64 > count as i64 {
        return Err(SlideError::invalid_argument(format!(
            "{} range {} outside [0, {})",
            axis, range, count
        )));
    }
    Ok(resolved)
}

// =============================================================================
// Tests
// =============================================================================
