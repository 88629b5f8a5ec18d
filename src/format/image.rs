//! Driver for plain raster image files.
//!
//! Decodes PNG, JPEG, TIFF and BMP files with the `image` crate and serves
//! them through the same tiled read path as pyramidal slides.
//!
//! # Virtual Pyramid
//!
//! Opening a file decodes it once into level 0. Further levels halve the
//! previous one until a level fits into a single tile:
//!
//! ```text
//! level 0   4000 x 3000   (decoded)
//! level 1   2000 x 1500
//! level 2   1000 x  750
//! level 3    500 x  375
//! level 4    250 x  187   <= tile size, stop
//! ```
//!
//! Each level is cut into a regular grid of `tile_size` tiles. Reads pick a
//! level with [`find_zoom_level`] and compose the block from that level's
//! tiles; decoded tiles are kept in a [`TileCache`].

use std::path::Path;

use image::{ImageError, ImageFormat};
use tracing::{debug, info};

use crate::config::DEFAULT_TILE_SIZE;
use crate::error::{DriverError, IoError, SlideError};
use crate::geometry::{scale_rect, Rect, Size};
use crate::raster::{DataType, Raster};
use crate::slide::{
    find_zoom_level, Compression, LevelInfo, Resolution, Scene, Slide, SlideDriver,
};
use crate::tile::{compose, TileCache, TileCacheKey, TileSource, DEFAULT_TILE_CACHE_CAPACITY};

/// Driver id of [`ImageDriver`].
pub const IMAGE_DRIVER_ID: &str = "IMAGE";

/// File patterns handled by [`ImageDriver`].
pub const IMAGE_FILE_PATTERN: &str = "*.png;*.jpg;*.jpeg;*.tif;*.tiff;*.bmp";

// =============================================================================
// Driver
// =============================================================================

/// Slide driver for single-image raster files.
#[derive(Debug, Clone, Copy)]
pub struct ImageDriver {
    tile_size: u32,
    cache_capacity: usize,
}

impl ImageDriver {
    /// Create a driver with default tile size and tile cache capacity.
    pub fn new() -> Self {
        Self::with_options(DEFAULT_TILE_SIZE, DEFAULT_TILE_CACHE_CAPACITY)
    }

    /// Create a driver with a custom tile size and per-scene tile cache
    /// capacity in bytes. A tile size of 0 is treated as 1.
    pub fn with_options(tile_size: u32, cache_capacity: usize) -> Self {
        Self {
            tile_size: tile_size.max(1),
            cache_capacity,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Decode `path` into a single-scene slide.
    pub fn open(&self, path: &str) -> Result<ImageSlide, DriverError> {
        let image = image::open(path).map_err(|e| map_image_error(path, e))?;
        let raster = Raster::from_dynamic_image(image);
        let scene = ImageScene::new(path, raster, self.tile_size, self.cache_capacity)?;
        info!(
            path,
            size = %scene.rect().size(),
            channels = scene.num_channels(),
            levels = scene.levels().len(),
            "decoded image"
        );
        Ok(ImageSlide {
            path: path.to_string(),
            scene,
        })
    }
}

impl Default for ImageDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideDriver for ImageDriver {
    fn id(&self) -> &str {
        IMAGE_DRIVER_ID
    }

    fn file_pattern(&self) -> &str {
        IMAGE_FILE_PATTERN
    }

    fn open_file(&self, path: &str) -> Result<Box<dyn Slide>, DriverError> {
        Ok(Box::new(self.open(path)?))
    }
}

fn map_image_error(path: &str, err: ImageError) -> DriverError {
    match err {
        ImageError::IoError(e) => IoError::from_std(path, &e).into(),
        ImageError::Unsupported(e) => DriverError::UnsupportedFormat {
            reason: e.to_string(),
        },
        other => DriverError::Decode {
            message: format!("{}: {}", path, other),
        },
    }
}

// =============================================================================
// Slide
// =============================================================================

/// A decoded image file. Always holds exactly one scene.
#[derive(Debug)]
pub struct ImageSlide {
    path: String,
    scene: ImageScene,
}

impl Slide for ImageSlide {
    fn file_path(&self) -> &str {
        &self.path
    }

    fn num_scenes(&self) -> usize {
        1
    }

    fn scene(&self, index: usize) -> Option<&dyn Scene> {
        (index == 0).then_some(&self.scene as &dyn Scene)
    }

    fn scene_mut(&mut self, index: usize) -> Option<&mut dyn Scene> {
        if index == 0 {
            Some(&mut self.scene)
        } else {
            None
        }
    }
}

// =============================================================================
// Scene
// =============================================================================

/// The single scene of an [`ImageSlide`].
#[derive(Debug)]
pub struct ImageScene {
    path: String,
    name: String,
    levels: Vec<LevelInfo>,
    rasters: Vec<Raster>,
    compression: Compression,
    cache: TileCache,
}

impl ImageScene {
    /// Build a scene and its virtual pyramid from a decoded raster.
    pub fn new(
        path: &str,
        raster: Raster,
        tile_size: u32,
        cache_capacity: usize,
    ) -> Result<Self, DriverError> {
        if raster.is_empty() {
            return Err(DriverError::Decode {
                message: format!("{}: image has no pixels", path),
            });
        }
        let name = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path)
            .to_string();

        let tile_size = tile_size.max(1);
        let tile = Size::new(tile_size as i32, tile_size as i32);
        let base = raster.size();

        let mut rasters = vec![raster];
        loop {
            let Some(last) = rasters.last() else { break };
            if last.width() <= tile_size && last.height() <= tile_size {
                break;
            }
            let next = last
                .resize((last.width() / 2).max(1), (last.height() / 2).max(1))
                .map_err(|e| DriverError::Decode {
                    message: format!("{}: building pyramid: {}", path, e),
                })?;
            rasters.push(next);
        }

        let levels = rasters
            .iter()
            .enumerate()
            .map(|(level, r)| LevelInfo {
                level,
                size: r.size(),
                scale: r.width() as f64 / base.width as f64,
                magnification: 0.0,
                tile_size: tile,
            })
            .collect();

        Ok(Self {
            path: path.to_string(),
            name,
            levels,
            rasters,
            compression: compression_of(path),
            cache: TileCache::with_capacity(cache_capacity),
        })
    }

    /// Decoded-tile cache of this scene.
    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    fn base_size(&self) -> Size {
        self.levels.first().map(|l| l.size).unwrap_or_default()
    }

    fn block_channels(&self, channels: &[usize]) -> usize {
        if channels.is_empty() {
            self.num_channels()
        } else {
            channels.len()
        }
    }
}

/// Compression implied by the file format.
///
/// TIFF files carry the compression per directory, so it is not known from
/// the extension alone.
fn compression_of(path: &str) -> Compression {
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Png) => Compression::Png,
        Ok(ImageFormat::Jpeg) => Compression::Jpeg,
        Ok(ImageFormat::Bmp) => Compression::Uncompressed,
        _ => Compression::Unknown,
    }
}

impl TileSource for ImageScene {
    type Context = LevelInfo;

    fn tile_count(&self, level: &LevelInfo) -> usize {
        level.tile_count()
    }

    fn tile_rect(&self, tile_index: usize, level: &LevelInfo) -> Option<Rect> {
        level.grid().tile_rect(tile_index)
    }

    fn read_tile(
        &mut self,
        tile_index: usize,
        channels: &[usize],
        level: &LevelInfo,
    ) -> Result<Option<Raster>, DriverError> {
        let key = TileCacheKey::new(level.level, tile_index, channels);
        if let Some(tile) = self.cache.get(&key) {
            return Ok(Some(tile.clone()));
        }

        let invalid = |message: String| DriverError::InvalidTile {
            index: tile_index,
            message,
        };
        let rect = level
            .grid()
            .tile_rect(tile_index)
            .ok_or_else(|| invalid(format!("out of range at level {}", level.level)))?;
        let raster = self
            .rasters
            .get(level.level)
            .ok_or_else(|| invalid(format!("level {} does not exist", level.level)))?;

        let tile = raster
            .crop(rect)
            .and_then(|t| t.select_channels(channels))
            .map_err(|e| invalid(e.to_string()))?;

        self.cache.put(key, tile.clone());
        Ok(Some(tile))
    }

    fn initialize_block(
        &self,
        size: Size,
        channels: &[usize],
        _level: &LevelInfo,
    ) -> Result<Raster, DriverError> {
        let data_type = self.channel_data_type(0).unwrap_or(DataType::U8);
        Raster::with_size(size, self.block_channels(channels), data_type).map_err(|e| {
            DriverError::Decode {
                message: e.to_string(),
            }
        })
    }
}

impl Scene for ImageScene {
    fn file_path(&self) -> &str {
        &self.path
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rect(&self) -> Rect {
        Rect::from_size(self.base_size())
    }

    fn num_channels(&self) -> usize {
        self.rasters.first().map_or(0, |r| r.channels())
    }

    fn channel_data_type(&self, channel: usize) -> Option<DataType> {
        let base = self.rasters.first()?;
        (channel < base.channels()).then(|| base.data_type())
    }

    fn resolution(&self) -> Resolution {
        Resolution::default()
    }

    fn magnification(&self) -> f64 {
        0.0
    }

    fn compression(&self) -> Compression {
        self.compression
    }

    fn levels(&self) -> &[LevelInfo] {
        &self.levels
    }

    fn read_resampled_block_channels_ex(
        &mut self,
        rect: Rect,
        size: Size,
        channels: &[usize],
        _z_index: usize,
        _t_index: usize,
    ) -> Result<Raster, SlideError> {
        let zoom_x = size.width as f64 / rect.width as f64;
        let zoom_y = size.height as f64 / rect.height as f64;
        let zoom = zoom_x.max(zoom_y);

        let levels = &self.levels;
        let index = find_zoom_level(zoom, levels.len(), |i| levels[i].scale);
        let level = *levels
            .get(index)
            .ok_or_else(|| SlideError::invalid_state("scene has no pyramid levels"))?;

        let (scale_x, scale_y) = level.scale_from(self.base_size());
        let level_rect = scale_rect(rect, scale_x, scale_y);
        debug!(
            scene = %self.name,
            %rect,
            %size,
            level = level.level,
            %level_rect,
            "reading block"
        );
        compose(self, channels, level_rect, size, &level)
    }
}

// =============================================================================
// Tests
// =============================================================================
