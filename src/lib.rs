//! # slide-compose
//!
//! Region reads for whole-slide images.
//!
//! Slides are gigapixel images stored as grids of tiles, usually at several
//! pyramid levels. This library serves any rectangle of a slide scene, at any
//! output size, by decoding only the tiles that intersect the request and
//! compositing them into one raster.
//!
//! ## Features
//!
//! - **Tile composition**: Exact, seam-free block assembly from arbitrary tile layouts
//! - **Resampling**: Per-tile bilinear scaling with deterministic output
//! - **Level selection**: Reads from the coarsest pyramid level that keeps full detail
//! - **4D reads**: Stacks over Z-slices and time frames for multi-dimensional scenes
//! - **Pluggable drivers**: Registry with file-name based format detection
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`geometry`] - Rectangles, sizes, ranges and rectangle scaling
//! - [`raster`] - Interleaved pixel buffers, resampling and image conversion
//! - [`tile`] - Tile source trait, tile composer, grid and tile cache
//! - [`slide`] - Scene trait, block reads, driver registry
//! - [`mod@format`] - Format drivers
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use slide_compose::{DriverRegistry, Rect, Size};
//!
//! let registry = DriverRegistry::with_default_drivers();
//! let mut slide = registry.open_slide("scan.tiff", "").unwrap();
//! let scene = slide.scene_mut(0).unwrap();
//!
//! // 4096x4096 region, downsampled to 512x512, channels reordered to BGR
//! let block = scene
//!     .read_resampled_block_channels(Rect::new(0, 0, 4096, 4096), Size::new(512, 512), &[2, 1, 0])
//!     .unwrap();
//! assert_eq!(block.size(), Size::new(512, 512));
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod raster;
pub mod slide;
pub mod tile;

// Re-export commonly used types
pub use config::{Cli, Command, InfoConfig, ReadConfig, DEFAULT_TILE_SIZE};
pub use error::{DriverError, IoError, SlideError};
pub use format::{match_pattern, ImageDriver, ImageScene, ImageSlide};
pub use geometry::{scale_rect, scale_rect_to_size, try_scale_rect, Range, Rect, Size};
pub use raster::{DataType, Raster, Samples};
pub use slide::{
    find_zoom_level, Block4D, BlockRequest, DriverRegistry, LevelInfo, Resolution, Scene,
    SceneSummary, Slide, SlideDriver, SlideSummary,
};
pub use tile::{
    compose, compose_rect, BufferOwnership, TileCache, TileCacheKey, TileGrid, TileSource,
    DEFAULT_TILE_CACHE_CAPACITY,
};
