//! Tile composition layer.
//!
//! This module turns a tiled raster into arbitrary output blocks: any
//! rectangle of the source, at any output size.
//!
//! # Architecture
//!
//! The composer sits between a scene and its format driver:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           Scene read operations         │
//! └────────────────────┬────────────────────┘
//!                      │  block_rect, block_size, channels
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Composer              │
//! │  scale rects ─▶ decode ─▶ resize ─▶ copy│
//! └────────────────────┬────────────────────┘
//!                      │  TileSource
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  Format driver  (+ TileGrid, TileCache) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileSource`]: Trait a driver implements to expose its tiles
//! - [`compose_rect`] / [`compose`]: Build one output block from tiles
//! - [`BufferOwnership`]: Whether the composer or the caller owns the output
//! - [`TileGrid`]: Regular grid geometry for drivers with uniform tiles
//! - [`TileCache`]: LRU cache of decoded tiles with size-based eviction

mod cache;
mod composer;
mod grid;
mod source;

pub use cache::{TileCache, TileCacheKey, DEFAULT_TILE_CACHE_CAPACITY};
pub use composer::{compose, compose_rect, BufferOwnership};
pub use grid::TileGrid;
pub use source::TileSource;
