//! Slide abstraction layer.
//!
//! This module provides a uniform interface for reading slides regardless of
//! their underlying format.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             DriverRegistry              │
//! │  (driver lookup, file-name detection)   │
//! └────────────────────┬────────────────────┘
//!                      │ open_slide
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          Slide  ─▶  Scene trait         │
//! │   (metadata + provided block reads)     │
//! └────────────────────┬────────────────────┘
//!                      │ read_resampled_block_channels_ex
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  Driver: level choice ─▶ tile composer  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use slide_compose::geometry::Size;
//! use slide_compose::slide::DriverRegistry;
//!
//! let registry = DriverRegistry::with_default_drivers();
//! let mut slide = registry.open_slide("overview.png", "").unwrap();
//! let scene = slide.scene_mut(0).unwrap();
//! let whole = scene.rect();
//! let thumbnail = scene.read_resampled_block(whole, Size::new(256, 256)).unwrap();
//! ```

mod compression;
mod level;
mod registry;
mod scene;
mod summary;

pub use compression::Compression;
pub use level::{find_zoom_level, LevelInfo, Resolution};
pub use registry::{DriverRegistry, Slide, SlideDriver};
pub use scene::{Block4D, BlockRequest, Scene};
pub use summary::{SceneSummary, SlideSummary};
