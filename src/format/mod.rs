//! Format drivers.
//!
//! Each driver turns one family of files into [`crate::slide::Slide`]s and
//! implements [`crate::tile::TileSource`] for its scenes, so block reads run
//! through the shared tile composer.
//!
//! Currently supported formats:
//!
//! - **Raster images** ([`ImageDriver`]): PNG, JPEG, TIFF and BMP files,
//!   served through a virtual pyramid
//!
//! Drivers are selected by file name with [`match_pattern`].

pub mod detect;
pub mod image;

pub use detect::match_pattern;
pub use image::{ImageDriver, ImageScene, ImageSlide, IMAGE_DRIVER_ID, IMAGE_FILE_PATTERN};
