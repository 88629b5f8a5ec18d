//! Pixel-space geometry.
//!
//! Rectangles, sizes and index ranges used to address slide rasters, and the
//! rectangle scaler that maps source rectangles into a resampled output space.
//!
//! # Scaling
//!
//! Two scaling forms are provided:
//!
//! - [`scale_rect_to_size`] pins the target size exactly. It is used once per
//!   request to fix the output buffer dimensions.
//! - [`scale_rect`] computes both edges in absolute coordinates (`floor` for
//!   the origin, `ceil` for the far edge). Rectangles that partition a larger
//!   rectangle still cover it after scaling with no gaps. A shared edge that
//!   scales to a whole pixel stays shared; otherwise the neighbours overlap
//!   by one pixel.

mod rect;
mod scale;

pub use rect::{Range, Rect, Size};
pub use scale::{scale_rect, scale_rect_to_size, try_scale_rect};
