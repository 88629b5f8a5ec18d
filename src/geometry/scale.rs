use crate::error::SlideError;

use super::rect::{Rect, Size};

/// Scale `source` so that its size becomes exactly `target_size`.
///
/// Scale factors are `target / source` per axis. The origin is floored; the
/// size is `target_size` as given, not recomputed from the scaled edges.
///
/// # Errors
///
/// Returns `InvalidArgument` if `source` has zero or negative area, or if
/// `target_size` is negative.
pub fn scale_rect_to_size(source: Rect, target_size: Size) -> Result<Rect, SlideError> {
    if source.is_empty() {
        return Err(SlideError::invalid_argument(format!(
            "cannot scale zero-area rectangle {} to size {}",
            source, target_size
        )));
    }
    if target_size.is_negative() {
        return Err(SlideError::invalid_argument(format!(
            "negative target size {}",
            target_size
        )));
    }

    let scale_x = target_size.width as f64 / source.width as f64;
    let scale_y = target_size.height as f64 / source.height as f64;

    Ok(Rect::new(
        (source.x as f64 * scale_x).floor() as i32,
        (source.y as f64 * scale_y).floor() as i32,
        target_size.width,
        target_size.height,
    ))
}

/// Scale `source` by independent per-axis factors.
///
/// The origin is `floor(origin * scale)` and the far edge is
/// `ceil((origin + size) * scale)`, both in absolute coordinates.
pub fn scale_rect(source: Rect, scale_x: f64, scale_y: f64) -> Rect {
    let x = (source.x as f64 * scale_x).floor() as i64;
    let y = (source.y as f64 * scale_y).floor() as i64;
    let right = (source.right() as f64 * scale_x).ceil() as i64;
    let bottom = (source.bottom() as f64 * scale_y).ceil() as i64;

    Rect::new(x as i32, y as i32, (right - x) as i32, (bottom - y) as i32)
}

/// [`scale_rect`] with validation of the scale factors.
///
/// # Errors
///
/// Returns `InvalidArgument` for non-finite or negative factors.
pub fn try_scale_rect(source: Rect, scale_x: f64, scale_y: f64) -> Result<Rect, SlideError> {
    for (axis, scale) in [("x", scale_x), ("y", scale_y)] {
        if !scale.is_finite() || scale < 0.0 {
            return Err(SlideError::invalid_argument(format!(
                "invalid {} scale factor {}",
                axis, scale
            )));
        }
    }
    Ok(scale_rect(source, scale_x, scale_y))
}

// =============================================================================
// Tests
// =============================================================================
