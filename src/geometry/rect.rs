use std::fmt;

use serde::Serialize;

// =============================================================================
// Size
// =============================================================================

/// Width and height of a raster region in pixels.
///
/// Components are signed so that malformed sizes coming from callers or
/// drivers can be represented and rejected; a valid size is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered, zero for negative sizes.
    pub fn area(&self) -> i64 {
        if self.is_negative() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn is_negative(&self) -> bool {
        self.width < 0 || self.height < 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// =============================================================================
// Rect
// =============================================================================

/// Axis-aligned rectangle in a raster's pixel coordinate space.
///
/// `(x, y)` is the top-left corner; the rectangle covers
/// `x..x + width` horizontally and `y..y + height` vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn area(&self) -> i64 {
        self.size().area()
    }

    /// True when the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when either dimension is negative.
    pub fn is_malformed(&self) -> bool {
        self.size().is_negative()
    }

    /// Intersection of two rectangles.
    ///
    /// Returns an all-zero rectangle when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 <= x1 as i64 || y2 <= y1 as i64 {
            return Rect::default();
        }

        Rect::new(x1, y1, (x2 - x1 as i64) as i32, (y2 - y1 as i64) as i32)
    }

    /// The same rectangle expressed relative to `(origin_x, origin_y)`.
    pub fn relative_to(&self, origin_x: i32, origin_y: i32) -> Rect {
        Rect::new(
            self.x - origin_x,
            self.y - origin_y,
            self.width,
            self.height,
        )
    }

    /// True if `other` lies completely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

// =============================================================================
// Range
// =============================================================================

/// Half-open index range `[start, end)` over Z-slices or time frames.
///
/// The default range `[0, 0)` means "no multi-dimensional selection".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: i32,
    pub end: i32,
}

impl Range {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_default(&self) -> bool {
        *self == Range::default()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// =============================================================================
// Tests
// =============================================================================
