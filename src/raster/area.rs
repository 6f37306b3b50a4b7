//! Axis-aligned integer rectangles used to select the region to blur.

use std::ops::Range;

/// Rectangle `(x, y, width, height)` in pixel coordinates.
///
/// Coordinates may be negative and the rectangle may extend past a raster;
/// [`Area::clip_by`] brings it back inside before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Area {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area covering a `width` x `height` raster from the origin.
    ///
    /// Dimensions beyond `i32::MAX` saturate.
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        )
    }

    /// Area spanning the corners `(x1, y1)` inclusive to `(x2, y2)` exclusive.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let width = (i64::from(x2) - i64::from(x1)).clamp(0, i64::from(i32::MAX));
        let height = (i64::from(y2) - i64::from(y1)).clamp(0, i64::from(i32::MAX));
        Self::new(x1, y1, width as i32, height as i32)
    }

    /// Exclusive right edge.
    pub fn x2(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn y2(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        x >= i64::from(self.x) && x < self.x2() && y >= i64::from(self.y) && y < self.y2()
    }

    /// Intersection with `bounds`. Disjoint rectangles give an empty area.
    pub fn clip_by(&self, bounds: &Area) -> Area {
        let x1 = self.x.max(bounds.x);
        let y1 = self.y.max(bounds.y);
        let x2 = self.x2().min(bounds.x2());
        let y2 = self.y2().min(bounds.y2());

        let width = (x2 - i64::from(x1)).max(0);
        let height = (y2 - i64::from(y1)).max(0);
        Area::new(x1, y1, width as i32, height as i32)
    }

    /// Row and column index ranges of a non-empty area with non-negative origin.
    ///
    /// Callers clip by the raster bounds first; negative origins clamp to zero.
    pub(crate) fn index_ranges(&self) -> (Range<usize>, Range<usize>) {
        let x = self.x.max(0) as usize;
        let y = self.y.max(0) as usize;
        let width = self.width.max(0) as usize;
        let height = self.height.max(0) as usize;
        (y..y + height, x..x + width)
    }
}
