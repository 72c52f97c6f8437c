//! Core types for spark-motion.
//!
//! Geometry, color and element handles shared by every subsystem. These flow
//! from the host into the observers and out of the cursor renderer.

use std::fmt;

// =============================================================================
// Geometry
// =============================================================================

/// A point in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle in page pixels.
///
/// `x`/`y` is the top-left corner. Width and height are never negative once
/// constructed through [`Rect::new`]; [`Rect::expand`] may produce an empty
/// rectangle but clamps to zero size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Check whether a point lies inside (edges inclusive on top/left).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Grow each edge outward by the given amounts. Negative values shrink.
    ///
    /// A rectangle shrunk past zero collapses to an empty rect centered on
    /// the remaining span.
    pub fn expand(&self, top: f32, right: f32, bottom: f32, left: f32) -> Rect {
        let x0 = self.left() - left;
        let x1 = self.right() + right;
        let y0 = self.top() - top;
        let y1 = self.bottom() + bottom;
        let (x0, x1) = if x1 < x0 { ((x0 + x1) / 2.0, (x0 + x1) / 2.0) } else { (x0, x1) };
        let (y0, y1) = if y1 < y0 { ((y0 + y1) / 2.0, (y0 + y1) / 2.0) } else { (y0, y1) };
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Intersection of two rectangles.
    ///
    /// Touching edges produce a zero-area intersection (`Some`), matching
    /// how browsers report edge-adjacent targets as intersecting.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.left().max(other.left());
        let x1 = self.right().min(other.right());
        let y0 = self.top().max(other.top());
        let y1 = self.bottom().min(other.bottom());
        if x0 <= x1 && y0 <= y1 {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    /// Move the rectangle by an offset.
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque color from a `0xRRGGBB` integer.
    ///
    /// ```
    /// use spark_motion::types::Rgba;
    ///
    /// let sage = Rgba::from_rgb_int(0xa3b18a);
    /// assert_eq!(sage, Rgba::rgb(0xa3, 0xb1, 0x8a));
    /// ```
    pub const fn from_rgb_int(value: u32) -> Self {
        Self::rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// How the cursor visual composites over page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Difference,
}

// =============================================================================
// Element handles
// =============================================================================

/// Opaque handle to an element in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_expand_negative_shrinks() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let shrunk = viewport.expand(-100.0, -100.0, -100.0, -100.0);
        assert_eq!(shrunk, Rect::new(100.0, 100.0, 800.0, 600.0));
    }

    #[test]
    fn test_rect_expand_collapses() {
        let small = Rect::new(0.0, 0.0, 100.0, 100.0);
        let collapsed = small.expand(-80.0, 0.0, -80.0, 0.0);
        assert_eq!(collapsed.height, 0.0);
        assert_eq!(collapsed.y, 50.0);
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        let far = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert_eq!(a.intersection(&far), None);

        // Edge contact still intersects, with zero area
        let touching = Rect::new(100.0, 0.0, 10.0, 10.0);
        let hit = a.intersection(&touching).unwrap();
        assert_eq!(hit.area(), 0.0);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(29.0, 29.0)));
        assert!(!r.contains(Point::new(30.0, 15.0)));
    }

    #[test]
    fn test_rgba_display() {
        assert_eq!(Rgba::from_rgb_int(0x3a5a40).to_string(), "#3a5a40");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_string(), "#01020304");
    }
}
