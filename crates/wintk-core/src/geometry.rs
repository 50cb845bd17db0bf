#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are signed: a drawable positioned partially above or to the
//! left of its container has a negative origin. Sizes are always at least
//! 1x1 and this is enforced at construction, never clamped silently.
//!
//! Rectangles use inclusive-inclusive bounds: `max_x = min_x + width - 1`.
//! All intermediate arithmetic runs in `i64` so that combined translations
//! near the `i32` limits cannot overflow.

/// Error produced by geometry constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A size with non-positive width or height was requested.
    DegenerateSize {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
}

impl core::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DegenerateSize { width, height } => {
                write!(f, "degenerate size {width}x{height}: both dimensions must be >= 1")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// A position in cell coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Column offset. May be negative.
    pub x: i32,
    /// Row offset. May be negative.
    pub y: i32,
}

impl Point {
    /// The origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise translation, saturating at the `i32` limits.
    #[inline]
    pub const fn translate(&self, other: Point) -> Point {
        Point {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }

    /// Component-wise negation, saturating at the `i32` limits.
    #[inline]
    pub const fn negate(&self) -> Point {
        Point {
            x: self.x.saturating_neg(),
            y: self.y.saturating_neg(),
        }
    }
}

/// A width/height pair. Both dimensions are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    /// Create a new size.
    ///
    /// Returns [`GeometryError::DegenerateSize`] unless both dimensions are
    /// at least 1.
    pub const fn new(width: i32, height: i32) -> Result<Self, GeometryError> {
        if width < 1 || height < 1 {
            return Err(GeometryError::DegenerateSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in cells (>= 1).
    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells (>= 1).
    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

/// A rectangle defined by an origin and a size.
///
/// Bounds are inclusive on both ends: a 1x1 rect at the origin has
/// `min_x == max_x == 0`. Because [`Size`] forbids degenerate dimensions,
/// every `Rect` covers at least one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent. Both dimensions >= 1.
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(Point::ZERO, size)
    }

    /// Left edge (inclusive).
    #[inline]
    pub const fn min_x(&self) -> i32 {
        self.origin.x
    }

    /// Top edge (inclusive).
    #[inline]
    pub const fn min_y(&self) -> i32 {
        self.origin.y
    }

    /// Right edge (inclusive).
    #[inline]
    pub fn max_x(&self) -> i32 {
        clamp_i64(self.origin.x as i64 + self.size.width() as i64 - 1)
    }

    /// Bottom edge (inclusive).
    #[inline]
    pub fn max_y(&self) -> i32 {
        clamp_i64(self.origin.y as i64 + self.size.height() as i64 - 1)
    }

    /// Width in cells.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.size.width()
    }

    /// Height in cells.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.size.height()
    }

    /// This rectangle translated to the origin, keeping its size.
    #[inline]
    pub const fn zero(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// This rectangle translated by `delta`.
    #[inline]
    pub const fn translate(&self, delta: Point) -> Rect {
        Rect::new(self.origin.translate(delta), self.size)
    }

    /// Check whether a point lies inside the rectangle.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// Check whether `other` lies entirely inside this rectangle.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Check whether the two rectangles share at least one cell.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// The maximal rectangle contained in both, or `None` if they are
    /// disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.min_x().max(other.min_x());
        let min_y = self.min_y().max(other.min_y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());

        if min_x > max_x || min_y > max_y {
            return None;
        }

        // The intersection never exceeds either input, so the width and
        // height fit in i32.
        let size = Size::new((max_x - min_x) + 1, (max_y - min_y) + 1)
            .unwrap_or_else(|_| unreachable!("intersection bounds are ordered"));
        Some(Rect::new(Point::new(min_x, min_y), size))
    }

    /// The smallest rectangle containing both, whether or not they overlap.
    ///
    /// Extents that would exceed the `i32` range are clamped to `i32::MAX`.
    pub fn combine(&self, other: &Rect) -> Rect {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x()) as i64;
        let max_y = self.max_y().max(other.max_y()) as i64;

        let width = clamp_i64(max_x - min_x as i64 + 1);
        let height = clamp_i64(max_y - min_y as i64 + 1);
        let size = Size::new(width, height)
            .unwrap_or_else(|_| unreachable!("bounding box contains both inputs"));
        Rect::new(Point::new(min_x, min_y), size)
    }
}

#[inline]
fn clamp_i64(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}


#[cfg(test)]
mod geometry_proptests {
    use super::{Point, Rect, Size};
    use proptest::prelude::*;

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-1000i32..1000, -1000i32..1000, 1i32..200, 1i32..200)
            .prop_map(|(x, y, w, h)| Rect::new(Point::new(x, y), Size::new(w, h).unwrap()))
    }

    proptest! {
        #[test]
        fn intersects_iff_intersection_some(pair in (arb_rect(), arb_rect())) {
            let (a, b) = pair;
            prop_assert_eq!(a.intersects(&b), a.intersection(&b).is_some());
        }

        #[test]
        fn intersection_is_commutative(pair in (arb_rect(), arb_rect())) {
            let (a, b) = pair;
            prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        }

        #[test]
        fn intersection_contained_in_both(pair in (arb_rect(), arb_rect())) {
            let (a, b) = pair;
            if let Some(i) = a.intersection(&b) {
                prop_assert!(a.contains_rect(&i));
                prop_assert!(b.contains_rect(&i));
            }
        }

        #[test]
        fn combine_contains_both(pair in (arb_rect(), arb_rect())) {
            let (a, b) = pair;
            let c = a.combine(&b);
            prop_assert!(c.contains_rect(&a));
            prop_assert!(c.contains_rect(&b));
        }

        #[test]
        fn combine_is_minimal(pair in (arb_rect(), arb_rect())) {
            // Every edge of the bounding box is touched by one of the inputs.
            let (a, b) = pair;
            let c = a.combine(&b);
            prop_assert_eq!(c.min_x(), a.min_x().min(b.min_x()));
            prop_assert_eq!(c.min_y(), a.min_y().min(b.min_y()));
            prop_assert_eq!(c.max_x(), a.max_x().max(b.max_x()));
            prop_assert_eq!(c.max_y(), a.max_y().max(b.max_y()));
        }

        #[test]
        fn zero_preserves_size(r in arb_rect()) {
            let z = r.zero();
            prop_assert_eq!(z.origin, Point::ZERO);
            prop_assert_eq!(z.size, r.size);
        }
    }
}
