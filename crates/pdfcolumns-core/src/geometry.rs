use crate::error::LayoutError;

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with top-left origin coordinate system.
///
/// Coordinates are in page space, with y growing downward:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
///
/// Rectangles are plain values. Use [`Rect::try_new`] at API boundaries to
/// reject non-finite coordinates or negative extents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Build a rectangle from its origin and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Build a rectangle, rejecting non-finite coordinates and negative extents.
    pub fn try_new(x0: f64, top: f64, x1: f64, bottom: f64) -> Result<Self, LayoutError> {
        Self::new(x0, top, x1, bottom).validated()
    }

    /// Check this rectangle's coordinates, returning it unchanged when valid.
    pub fn validated(self) -> Result<Self, LayoutError> {
        if ![self.x0, self.top, self.x1, self.bottom]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(LayoutError::InvalidRect {
                rect: self,
                reason: "coordinates must be finite",
            });
        }
        if self.width() < 0.0 {
            return Err(LayoutError::InvalidRect {
                rect: self,
                reason: "width must not be negative",
            });
        }
        if self.height() < 0.0 {
            return Err(LayoutError::InvalidRect {
                rect: self,
                reason: "height must not be negative",
            });
        }
        Ok(self)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn end_x(&self) -> f64 {
        self.x1
    }

    pub fn end_y(&self) -> f64 {
        self.bottom
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn centre(&self) -> Point {
        Point::new(self.middle_x(), self.middle_y())
    }

    pub fn middle_x(&self) -> f64 {
        self.x0 + self.width() / 2.0
    }

    pub fn middle_y(&self) -> f64 {
        self.top + self.height() / 2.0
    }

    /// True if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// True if `other` lies completely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x0 <= other.x0
            && self.x1 >= other.x1
            && self.top <= other.top
            && self.bottom >= other.bottom
    }

    /// Intersection test used by all region queries.
    ///
    /// Touching on a vertical edge counts as intersecting; on the horizontal
    /// axis `other` must extend strictly below this rectangle's top.
    /// An empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() {
            return false;
        }
        if other.x1 < self.x0 || other.x0 > self.x1 || other.top > self.bottom {
            return false;
        }
        other.bottom > self.top
    }

    /// Like [`intersects`](Rect::intersects), but every edge is pulled inwards
    /// by `overlap`, so rectangles that only overlap by less than `overlap`
    /// are treated as disjoint.
    pub fn intersects_admitting_overlap(&self, other: &Rect, overlap: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        if other.x1 < self.x0 + overlap
            || other.x0 > self.x1 - overlap
            || other.top > self.bottom - overlap
        {
            return false;
        }
        other.bottom > self.top + overlap
    }

    /// The overlapping part of both rectangles.
    ///
    /// Disjoint rectangles yield a zero-sized rectangle, so `area()` of the
    /// result is always the overlap area.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);

        if x1 <= x0 || bottom <= top {
            return Rect::new(x0, top, x0, top);
        }
        Rect::new(x0, top, x1, bottom)
    }

    /// Compute the union of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Euclidean gap between two rectangles, 0 if they intersect.
    pub fn distance(&self, other: &Rect) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }

        let dx = if self.x0 > other.x1 {
            self.x0 - other.x1
        } else if other.x0 > self.x1 {
            other.x0 - self.x1
        } else {
            0.0
        };
        let dy = if self.top > other.bottom {
            self.top - other.bottom
        } else if other.top > self.bottom {
            other.top - self.bottom
        } else {
            0.0
        };

        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from the rectangle to a point, 0 if the point is inside.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        let dx = if p.x < self.x0 {
            self.x0 - p.x
        } else if p.x > self.x1 {
            p.x - self.x1
        } else {
            0.0
        };
        let dy = if p.y < self.top {
            self.top - p.y
        } else if p.y > self.bottom {
            p.y - self.bottom
        } else {
            0.0
        };

        (dx * dx + dy * dy).sqrt()
    }

    /// Grow every side by `delta`. A negative `delta` shrinks the rectangle;
    /// an axis that would invert collapses onto its midpoint instead.
    pub fn adjusted_by(&self, delta: f64) -> Rect {
        let (x0, x1) = collapse(self.x0 - delta, self.x1 + delta);
        let (top, bottom) = collapse(self.top - delta, self.bottom + delta);
        Rect::new(x0, top, x1, bottom)
    }

    /// The same rectangle moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x0 + dx, self.top + dy, self.x1 + dx, self.bottom + dy)
    }
}

fn collapse(lo: f64, hi: f64) -> (f64, f64) {
    if hi < lo {
        let mid = (lo + hi) / 2.0;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_new() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.x0, 10.0);
        assert_eq!(rect.top, 20.0);
        assert_eq!(rect.x1, 30.0);
        assert_eq!(rect.bottom, 40.0);
    }

    #[test]
    fn test_rect_from_xywh() {
        let rect = Rect::from_xywh(10.0, 20.0, 5.0, 8.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 15.0, 28.0));
        assert_eq!(rect.end_x(), 15.0);
        assert_eq!(rect.end_y(), 28.0);
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(10.0, 20.0, 50.0, 60.0);
        assert_eq!(rect.width(), 40.0);
        assert_eq!(rect.height(), 40.0);
        assert_eq!(rect.area(), 1600.0);
        assert_eq!(rect.centre(), Point::new(30.0, 40.0));
        assert_eq!(rect.middle_x(), 30.0);
    }

    #[test]
    fn test_try_new_rejects_negative_width() {
        let err = Rect::try_new(10.0, 0.0, 5.0, 10.0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidRect { .. }));
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn test_try_new_rejects_nan() {
        assert!(Rect::try_new(f64::NAN, 0.0, 5.0, 10.0).is_err());
        assert!(Rect::try_new(0.0, 0.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_try_new_accepts_zero_height_line() {
        let line = Rect::try_new(0.0, 10.0, 100.0, 10.0).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(10.0, 20.0, 30.0, 40.0);
        let b = Rect::new(5.0, 25.0, 35.0, 45.0);
        assert_eq!(a.union(&b), Rect::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn test_intersection_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 20.0);
        let i = a.intersection(&b);
        assert_eq!(i, Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(i.area(), 25.0);
    }

    #[test]
    fn test_intersection_disjoint_is_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        let i = a.intersection(&b);
        assert!(i.is_empty());
        assert_eq!(i.area(), 0.0);
    }

    #[test]
    fn test_intersects_touching_edge() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        let c = Rect::new(0.0, 10.5, 10.0, 20.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_empty_rect_intersects_nothing() {
        let line = Rect::new(0.0, 5.0, 10.0, 5.0);
        let b = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!line.intersects(&b));
        assert!(b.intersects(&line));
    }

    #[test]
    fn test_intersects_admitting_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // overlaps by one unit on the x axis
        let b = Rect::new(9.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects_admitting_overlap(&b, 1.5));
        assert!(a.intersects_admitting_overlap(&b, 0.5));
    }

    #[test]
    fn test_distance() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.distance(&Rect::new(5.0, 5.0, 8.0, 8.0)), 0.0);
        assert_eq!(a.distance(&Rect::new(13.0, 0.0, 20.0, 10.0)), 3.0);
        assert_eq!(a.distance(&Rect::new(13.0, 14.0, 20.0, 20.0)), 5.0);
    }

    #[test]
    fn test_distance_to_point() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.distance_to_point(Point::new(5.0, 5.0)), 0.0);
        assert_eq!(a.distance_to_point(Point::new(13.0, 14.0)), 5.0);
    }

    #[test]
    fn test_adjusted_by() {
        let a = Rect::new(10.0, 10.0, 30.0, 20.0);
        assert_eq!(a.adjusted_by(2.0), Rect::new(8.0, 8.0, 32.0, 22.0));
        assert_eq!(a.adjusted_by(-1.0), Rect::new(11.0, 11.0, 29.0, 19.0));
    }

    #[test]
    fn test_adjusted_by_collapses_instead_of_inverting() {
        let a = Rect::new(10.0, 10.0, 12.0, 40.0);
        let shrunk = a.adjusted_by(-3.0);
        assert_eq!(shrunk.width(), 0.0);
        assert_eq!(shrunk.x0, 11.0);
        assert_eq!(shrunk.height(), 24.0);
    }

    #[test]
    fn test_contains_and_translated() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(&Rect::new(2.0, 2.0, 8.0, 8.0)));
        assert!(!a.contains(&Rect::new(2.0, 2.0, 12.0, 8.0)));
        assert_eq!(a.translated(5.0, -2.0), Rect::new(5.0, -2.0, 15.0, 8.0));
    }
}
