//! Geometric routines shared by the ordering passes.
//!
//! Provides:
//! - Pixel-space rectangle type and the `HasBBox` accessor trait
//! - Area, union, overlap and gap-distance helpers
//! - A stable insertion sort that tolerates non-transitive comparators

use std::cmp::Ordering;

/// A rectangle `(x0, y0, x1, y1)` in page pixels.
///
/// `(x0, y0)` is the top-left corner and `(x1, y1)` the bottom-right corner;
/// y grows downward, matching image coordinates.
pub type Rect = (f64, f64, f64, f64);

/// A 2D point (x, y) in page pixels.
pub type Point = (f64, f64);

/// Trait for objects that have a bounding box in page pixels.
pub trait HasBBox {
    fn x0(&self) -> f64;
    fn y0(&self) -> f64;
    fn x1(&self) -> f64;
    fn y1(&self) -> f64;

    fn bbox(&self) -> Rect {
        (self.x0(), self.y0(), self.x1(), self.y1())
    }

    fn width(&self) -> f64 {
        self.x1() - self.x0()
    }

    fn height(&self) -> f64 {
        self.y1() - self.y0()
    }
}

impl HasBBox for Rect {
    fn x0(&self) -> f64 {
        self.0
    }

    fn y0(&self) -> f64 {
        self.1
    }

    fn x1(&self) -> f64 {
        self.2
    }

    fn y1(&self) -> f64 {
        self.3
    }
}

/// Calculate union of two bounding boxes
pub const fn bbox_union(a: Rect, b: Rect) -> Rect {
    (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
}

/// Closed intersection test: rectangles sharing an edge or a corner intersect.
///
/// Agrees with `bbox_distance(a, b) == 0.0`.
#[inline]
pub fn bbox_intersects(a: Rect, b: Rect) -> bool {
    !(a.2 < b.0 || b.2 < a.0 || a.3 < b.1 || b.3 < a.1)
}

/// Area of the overlap of two rectangles, 0.0 when they are disjoint.
pub fn intersection_area(a: Rect, b: Rect) -> f64 {
    let w = a.2.min(b.2) - a.0.max(b.0);
    let h = a.3.min(b.3) - a.1.max(b.1);
    if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
}

/// Signed length of the horizontal overlap of two rectangles.
///
/// Negative values are the width of the gap between them.
#[inline]
pub fn horizontal_overlap(a: Rect, b: Rect) -> f64 {
    a.2.min(b.2) - a.0.max(b.0)
}

/// Euclidean distance between the closest points of two rectangles.
///
/// Overlapping or touching rectangles are at distance 0.
pub fn bbox_distance(a: Rect, b: Rect) -> f64 {
    let dx = (a.0 - b.2).max(b.0 - a.2).max(0.0);
    let dy = (a.1 - b.3).max(b.1 - a.3).max(0.0);
    dx.hypot(dy)
}

/// Squared distance from a point to the closest point of a rectangle.
pub fn point_distance_2(bbox: Rect, point: Point) -> f64 {
    let dx = (bbox.0 - point.0).max(point.0 - bbox.2).max(0.0);
    let dy = (bbox.1 - point.1).max(point.1 - bbox.3).max(0.0);
    dx * dx + dy * dy
}

/// Grows a rectangle by `margin` on every side.
pub fn bbox_expand(bbox: Rect, margin: f64) -> Rect {
    (
        bbox.0 - margin,
        bbox.1 - margin,
        bbox.2 + margin,
        bbox.3 + margin,
    )
}

/// Stable insertion sort driven by `compare`.
///
/// Tolerance-based reading comparators are not transitive, which the std sorts
/// are allowed to reject with a panic. Insertion sort only ever asks whether an
/// element must move left of its predecessor, so it always terminates and the
/// result depends solely on the input order and the comparator.
pub fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
