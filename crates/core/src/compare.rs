//! Direction-aware, tolerance-based reading comparisons.
//!
//! Every comparison works on page pixel rectangles. Tolerances absorb the
//! jitter of detector boxes: edges closer than the tolerance are treated as
//! aligned. Because of that, none of these orderings is transitive; sort with
//! [`crate::utils::insertion_sort_by`], never with the std sorts.

use std::cmp::Ordering;

use crate::model::ReadingDirection;
use crate::params::Tolerances;
use crate::utils::{Rect, horizontal_overlap};

/// Horizontal reading order of two rectangles.
///
/// Left edge ascending for LTR, right edge descending for RTL.
pub fn compare_horizontal(a: Rect, b: Rect, direction: ReadingDirection) -> Ordering {
    match direction {
        ReadingDirection::Ltr => a.0.total_cmp(&b.0),
        ReadingDirection::Rtl => b.2.total_cmp(&a.2),
    }
}

/// Top edge ascending; tops closer than `min_diff` fall back to the
/// horizontal order.
pub fn compare_primary_axis(
    a: Rect,
    b: Rect,
    direction: ReadingDirection,
    min_diff: f64,
) -> Ordering {
    if (a.1 - b.1).abs() < min_diff {
        compare_horizontal(a, b, direction)
    } else {
        a.1.total_cmp(&b.1)
    }
}

/// Snaps each pair of matching edges closer than `min_diff` to the smaller value.
fn snap_edges(a: Rect, b: Rect, min_diff: f64) -> (Rect, Rect) {
    let snap = |x: f64, y: f64| {
        if (x - y).abs() < min_diff {
            let m = x.min(y);
            (m, m)
        } else {
            (x, y)
        }
    };
    let (ax0, bx0) = snap(a.0, b.0);
    let (ay0, by0) = snap(a.1, b.1);
    let (ax1, bx1) = snap(a.2, b.2);
    let (ay1, by1) = snap(a.3, b.3);
    ((ax0, ay0, ax1, ay1), (bx0, by0, bx1, by1))
}

/// Order of two objects known to share a group.
///
/// Objects on the same (snapped) line read horizontally. Otherwise the upper
/// object reads first if it also precedes horizontally, or if the lower
/// object sits beneath it with at least `stacked_overlap_ratio` of its width
/// under the upper one. A lower object beside the upper one, ahead of it in
/// reading direction, reads first.
pub fn compare_in_group(
    a: Rect,
    b: Rect,
    direction: ReadingDirection,
    min_diff: f64,
    stacked_overlap_ratio: f64,
) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (a, b) = snap_edges(a, b, min_diff);
    if a.1 == b.1 {
        return compare_horizontal(a, b, direction);
    }

    let a_is_upper = a.1 < b.1;
    let (upper, lower) = if a_is_upper { (a, b) } else { (b, a) };

    let upper_first = compare_horizontal(upper, lower, direction) == Ordering::Less
        || horizontal_overlap(upper, lower) >= stacked_overlap_ratio * (lower.2 - lower.0);

    if upper_first == a_is_upper {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// The three comparators used for one page.
#[derive(Debug, Clone, Copy)]
pub struct ReadingComparators {
    pub direction: ReadingDirection,
    pub tolerances: Tolerances,
}

impl ReadingComparators {
    pub const fn new(direction: ReadingDirection, tolerances: Tolerances) -> Self {
        Self {
            direction,
            tolerances,
        }
    }

    /// Orders panel boxes.
    pub fn panels(&self, a: Rect, b: Rect) -> Ordering {
        compare_primary_axis(a, b, self.direction, self.tolerances.panel)
    }

    /// Orders the bounding rectangles of groups inside one panel.
    pub fn groups(&self, a: Rect, b: Rect) -> Ordering {
        compare_primary_axis(a, b, self.direction, self.tolerances.group)
    }

    /// Orders objects inside one group.
    pub fn objects(&self, a: Rect, b: Rect) -> Ordering {
        compare_in_group(
            a,
            b,
            self.direction,
            self.tolerances.object,
            self.tolerances.stacked_overlap_ratio,
        )
    }
}
