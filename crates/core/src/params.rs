//! Reading-order parameters.
//!
//! Contains `OrderParams` for controlling the ordering passes and the
//! `Tolerances` derived from it for a concrete page.

use crate::error::{OrderError, Result};
use crate::model::PageContext;

/// Parameters for reading-order reconstruction.
///
/// Every distance is given in pixels of a page at the reference resolution
/// and is scaled to the actual page by area, see [`OrderParams::tolerances`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    /// Width of the reference page the pixel constants were tuned on.
    pub reference_width: u32,

    /// Height of the reference page the pixel constants were tuned on.
    pub reference_height: u32,

    /// Two panels whose tops differ by less than this are on the same row.
    pub panel_min_diff: f64,

    /// Two groups of a panel whose tops differ by less than this are on the
    /// same row.
    pub group_min_diff: f64,

    /// Edges of two grouped objects closer than this are snapped together
    /// before comparing.
    pub object_min_diff: f64,

    /// Content objects closer than this are merged into one group.
    pub object_neighbour_min_diff: f64,

    /// Minimum horizontal overlap, relative to the width of the lower object,
    /// for a lower object to be read after an upper one that follows it
    /// horizontally.
    pub stacked_overlap_ratio: f64,
}

impl Default for OrderParams {
    fn default() -> Self {
        Self {
            reference_width: 1988,
            reference_height: 3056,
            panel_min_diff: 160.0,
            group_min_diff: 80.0,
            object_min_diff: 15.0,
            object_neighbour_min_diff: 50.0,
            stacked_overlap_ratio: 0.15,
        }
    }
}

impl OrderParams {
    /// Checks that the parameters can be scaled to a page.
    pub fn validate(&self) -> Result<()> {
        if self.reference_width == 0 || self.reference_height == 0 {
            return Err(OrderError::InvalidParams(format!(
                "reference resolution {}x{} must be positive",
                self.reference_width, self.reference_height
            )));
        }
        let distances = [
            ("panel_min_diff", self.panel_min_diff),
            ("group_min_diff", self.group_min_diff),
            ("object_min_diff", self.object_min_diff),
            ("object_neighbour_min_diff", self.object_neighbour_min_diff),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(OrderError::InvalidParams(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.stacked_overlap_ratio) {
            return Err(OrderError::InvalidParams(format!(
                "stacked_overlap_ratio must be within [0, 1], got {}",
                self.stacked_overlap_ratio
            )));
        }
        Ok(())
    }

    /// Ratio of the page area to the reference page area.
    pub fn scale_for(&self, page: &PageContext) -> f64 {
        let reference = f64::from(self.reference_width) * f64::from(self.reference_height);
        page.area() / reference
    }

    /// Scales every distance to the pixel size of `page`.
    pub fn tolerances(&self, page: &PageContext) -> Tolerances {
        let scale = self.scale_for(page);
        Tolerances {
            panel: self.panel_min_diff * scale,
            group: self.group_min_diff * scale,
            object: self.object_min_diff * scale,
            neighbour: self.object_neighbour_min_diff * scale,
            stacked_overlap_ratio: self.stacked_overlap_ratio,
        }
    }
}

/// Page-specific tolerances, in pixels of the page being ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub panel: f64,
    pub group: f64,
    pub object: f64,
    pub neighbour: f64,
    pub stacked_overlap_ratio: f64,
}
