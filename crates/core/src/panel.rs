//! Parent panel selection for content objects.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::model::PlacedObject;
use crate::spatial::SpatialIndex;
use crate::utils::{Rect, intersection_area};

/// Picks the parent panel of `rect` among index hits.
///
/// Among the panel entries of `hits`, the one with the largest overlap area
/// wins. Equal areas go to the lowest panel id, then the lowest entry id.
/// Returns the entry id of the winner, or `None` when no panel is hit.
pub fn select_parent_panel(rect: Rect, hits: &[(usize, &PlacedObject)]) -> Option<usize> {
    hits.iter()
        .filter(|(_, item)| item.is_panel())
        .max_by_key(|(entry, item)| {
            (
                OrderedFloat(intersection_area(rect, item.rect)),
                Reverse(item.object.id),
                Reverse(*entry),
            )
        })
        .map(|(entry, _)| *entry)
}

/// Answers panel membership questions against a page index.
#[derive(Clone, Copy)]
pub struct PanelAssigner<'a> {
    index: &'a SpatialIndex<PlacedObject>,
}

impl<'a> PanelAssigner<'a> {
    pub fn new(index: &'a SpatialIndex<PlacedObject>) -> Self {
        Self { index }
    }

    /// Entry ids of every panel intersecting `rect`, ascending.
    pub fn intersecting_panels(&self, rect: Rect) -> Vec<usize> {
        let mut panels: Vec<usize> = self
            .index
            .search(rect)
            .into_iter()
            .filter(|(_, item)| item.is_panel())
            .map(|(entry, _)| entry)
            .collect();
        panels.sort_unstable();
        panels
    }

    /// Entry id of the panel that encloses `rect` best, if any panel intersects it.
    pub fn parent_panel(&self, rect: Rect) -> Option<usize> {
        select_parent_panel(rect, &self.index.search(rect))
    }
}
