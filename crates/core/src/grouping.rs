//! Neighbour grouping of content objects.
//!
//! A group starts at a seed object and grows through every not yet grouped
//! content object within the neighbour distance that belongs to the same
//! panel as the seed. Each content object ends up in exactly one group.

use tracing::trace;

use crate::model::PlacedObject;
use crate::panel::PanelAssigner;
use crate::spatial::SpatialIndex;
use crate::utils::{Rect, bbox_union};

/// Content objects of one panel read as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGroup {
    /// Entry ids of the members, in discovery order.
    pub members: Vec<usize>,
    /// Minimum bounding rectangle of the members, in page pixels.
    pub bounding_rect: Rect,
    /// Entry id of the parent panel shared by every member.
    pub panel: Option<usize>,
}

impl PanelGroup {
    fn new(seed: usize, rect: Rect, panel: Option<usize>) -> Self {
        Self {
            members: vec![seed],
            bounding_rect: rect,
            panel,
        }
    }

    fn push(&mut self, member: usize, rect: Rect) {
        self.members.push(member);
        self.bounding_rect = bbox_union(self.bounding_rect, rect);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Forms groups over one page index.
///
/// The consumed flags live as long as the grouper, so every group formed
/// during a page pass draws from the same pool of objects.
pub struct NeighbourGrouper<'a> {
    index: &'a SpatialIndex<PlacedObject>,
    assigner: PanelAssigner<'a>,
    max_distance: f64,
    done: Vec<bool>,
}

impl<'a> NeighbourGrouper<'a> {
    pub fn new(index: &'a SpatialIndex<PlacedObject>, max_distance: f64) -> Self {
        Self {
            index,
            assigner: PanelAssigner::new(index),
            max_distance,
            done: vec![false; index.len()],
        }
    }

    /// Returns true once `entry` has been placed in a group.
    pub fn is_consumed(&self, entry: usize) -> bool {
        self.done.get(entry).copied().unwrap_or(false)
    }

    /// Grows the group seeded by `seed`.
    ///
    /// Returns `None` when `seed` is a panel, unknown, or already grouped.
    pub fn grow(&mut self, seed: usize) -> Option<PanelGroup> {
        let index = self.index;
        let seed_item = index.get(seed)?;
        if seed_item.is_panel() || self.is_consumed(seed) {
            return None;
        }

        let panel = self.assigner.parent_panel(seed_item.rect);
        let mut group = PanelGroup::new(seed, seed_item.rect, panel);
        self.done[seed] = true;

        // Depth-first over an explicit stack; neighbours are visited in
        // ascending object id so group membership never depends on how the
        // index happens to return them.
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            let rect = index.get(current)?.rect;
            let mut found: Vec<(usize, &PlacedObject)> = index
                .search_within(rect, self.max_distance)
                .into_iter()
                .filter(|(entry, item)| !item.is_panel() && !self.done[*entry])
                .collect();
            found.sort_by_key(|(entry, item)| (item.object.id, *entry));

            for (entry, item) in found.into_iter().rev() {
                if self.done[entry] || !self.shares_panel(item.rect, panel) {
                    continue;
                }
                self.done[entry] = true;
                group.push(entry, item.rect);
                stack.push(entry);
            }
        }

        trace!(
            seed = seed_item.object.id,
            members = group.len(),
            panel = ?panel.and_then(|p| index.get(p)).map(|p| p.object.id),
            "formed group"
        );
        Some(group)
    }

    /// A neighbour joins only if it intersects the group's panel, or, for a
    /// group without panel, if it intersects no panel at all.
    fn shares_panel(&self, rect: Rect, panel: Option<usize>) -> bool {
        let panels = self.assigner.intersecting_panels(rect);
        match panel {
            Some(panel) => panels.binary_search(&panel).is_ok(),
            None => panels.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DetectedObject, NormalizedBox, ObjectClass, PageContext, ReadingDirection};

    fn index(objects: &[(i64, ObjectClass, (f64, f64, f64, f64))]) -> SpatialIndex<PlacedObject> {
        let page = PageContext::new(1000, 1000, ReadingDirection::Ltr).unwrap();
        SpatialIndex::build(objects.iter().map(|&(id, class, b)| {
            let obj = DetectedObject::new(id, class, 0.9, NormalizedBox::new(b.0, b.1, b.2, b.3));
            PlacedObject::new(obj, &page)
        }))
    }

    fn member_ids(index: &SpatialIndex<PlacedObject>, group: &PanelGroup) -> Vec<i64> {
        let mut ids: Vec<i64> = group
            .members
            .iter()
            .map(|&m| index.get(m).unwrap().object.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_chain_of_neighbours_forms_one_group() {
        let index = index(&[
            (1, ObjectClass::Balloon, (0.10, 0.10, 0.20, 0.20)),
            (2, ObjectClass::Balloon, (0.10, 0.21, 0.20, 0.30)),
            (3, ObjectClass::Balloon, (0.10, 0.31, 0.20, 0.40)),
            (4, ObjectClass::Balloon, (0.60, 0.60, 0.70, 0.70)),
        ]);
        let mut grouper = NeighbourGrouper::new(&index, 20.0);
        let group = grouper.grow(0).unwrap();
        assert_eq!(member_ids(&index, &group), vec![1, 2, 3]);
        assert_eq!(group.bounding_rect, (100.0, 100.0, 400.0, 200.0));
        assert_eq!(group.panel, None);

        assert!(grouper.grow(1).is_none());
        let lone = grouper.grow(3).unwrap();
        assert_eq!(member_ids(&index, &lone), vec![4]);
    }

    #[test]
    fn test_neighbour_in_other_panel_is_excluded() {
        let index = index(&[
            (10, ObjectClass::Panel, (0.0, 0.0, 0.5, 0.5)),
            (11, ObjectClass::Panel, (0.0, 0.5, 0.5, 1.0)),
            (1, ObjectClass::Balloon, (0.10, 0.40, 0.20, 0.49)),
            (2, ObjectClass::Balloon, (0.10, 0.51, 0.20, 0.60)),
        ]);
        let mut grouper = NeighbourGrouper::new(&index, 50.0);
        let group = grouper.grow(2).unwrap();
        assert_eq!(member_ids(&index, &group), vec![1]);
        assert_eq!(group.panel, Some(0));
        assert!(!grouper.is_consumed(3));
    }

    #[test]
    fn test_panelless_seed_skips_neighbours_inside_panels() {
        let index = index(&[
            (10, ObjectClass::Panel, (0.0, 0.0, 0.5, 0.5)),
            (1, ObjectClass::Balloon, (0.10, 0.52, 0.20, 0.60)),
            (2, ObjectClass::Balloon, (0.10, 0.40, 0.20, 0.49)),
        ]);
        let mut grouper = NeighbourGrouper::new(&index, 50.0);
        let group = grouper.grow(1).unwrap();
        assert_eq!(member_ids(&index, &group), vec![1]);
        assert_eq!(group.panel, None);
    }

    #[test]
    fn test_panels_are_never_seeds() {
        let index = index(&[(10, ObjectClass::Panel, (0.0, 0.0, 1.0, 1.0))]);
        let mut grouper = NeighbourGrouper::new(&index, 50.0);
        assert!(grouper.grow(0).is_none());
        assert!(grouper.grow(5).is_none());
    }
}
