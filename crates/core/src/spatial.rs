//! R-tree index over the objects of one page.
//!
//! The index is bulk-loaded once per page and is read-only afterwards. Entry
//! ids are stable and equal the position of the item in the slice it was
//! built from.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::utils::{
    HasBBox, Point, Rect, bbox_distance, bbox_expand, bbox_intersects, point_distance_2,
};

#[derive(Clone, Debug)]
struct IndexNode {
    id: usize,
    bbox: Rect,
}

impl PartialEq for IndexNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl RTreeObject for IndexNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.bbox.0, self.bbox.1], [self.bbox.2, self.bbox.3])
    }
}

impl PointDistance for IndexNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        point_distance_2(self.bbox, (point[0], point[1]))
    }
}

/// Spatial index answering intersection, proximity and nearest queries.
pub struct SpatialIndex<T> {
    /// Items in build order (id == index)
    seq: Vec<T>,
    tree: RTree<IndexNode>,
}

impl<T: HasBBox> SpatialIndex<T> {
    /// Bulk-loads every item. Each item contributes exactly one entry.
    pub fn build(items: impl IntoIterator<Item = T>) -> Self {
        let seq: Vec<T> = items.into_iter().collect();
        let nodes = seq
            .iter()
            .enumerate()
            .map(|(id, item)| IndexNode {
                id,
                bbox: item.bbox(),
            })
            .collect();
        Self {
            seq,
            tree: RTree::bulk_load(nodes),
        }
    }

    /// Returns the item with the given entry id.
    pub fn get(&self, id: usize) -> Option<&T> {
        self.seq.get(id)
    }

    /// Finds entries that intersect `bbox`, returning (id, item) pairs.
    ///
    /// Entries that only touch `bbox` along an edge or at a corner count, so
    /// this returns the same entries as `search_within(bbox, 0.0)`.
    ///
    /// Entries come back in no particular order.
    pub fn search(&self, bbox: Rect) -> Vec<(usize, &T)> {
        let env = AABB::from_corners([bbox.0, bbox.1], [bbox.2, bbox.3]);
        self.tree
            .locate_in_envelope_intersecting(&env)
            .filter(|node| bbox_intersects(node.bbox, bbox))
            .map(|node| (node.id, &self.seq[node.id]))
            .collect()
    }

    /// Finds entries whose box lies within `max_distance` of `bbox`.
    ///
    /// Distance is measured between the closest points of the two boxes, so
    /// intersecting and touching entries are at distance 0 and always match.
    /// Entries come back in no particular order.
    pub fn search_within(&self, bbox: Rect, max_distance: f64) -> Vec<(usize, &T)> {
        let grown = bbox_expand(bbox, max_distance.max(0.0));
        let env = AABB::from_corners([grown.0, grown.1], [grown.2, grown.3]);
        self.tree
            .locate_in_envelope_intersecting(&env)
            .filter(|node| bbox_distance(node.bbox, bbox) <= max_distance)
            .map(|node| (node.id, &self.seq[node.id]))
            .collect()
    }

    /// Finds the `k` entries closest to `point`.
    /// Returns (id, &T) pairs sorted by distance, ties broken by id.
    pub fn nearest(&self, point: Point, k: usize) -> Vec<(usize, &T)> {
        if k == 0 {
            return Vec::new();
        }
        let query = [point.0, point.1];
        let mut results: Vec<(usize, f64)> = Vec::with_capacity(k);
        let mut cutoff = f64::INFINITY;

        for node in self.tree.nearest_neighbor_iter(&query) {
            let dist = node.distance_2(&query);
            // Keep collecting past k while distances tie, so the id tie-break
            // below sees every candidate at the cutoff distance.
            if results.len() >= k && dist > cutoff {
                break;
            }
            results.push((node.id, dist));
            if results.len() == k {
                cutoff = dist;
            }
        }

        results.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        results
            .into_iter()
            .take(k)
            .map(|(id, _)| (id, &self.seq[id]))
            .collect()
    }

    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Returns an iterator over all entries with their ids, in build order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.seq.iter().enumerate()
    }
}
