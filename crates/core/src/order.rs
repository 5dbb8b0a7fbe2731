//! Page reading order.
//!
//! Ties the passes together: the page index is built once, content objects
//! are grouped and bucketed by panel, then panels, groups and objects are
//! sorted with the reading comparators and flattened.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::compare::ReadingComparators;
use crate::error::Result;
use crate::grouping::{NeighbourGrouper, PanelGroup};
use crate::model::{DetectedObject, NormalizedBox, PageContext, PlacedObject};
use crate::params::OrderParams;
use crate::spatial::SpatialIndex;
use crate::utils::{Rect, insertion_sort_by};

/// Objects of one group, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    pub objects: Vec<DetectedObject>,
    /// Normalized bounding box of `objects`.
    pub bounds: NormalizedBox,
}

/// A panel and its groups, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    /// The detected panel, or a synthesized one (see
    /// [`DetectedObject::is_synthetic`]) covering a group that lies outside
    /// every detected panel.
    pub panel: DetectedObject,
    pub groups: Vec<ObjectGroup>,
}

impl PanelLayout {
    /// Iterates over the content objects of the panel in reading order.
    pub fn objects(&self) -> impl Iterator<Item = &DetectedObject> {
        self.groups.iter().flat_map(|g| g.objects.iter())
    }
}

/// Reading structure of a page: panels, then groups, then objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub panels: Vec<PanelLayout>,
}

impl PageLayout {
    /// Iterates over every content object in reading order.
    pub fn objects(&self) -> impl Iterator<Item = &DetectedObject> {
        self.panels.iter().flat_map(PanelLayout::objects)
    }

    /// Number of content objects on the page.
    pub fn len(&self) -> usize {
        self.panels
            .iter()
            .flat_map(|p| p.groups.iter())
            .map(|g| g.objects.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the layout into the final reading sequence.
    pub fn into_objects(self) -> Vec<DetectedObject> {
        self.panels
            .into_iter()
            .flat_map(|p| p.groups)
            .flat_map(|g| g.objects)
            .collect()
    }
}

/// One page of detected objects, for batch ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub context: PageContext,
    pub objects: Vec<DetectedObject>,
}

/// A panel bucket while the page is being assembled.
struct Bucket {
    panel: DetectedObject,
    rect: Rect,
    groups: Vec<PanelGroup>,
}

/// Orders the content objects of a page with the default parameters.
pub fn generate_read_ordered_objects(
    objects: &[DetectedObject],
    page: &PageContext,
) -> Result<Vec<DetectedObject>> {
    generate_read_ordered_objects_with(objects, page, &OrderParams::default())
}

/// Orders the content objects of a page.
///
/// The result holds every content object exactly once and no panel object.
///
/// # Errors
/// Fails only on an empty page size or invalid `params`.
pub fn generate_read_ordered_objects_with(
    objects: &[DetectedObject],
    page: &PageContext,
    params: &OrderParams,
) -> Result<Vec<DetectedObject>> {
    read_order_layout(objects, page, params).map(PageLayout::into_objects)
}

/// Builds the sorted panel / group / object hierarchy of a page.
///
/// # Errors
/// Fails only on an empty page size or invalid `params`.
pub fn read_order_layout(
    objects: &[DetectedObject],
    page: &PageContext,
    params: &OrderParams,
) -> Result<PageLayout> {
    page.validate()?;
    params.validate()?;

    let content_count = objects.iter().filter(|o| o.is_content()).count();
    if content_count == 0 {
        return Ok(PageLayout::default());
    }

    let tolerances = params.tolerances(page);
    let index = SpatialIndex::build(objects.iter().map(|o| PlacedObject::new(*o, page)));
    let mut grouper = NeighbourGrouper::new(&index, tolerances.neighbour);

    // Seeds in ascending object id so that buckets and groups come out the
    // same whatever the input order.
    let mut seeds: Vec<(i64, usize)> = index
        .iter()
        .filter(|(_, item)| !item.is_panel())
        .map(|(entry, item)| (item.object.id, entry))
        .collect();
    seeds.sort_unstable();

    let mut buckets: Vec<Bucket> = Vec::new();
    let mut bucket_of_panel: FxHashMap<usize, usize> = FxHashMap::default();
    for (_, seed) in seeds {
        let Some(group) = grouper.grow(seed) else {
            continue;
        };
        match group.panel.and_then(|p| index.get(p).map(|item| (p, item))) {
            Some((panel_entry, item)) => {
                let slot = *bucket_of_panel.entry(panel_entry).or_insert_with(|| {
                    buckets.push(Bucket {
                        panel: item.object,
                        rect: item.rect,
                        groups: Vec::new(),
                    });
                    buckets.len() - 1
                });
                buckets[slot].groups.push(group);
            }
            None => {
                let bounds = group_bounds(&index, &group);
                buckets.push(Bucket {
                    panel: DetectedObject::synthetic_panel(bounds),
                    rect: group.bounding_rect,
                    groups: vec![group],
                });
            }
        }
    }

    let compare = ReadingComparators::new(page.direction, tolerances);
    insertion_sort_by(&mut buckets, |a, b| compare.panels(a.rect, b.rect));

    let mut group_count = 0;
    let panels: Vec<PanelLayout> = buckets
        .into_iter()
        .map(|mut bucket| {
            insertion_sort_by(&mut bucket.groups, |a, b| {
                compare.groups(a.bounding_rect, b.bounding_rect)
            });
            group_count += bucket.groups.len();
            let groups = bucket
                .groups
                .iter()
                .map(|group| order_group(&index, group, &compare))
                .collect();
            PanelLayout {
                panel: bucket.panel,
                groups,
            }
        })
        .collect();

    let layout = PageLayout { panels };
    debug!(
        objects = objects.len(),
        content = content_count,
        panels = layout.panels.len(),
        groups = group_count,
        direction = ?page.direction,
        "ordered page"
    );
    debug_assert_eq!(layout.len(), content_count);
    Ok(layout)
}

/// Orders many independent pages in parallel.
///
/// Results are returned in the order of `pages`.
pub fn order_pages(pages: &[Page], params: &OrderParams) -> Vec<Result<Vec<DetectedObject>>> {
    pages
        .par_iter()
        .map(|page| generate_read_ordered_objects_with(&page.objects, &page.context, params))
        .collect()
}

fn group_bounds(index: &SpatialIndex<PlacedObject>, group: &PanelGroup) -> NormalizedBox {
    group
        .members
        .iter()
        .filter_map(|&m| index.get(m))
        .map(|item| item.object.bbox)
        .reduce(NormalizedBox::union)
        .unwrap_or(NormalizedBox::new(0.0, 0.0, 0.0, 0.0))
}

fn order_group(
    index: &SpatialIndex<PlacedObject>,
    group: &PanelGroup,
    compare: &ReadingComparators,
) -> ObjectGroup {
    let mut members: Vec<&PlacedObject> =
        group.members.iter().filter_map(|&m| index.get(m)).collect();
    members.sort_by_key(|item| item.object.id);
    insertion_sort_by(&mut members, |a, b| compare.objects(a.rect, b.rect));

    ObjectGroup {
        objects: members.iter().map(|item| item.object).collect(),
        bounds: group_bounds(index, group),
    }
}
