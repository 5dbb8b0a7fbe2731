//! panelorder - Reading-order reconstruction for comic pages.
//!
//! Takes the objects a detector found on a page (panels, balloons, text
//! blocks, ...) and returns the content objects in the order a reader would
//! follow them: panel by panel in the book's direction, then group by group
//! inside a panel, then object by object inside a group.

pub mod compare;
pub mod error;
pub mod grouping;
pub mod model;
pub mod order;
pub mod panel;
pub mod params;
pub mod spatial;
pub mod utils;

pub use error::{OrderError, Result};
pub use model::{
    DetectedObject, NormalizedBox, ObjectClass, PageContext, PlacedObject, ReadingDirection,
    SYNTHETIC_PANEL_ID,
};
pub use order::{
    ObjectGroup, Page, PageLayout, PanelLayout, generate_read_ordered_objects,
    generate_read_ordered_objects_with, order_pages, read_order_layout,
};
pub use params::{OrderParams, Tolerances};
