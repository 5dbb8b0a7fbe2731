//! Detected page objects and the page they live on.
//!
//! These are the value types handed over by the detection layer. Boxes are
//! normalized to the page; `PageContext` carries the pixel size used to
//! project them and the reading direction of the book.

use crate::error::{OrderError, Result};
use crate::utils::{HasBBox, Rect};

/// Id given to panels synthesized for groups that no detected panel covers.
pub const SYNTHETIC_PANEL_ID: i64 = i64::MIN;

/// Class of a detected object.
///
/// Raw class ids follow the detector's label map: 0 is the panel class and
/// every other id is a content class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Panel,
    Balloon,
    Text,
    Caption,
    Other(u32),
}

impl ObjectClass {
    pub const PANEL_ID: u32 = 0;

    pub const fn from_id(id: u32) -> Self {
        match id {
            Self::PANEL_ID => Self::Panel,
            1 => Self::Balloon,
            2 => Self::Text,
            3 => Self::Caption,
            other => Self::Other(other),
        }
    }

    pub const fn id(self) -> u32 {
        match self {
            Self::Panel => Self::PANEL_ID,
            Self::Balloon => 1,
            Self::Text => 2,
            Self::Caption => 3,
            Self::Other(id) => id,
        }
    }

    #[inline]
    pub const fn is_panel(self) -> bool {
        matches!(self, Self::Panel)
    }
}

impl From<u32> for ObjectClass {
    fn from(id: u32) -> Self {
        Self::from_id(id)
    }
}

impl From<ObjectClass> for u32 {
    fn from(class: ObjectClass) -> Self {
        class.id()
    }
}

/// Bounding box normalized to the page, every edge in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl NormalizedBox {
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Smallest box covering both boxes.
    pub const fn union(self, other: Self) -> Self {
        Self {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Projects the box onto a page of `width` x `height` pixels.
    pub fn to_pixels(&self, width: u32, height: u32) -> Rect {
        let w = f64::from(width);
        let h = f64::from(height);
        (self.left * w, self.top * h, self.right * w, self.bottom * h)
    }
}

/// An object found on the page by the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedObject {
    pub id: i64,
    pub class: ObjectClass,
    /// Detector confidence in [0, 1]; carried through untouched.
    pub probability: f32,
    pub bbox: NormalizedBox,
}

impl DetectedObject {
    pub const fn new(id: i64, class: ObjectClass, probability: f32, bbox: NormalizedBox) -> Self {
        Self {
            id,
            class,
            probability,
            bbox,
        }
    }

    /// Panel stand-in for a group that no detected panel covers.
    pub const fn synthetic_panel(bbox: NormalizedBox) -> Self {
        Self::new(SYNTHETIC_PANEL_ID, ObjectClass::Panel, 0.0, bbox)
    }

    #[inline]
    pub const fn is_panel(&self) -> bool {
        self.class.is_panel()
    }

    #[inline]
    pub const fn is_content(&self) -> bool {
        !self.class.is_panel()
    }

    pub const fn is_synthetic(&self) -> bool {
        self.id == SYNTHETIC_PANEL_ID
    }
}

/// A detected object projected onto the pixel grid of its page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedObject {
    pub object: DetectedObject,
    pub rect: Rect,
}

impl PlacedObject {
    pub fn new(object: DetectedObject, page: &PageContext) -> Self {
        Self {
            object,
            rect: object.bbox.to_pixels(page.width, page.height),
        }
    }

    #[inline]
    pub const fn is_panel(&self) -> bool {
        self.object.is_panel()
    }
}

impl HasBBox for PlacedObject {
    fn x0(&self) -> f64 {
        self.rect.0
    }

    fn y0(&self) -> f64 {
        self.rect.1
    }

    fn x1(&self) -> f64 {
        self.rect.2
    }

    fn y1(&self) -> f64 {
        self.rect.3
    }
}

/// Reading direction of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadingDirection {
    /// Left to right, western comics.
    #[default]
    Ltr,
    /// Right to left, manga.
    Rtl,
}

/// Pixel size and reading direction of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    pub width: u32,
    pub height: u32,
    pub direction: ReadingDirection,
}

impl PageContext {
    /// Creates a page context, rejecting empty dimensions.
    pub fn new(width: u32, height: u32, direction: ReadingDirection) -> Result<Self> {
        let page = Self {
            width,
            height,
            direction,
        };
        page.validate()?;
        Ok(page)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OrderError::InvalidPageSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Page area in square pixels.
    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }
}
