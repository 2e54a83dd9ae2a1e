//! Drop-to-delete region.
//!
//! A square anchored to the bottom-right corner of the viewport. Releasing a
//! dragged widget while the pointer is inside it deletes the widget. The same
//! zone applies to every widget kind.

#[cfg(test)]
#[path = "zone_test.rs"]
mod zone_test;

use crate::geom::{Bounds, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteZone {
    /// Side length of the square.
    pub size: f64,
}

impl DeleteZone {
    #[must_use]
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    /// The zone's rectangle for a viewport of the given size.
    #[must_use]
    pub fn bounds(&self, viewport_w: f64, viewport_h: f64) -> Bounds {
        Bounds::from_corners(
            Point::new(viewport_w - self.size, viewport_h - self.size),
            Point::new(viewport_w, viewport_h),
        )
    }

    /// Whether `p` is inside the zone. A zero-sized zone contains nothing.
    #[must_use]
    pub fn contains(&self, p: Point, viewport_w: f64, viewport_h: f64) -> bool {
        self.size > 0.0 && self.bounds(viewport_w, viewport_h).contains(p)
    }
}
