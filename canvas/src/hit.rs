//! Hit-testing and marquee selection.
//!
//! Every element is tested by its axis-aligned bounding box grown by a fixed
//! per-kind padding. Freehand paths use the box around their points, shapes
//! the box spanned by their corner points, arrows the box spanned by their
//! endpoints, and text an estimated glyph box. Widgets use their cell layout.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{
    ARROW_HIT_PADDING, SHAPE_HIT_PADDING, STROKE_HIT_PADDING, TEXT_GLYPH_WIDTH_RATIO, TEXT_HIT_PADDING,
    TEXT_LINE_HEIGHT_RATIO, WIDGET_HIT_PADDING,
};
use crate::doc::{DocStore, Element, ElementId, ElementKind, Geometry};
use crate::geom::{Bounds, Point};

/// Unpadded bounds of an element. `None` for an empty path.
#[must_use]
pub fn bounds(element: &Element) -> Option<Bounds> {
    match &element.kind {
        ElementKind::Widget(w) => Some(w.bounds()),
        ElementKind::Line(line) => match &line.geometry {
            Geometry::Path { points } => Bounds::from_points(points.iter().copied()),
            Geometry::Rectangle { start, end } | Geometry::Circle { start, end } | Geometry::Arrow { start, end } => {
                Some(Bounds::from_corners(*start, *end))
            }
            Geometry::Text { position, content, size } => Some(text_bounds(*position, content, *size)),
        },
    }
}

/// Bounds used for picking: [`bounds`] plus the padding for the element's kind.
#[must_use]
pub fn hit_bounds(element: &Element) -> Option<Bounds> {
    bounds(element).map(|b| b.padded(padding(element)))
}

fn padding(element: &Element) -> f64 {
    match &element.kind {
        ElementKind::Widget(_) => WIDGET_HIT_PADDING,
        ElementKind::Line(line) => match line.geometry {
            Geometry::Path { .. } => STROKE_HIT_PADDING,
            Geometry::Rectangle { .. } | Geometry::Circle { .. } => SHAPE_HIT_PADDING,
            Geometry::Arrow { .. } => ARROW_HIT_PADDING,
            Geometry::Text { .. } => TEXT_HIT_PADDING,
        },
    }
}

/// Estimated glyph box for a text label anchored at its top-left corner.
#[must_use]
pub fn text_bounds(position: Point, content: &str, size: f64) -> Bounds {
    let lines = content.lines().count().max(1);
    let widest = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (
        widest as f64 * size * TEXT_GLYPH_WIDTH_RATIO,
        lines as f64 * size * TEXT_LINE_HEIGHT_RATIO,
    );
    Bounds::from_origin_size(position, w, h)
}

/// Topmost selectable element whose hit bounds contain `point`.
#[must_use]
pub fn hit_test(point: Point, doc: &DocStore) -> Option<ElementId> {
    topmost(point, doc, |_| true)
}

/// Topmost widget whose hit bounds contain `point`.
#[must_use]
pub fn hit_widget(point: Point, doc: &DocStore) -> Option<ElementId> {
    topmost(point, doc, Element::is_widget)
}

fn topmost(point: Point, doc: &DocStore, filter: impl Fn(&Element) -> bool) -> Option<ElementId> {
    doc.elements()
        .iter()
        .rev()
        .filter(|e| e.is_selectable() && filter(*e))
        .find(|e| hit_bounds(e).is_some_and(|b| b.contains(point)))
        .map(|e| e.id)
}

/// Every selectable element whose hit bounds intersect `rect`, in draw order.
#[must_use]
pub fn marquee_select(rect: &Bounds, doc: &DocStore) -> Vec<ElementId> {
    doc.elements()
        .iter()
        .filter(|e| e.is_selectable())
        .filter(|e| hit_bounds(e).is_some_and(|b| b.intersects(rect)))
        .map(|e| e.id)
        .collect()
}
