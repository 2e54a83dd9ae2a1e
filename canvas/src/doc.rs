//! Document model: board elements and the ordered in-memory store.
//!
//! Everything on the board is an [`Element`]. Drawn content is a [`Line`]
//! record tagged with the [`Tool`] that produced it and its [`Geometry`];
//! structured content is a [`Widget`]. The store keeps elements in draw
//! order: later elements are painted on top and win hit-tests.
//!
//! Undo works on whole-store snapshots, so every element type is `Clone`
//! and cheap enough to copy wholesale.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Point;
use crate::input::Tool;
use crate::widgets::Widget;

/// Unique identifier for a board element.
pub type ElementId = Uuid;

/// RGBA color, each channel in `0.0..=1.0`.
pub type Color = [f32; 4];

/// Geometry of a drawn line record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Geometry {
    /// Freehand polyline, in drawing order.
    Path { points: Vec<Point> },
    /// Rectangle spanned by two opposite corners.
    Rectangle { start: Point, end: Point },
    /// Circle inscribed in the box spanned by two opposite corners.
    Circle { start: Point, end: Point },
    /// Arrow from `start` to the head at `end`.
    Arrow { start: Point, end: Point },
    /// Text label anchored at its top-left corner.
    Text { position: Point, content: String, size: f64 },
}

impl Geometry {
    /// Shift every coordinate by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Path { points } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
            Self::Rectangle { start, end } | Self::Circle { start, end } | Self::Arrow { start, end } => {
                *start = start.offset(dx, dy);
                *end = end.offset(dx, dy);
            }
            Self::Text { position, .. } => *position = position.offset(dx, dy),
        }
    }
}

/// A drawn record: pen or eraser stroke, shape, or text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Tool that produced the record.
    pub tool: Tool,
    pub geometry: Geometry,
    pub color: Color,
    /// Stroke width in canvas units. Ignored for text.
    pub width: f64,
}

/// The content of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Line(Line),
    Widget(Widget),
}

/// A board element as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
}

impl Element {
    /// Wrap a line record under a fresh id.
    #[must_use]
    pub fn line(line: Line) -> Self {
        Self { id: Uuid::new_v4(), kind: ElementKind::Line(line) }
    }

    /// Wrap a widget under a fresh id.
    #[must_use]
    pub fn widget(widget: Widget) -> Self {
        Self { id: Uuid::new_v4(), kind: ElementKind::Widget(widget) }
    }

    /// A copy of this element under a fresh id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self { id: Uuid::new_v4(), kind: self.kind.clone() }
    }

    #[must_use]
    pub fn as_line(&self) -> Option<&Line> {
        match &self.kind {
            ElementKind::Line(line) => Some(line),
            ElementKind::Widget(_) => None,
        }
    }

    #[must_use]
    pub fn as_widget(&self) -> Option<&Widget> {
        match &self.kind {
            ElementKind::Widget(w) => Some(w),
            ElementKind::Line(_) => None,
        }
    }

    pub fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match &mut self.kind {
            ElementKind::Widget(w) => Some(w),
            ElementKind::Line(_) => None,
        }
    }

    #[must_use]
    pub fn is_widget(&self) -> bool {
        matches!(self.kind, ElementKind::Widget(_))
    }

    /// Whether the element takes part in hit-testing and selection.
    ///
    /// Eraser strokes paint background and are never picked.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.as_line().is_none_or(|line| line.tool != Tool::Eraser)
    }

    /// Shift the element by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match &mut self.kind {
            ElementKind::Line(line) => line.geometry.translate(dx, dy),
            ElementKind::Widget(w) => w.origin = w.origin.offset(dx, dy),
        }
    }
}

/// In-memory store of board elements, kept in draw order.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    elements: Vec<Element>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Append an element on top of the stack. An element with the same id
    /// is replaced in place instead.
    pub fn insert(&mut self, element: Element) {
        if let Some(slot) = self.elements.iter_mut().find(|e| e.id == element.id) {
            *slot = element;
        } else {
            self.elements.push(element);
        }
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|e| e.id == *id)?;
        Some(self.elements.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// All elements, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// All element ids, bottom first.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    /// Shift every listed element by `(dx, dy)`. Returns how many moved.
    pub fn translate(&mut self, ids: &[ElementId], dx: f64, dy: f64) -> usize {
        let mut moved = 0;
        for e in self.elements.iter_mut().filter(|e| ids.contains(&e.id)) {
            e.translate(dx, dy);
            moved += 1;
        }
        moved
    }

    /// Full copy of the current element list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Replace every element with a previously taken snapshot.
    pub fn restore(&mut self, snapshot: Vec<Element>) {
        self.elements = snapshot;
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
