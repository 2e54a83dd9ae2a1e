//! Scene reports printed after a replay.

use canvas::doc::{Element, ElementId, ElementKind, Geometry};
use canvas::engine::EngineCore;
use canvas::geom::Point;
use canvas::widgets::{WidgetData, WidgetKind};
use serde::Serialize;

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

/// Machine-readable scene dump.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub elements: &'a [Element],
    pub selection: &'a [ElementId],
    pub can_undo: bool,
    pub can_redo: bool,
    pub removed: &'a [String],
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(core: &'a EngineCore, removed: &'a [String]) -> Self {
        Self {
            elements: core.elements(),
            selection: core.selection(),
            can_undo: core.can_undo(),
            can_redo: core.can_redo(),
            removed,
        }
    }
}

/// Human-readable summary: a header line, then one line per element in draw
/// order. Selected elements are marked with `*`.
#[must_use]
pub fn summary(core: &EngineCore) -> String {
    let mut out = format!(
        "elements: {}  selected: {}  undo: {}  redo: {}\n",
        core.elements().len(),
        core.selection().len(),
        core.history.undo_count(),
        core.history.redo_count(),
    );
    for (index, element) in core.elements().iter().enumerate() {
        let mark = if core.ui.is_selected(&element.id) { '*' } else { ' ' };
        out.push_str(&format!("{mark}{index:>3} {}\n", describe(element)));
    }
    out
}

/// One-line description of an element.
#[must_use]
pub fn describe(element: &Element) -> String {
    match &element.kind {
        ElementKind::Line(line) => {
            let tool = format!("{:?}", line.tool).to_lowercase();
            match &line.geometry {
                Geometry::Path { points } => format!("{tool} path points={} width={}", points.len(), line.width),
                Geometry::Rectangle { start, end } => format!("rectangle {}-{}", point(*start), point(*end)),
                Geometry::Circle { start, end } => format!("circle {}-{}", point(*start), point(*end)),
                Geometry::Arrow { start, end } => format!("arrow {}->{}", point(*start), point(*end)),
                Geometry::Text { position, content, size } => {
                    format!("text {content:?} at {} size={size}", point(*position))
                }
            }
        }
        ElementKind::Widget(widget) => {
            let body = match &widget.data {
                WidgetData::Array(v) | WidgetData::LinkedList(v) => list(v.iter()),
                WidgetData::Deque(d) => list(d.iter()),
                WidgetData::Grid(rows) => {
                    let rows: Vec<String> = rows.iter().map(|r| list(r.iter())).collect();
                    format!("[{}]", rows.join(", "))
                }
            };
            let kind = match widget.kind() {
                WidgetKind::Array => "array",
                WidgetKind::Grid => "grid",
                WidgetKind::LinkedList => "linked_list",
                WidgetKind::Deque => "deque",
            };
            format!("{kind} at {} {body}", point(widget.origin))
        }
    }
}

fn point(p: Point) -> String {
    format!("({}, {})", p.x, p.y)
}

fn list<'a>(values: impl Iterator<Item = &'a String>) -> String {
    let values: Vec<&str> = values.map(String::as_str).collect();
    format!("[{}]", values.join(", "))
}
