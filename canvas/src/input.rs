//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `UiState` is the persistent, host-visible state (active tool, pen
//! style, selection, marquee). `InputState` is the gesture being tracked
//! between pointer-down and pointer-up, carrying everything needed to apply
//! incremental moves and commit on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH};
use crate::doc::{Color, ElementId, Line};
use crate::geom::{Bounds, Point};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand pen (default).
    #[default]
    Pen,
    /// Freehand eraser; paints background and is never selectable.
    Eraser,
    /// Drag out a rectangle.
    Rectangle,
    /// Drag out a circle.
    Circle,
    /// Drag out an arrow.
    Arrow,
    /// Place a text label.
    Text,
    /// Select, marquee and drag.
    Select,
}

impl Tool {
    /// Whether this tool records a freehand path.
    #[must_use]
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pen | Self::Eraser)
    }

    /// Whether this tool drags out a two-point shape.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Arrow)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button, pen, or single finger.
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub tool: Tool,
    /// Color for new lines.
    pub color: Color,
    /// Width for new strokes and shapes.
    pub stroke_width: f64,
    /// Font size for new text labels.
    pub font_size: f64,
    /// Selected elements, in the order they were selected.
    pub selected_ids: Vec<ElementId>,
    /// Marquee rectangle while one is being dragged.
    pub marquee: Option<Bounds>,
    /// True while a dragged widget hovers the delete zone.
    pub delete_zone_armed: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            color: DEFAULT_COLOR,
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            selected_ids: Vec::new(),
            marquee: None,
            delete_zone_armed: false,
        }
    }
}

impl UiState {
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected_ids.contains(id)
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A stroke or shape is being drawn. The preview is committed on release.
    Drawing {
        /// Line under construction.
        preview: Line,
    },
    /// A selection rectangle is being dragged out.
    Marquee {
        /// Corner where the drag started.
        anchor: Point,
        /// Current pointer position.
        current: Point,
        /// Whether the final hit set is added to the existing selection.
        additive: bool,
    },
    /// The current selection is being moved.
    DraggingSelection {
        /// Pointer position at pointer-down.
        start: Point,
        /// Pointer position at the previous event.
        last: Point,
        /// Whether the history snapshot for this drag has been taken.
        moved: bool,
    },
    /// A widget is being moved, and may be dropped on the delete zone.
    DraggingWidget {
        id: ElementId,
        start: Point,
        last: Point,
        moved: bool,
    },
}
