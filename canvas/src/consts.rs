//! Shared numeric constants for the canvas crate.

use crate::geom::Point;

// ── Hit-testing ─────────────────────────────────────────────────

/// Padding around freehand stroke bounds, in canvas units.
pub const STROKE_HIT_PADDING: f64 = 10.0;

/// Padding around rectangle and circle bounds.
pub const SHAPE_HIT_PADDING: f64 = 8.0;

/// Padding around the box spanned by an arrow's endpoints.
pub const ARROW_HIT_PADDING: f64 = 12.0;

/// Padding around the estimated text glyph box.
pub const TEXT_HIT_PADDING: f64 = 4.0;

/// Padding around a widget's cell layout.
pub const WIDGET_HIT_PADDING: f64 = 6.0;

/// Estimated glyph advance as a fraction of the font size.
pub const TEXT_GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line height as a fraction of the font size.
pub const TEXT_LINE_HEIGHT_RATIO: f64 = 1.2;

// ── Gestures ────────────────────────────────────────────────────

/// A marquee or drag shorter than this (in both axes) counts as a click.
pub const CLICK_SLOP: f64 = 3.0;

/// Shapes whose extent is below this in both axes are discarded on release.
pub const MIN_SHAPE_SIZE: f64 = 2.0;

// ── Widgets ─────────────────────────────────────────────────────

/// Side length of one widget cell.
pub const CELL_SIZE: f64 = 50.0;

/// Horizontal gap between linked-list nodes, reserved for the link arrow.
pub const NODE_GAP: f64 = 30.0;

/// Value used to pad ragged grid rows.
pub const GRID_PAD: &str = "0";

/// Where a widget lands when the host gives no placement.
pub const DEFAULT_WIDGET_ORIGIN: Point = Point { x: 100.0, y: 100.0 };

// ── Defaults ────────────────────────────────────────────────────

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1024.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 768.0;

/// Side length of the bottom-right drop-to-delete square.
pub const DEFAULT_DELETE_ZONE_SIZE: f64 = 100.0;

/// Snapshots kept on the undo stack before the oldest is dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Offset applied to pasted and duplicated elements.
pub const DEFAULT_PASTE_OFFSET: f64 = 20.0;

pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
