//! The engine: pointer/keyboard handlers and board commands.
//!
//! [`EngineCore`] owns the document, its undo history, the UI state and the
//! active gesture. Hosts call the `on_*` handlers with raw input and the
//! command methods for toolbar actions; every call returns the [`Action`]s
//! the host should react to (redraw, reflect selection, open a text prompt).
//!
//! Every mutation takes a history snapshot first. Drags take theirs on the
//! first movement past [`CLICK_SLOP`], so a plain click never adds an undo
//! step, and a whole drag (including a drop on the delete zone) undoes as one.

use tracing::{debug, warn};

use crate::config::BoardConfig;
use crate::consts::{CLICK_SLOP, DEFAULT_WIDGET_ORIGIN, MIN_SHAPE_SIZE};
use crate::doc::{Color, DocStore, Element, ElementId, Geometry, Line};
use crate::geom::{Bounds, Point};
use crate::history::History;
use crate::hit;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState};
use crate::literal::LiteralError;
use crate::widgets::{Widget, WidgetData, WidgetEdit, WidgetError, WidgetKind};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers and commands for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId },
    ElementDeleted { id: ElementId },
    /// The full new selection, in selection order.
    SelectionChanged(Vec<ElementId>),
    /// The text tool was used; the host should prompt and call [`EngineCore::add_text`].
    EditTextRequested { position: Point },
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// A dragged widget entered (`true`) or left (`false`) the delete zone.
    DeleteZoneArmed(bool),
    RenderNeeded,
}

/// Error returned by [`EngineCore::edit_widget`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("element {0} not found")]
    NotFound(ElementId),
    #[error("element {0} is not a widget")]
    NotAWidget(ElementId),
    #[error(transparent)]
    Widget(#[from] WidgetError),
}

/// Core engine state. Holds no platform handles, so it is driven the same way
/// by a GUI shell, the replay driver, and tests.
pub struct EngineCore {
    pub doc: DocStore,
    pub history: History,
    pub ui: UiState,
    pub input: InputState,
    /// Elements captured by the last copy, in draw order.
    pub clipboard: Vec<Element>,
    pub config: BoardConfig,
    /// Pastes since the last copy; each one lands a further offset away.
    paste_count: u32,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(BoardConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: BoardConfig) -> Self {
        Self {
            doc: DocStore::new(),
            history: History::new(config.history_limit),
            ui: UiState::default(),
            input: InputState::Idle,
            clipboard: Vec::new(),
            config,
            paste_count: 0,
        }
    }

    // --- Tool / style ---

    /// Set the active tool. Any gesture in progress is abandoned.
    pub fn set_tool(&mut self, tool: Tool) {
        self.end_gesture();
        self.ui.tool = tool;
    }

    pub fn set_color(&mut self, color: Color) {
        self.ui.color = color;
    }

    /// Set the width used for new strokes and shapes. Non-positive or
    /// non-finite widths are ignored.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.ui.stroke_width = width;
        } else {
            warn!(width, "ignoring invalid stroke width");
        }
    }

    /// Set the font size used for new text labels. Invalid sizes are ignored.
    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.ui.font_size = size;
        } else {
            warn!(size, "ignoring invalid font size");
        }
    }

    /// Update the viewport size. The delete zone follows the new corner.
    ///
    /// Sizes that are not finite and positive, or too small to hold the
    /// delete zone, are ignored.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let valid = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if !valid || self.config.delete_zone_size > width.min(height) {
            warn!(width, height, zone = self.config.delete_zone_size, "ignoring invalid viewport");
            return;
        }
        self.config.viewport_width = width;
        self.config.viewport_height = height;
    }

    // --- Pointer input ---

    /// Start a gesture.
    ///
    /// Non-primary buttons are ignored, as is a second pointer-down while a
    /// gesture is already running.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }

        let tool = self.ui.tool;

        // Widgets sit above the drawing layer and grab the pointer, except
        // for freehand tools, which annotate over them.
        if !tool.is_freehand() {
            let grabbed = if tool == Tool::Select {
                hit::hit_test(pt, &self.doc).filter(|id| self.doc.get(id).is_some_and(Element::is_widget))
            } else {
                hit::hit_widget(pt, &self.doc)
            };
            // A widget inside a multi-selection moves with the group.
            let in_group = |id: &ElementId| {
                tool == Tool::Select && self.ui.is_selected(id) && self.ui.selected_ids.len() > 1
            };
            if let Some(id) = grabbed.filter(|id| !in_group(id)) {
                return self.begin_widget_drag(id, pt, modifiers);
            }
        }

        match tool {
            Tool::Pen | Tool::Eraser => {
                self.input = InputState::Drawing { preview: self.new_line(Geometry::Path { points: vec![pt] }) };
                vec![Action::RenderNeeded]
            }
            Tool::Rectangle => self.begin_shape(Geometry::Rectangle { start: pt, end: pt }),
            Tool::Circle => self.begin_shape(Geometry::Circle { start: pt, end: pt }),
            Tool::Arrow => self.begin_shape(Geometry::Arrow { start: pt, end: pt }),
            Tool::Text => vec![Action::EditTextRequested { position: pt }],
            Tool::Select => self.begin_select(pt, modifiers),
        }
    }

    /// Advance the active gesture.
    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Drawing { mut preview } => {
                extend_preview(&mut preview.geometry, pt);
                self.input = InputState::Drawing { preview };
                vec![Action::RenderNeeded]
            }
            InputState::Marquee { anchor, additive, .. } => {
                self.ui.marquee = Some(Bounds::from_corners(anchor, pt));
                self.input = InputState::Marquee { anchor, current: pt, additive };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingSelection { start, last, moved } => {
                if !moved && within_slop(start, pt) {
                    self.input = InputState::DraggingSelection { start, last, moved };
                    return Vec::new();
                }
                if !moved {
                    self.history.save(&self.doc);
                }
                let ids = self.ui.selected_ids.clone();
                self.doc.translate(&ids, pt.x - last.x, pt.y - last.y);
                self.input = InputState::DraggingSelection { start, last: pt, moved: true };

                let mut actions: Vec<Action> = ids.into_iter().map(|id| Action::ElementUpdated { id }).collect();
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::DraggingWidget { id, start, last, moved } => {
                if !self.doc.contains(&id) {
                    debug!(%id, "dragged widget vanished, ending drag");
                    return self.end_gesture();
                }
                if !moved && within_slop(start, pt) {
                    self.input = InputState::DraggingWidget { id, start, last, moved };
                    return Vec::new();
                }
                if !moved {
                    self.history.save(&self.doc);
                }
                self.doc.translate(&[id], pt.x - last.x, pt.y - last.y);
                self.input = InputState::DraggingWidget { id, start, last: pt, moved: true };

                let mut actions = vec![Action::ElementUpdated { id }];
                let armed = self.in_delete_zone(pt);
                if armed != self.ui.delete_zone_armed {
                    self.ui.delete_zone_armed = armed;
                    actions.push(Action::DeleteZoneArmed(armed));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    /// Finish the active gesture at `pt`.
    pub fn on_pointer_up(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }

        // Apply the final position first so the release point counts.
        let mut actions = match self.input {
            InputState::Idle => return Vec::new(),
            _ => self.on_pointer_move(pt, modifiers),
        };
        actions.retain(|a| !matches!(a, Action::RenderNeeded));

        match std::mem::take(&mut self.input) {
            InputState::Idle => {}
            InputState::Drawing { preview } => {
                if is_degenerate(&preview.geometry) {
                    debug!(tool = ?preview.tool, "discarding degenerate line");
                } else {
                    actions.extend(self.commit(Element::line(preview)));
                }
            }
            InputState::Marquee { anchor, additive, .. } => {
                actions.extend(self.finish_marquee(Bounds::from_corners(anchor, pt), additive));
            }
            InputState::DraggingSelection { moved, .. } => {
                if moved {
                    actions.push(self.history_changed());
                }
            }
            InputState::DraggingWidget { id, moved, .. } => {
                if self.ui.delete_zone_armed {
                    self.ui.delete_zone_armed = false;
                    actions.push(Action::DeleteZoneArmed(false));
                }
                // The drag's snapshot already covers this removal.
                if moved && self.in_delete_zone(pt) && self.doc.remove(&id).is_some() {
                    debug!(%id, "widget dropped on delete zone");
                    actions.push(Action::ElementDeleted { id });
                    if self.prune_selection() {
                        actions.push(Action::SelectionChanged(self.ui.selected_ids.clone()));
                    }
                }
                if moved {
                    actions.push(self.history_changed());
                }
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Keyboard ---

    /// Handle a key press.
    ///
    /// - `Delete` / `Backspace`: delete the selection
    /// - `Escape`: abandon the gesture and clear the selection
    /// - command-`z` undo, command-shift-`z` / command-`y` redo
    /// - command-`c` copy, command-`v` paste, command-`d` duplicate,
    ///   command-`a` select all
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Delete") || key.is("Backspace") {
            return self.delete_selection();
        }
        if key.is("Escape") {
            let mut actions = self.end_gesture();
            actions.extend(self.clear_selection());
            return actions;
        }
        if !modifiers.command() {
            return Vec::new();
        }
        if key.is("z") {
            if modifiers.shift { self.redo() } else { self.undo() }
        } else if key.is("y") {
            self.redo()
        } else if key.is("c") {
            self.copy_selection();
            Vec::new()
        } else if key.is("v") {
            self.paste()
        } else if key.is("d") {
            self.duplicate_selection()
        } else if key.is("a") {
            self.select_all()
        } else {
            Vec::new()
        }
    }

    // --- Commands ---

    /// Place a text label. Blank text is ignored.
    pub fn add_text(&mut self, position: Point, content: &str) -> Vec<Action> {
        if content.trim().is_empty() {
            debug!("ignoring empty text label");
            return Vec::new();
        }
        let mut line = self.new_line(Geometry::Text {
            position,
            content: content.to_owned(),
            size: self.ui.font_size,
        });
        line.tool = Tool::Text;
        self.commit(Element::line(line))
    }

    /// Parse `literal` into a widget of `kind` and place it at `at`, or at
    /// [`DEFAULT_WIDGET_ORIGIN`] when the host has no placement.
    ///
    /// # Errors
    ///
    /// Returns the [`LiteralError`] if `literal` does not parse; the board is
    /// left untouched.
    pub fn place_widget(&mut self, kind: WidgetKind, literal: &str, at: Option<Point>) -> Result<Vec<Action>, LiteralError> {
        let data = WidgetData::parse(kind, literal)?;
        let widget = Widget::new(at.unwrap_or(DEFAULT_WIDGET_ORIGIN), data);
        Ok(self.commit(Element::widget(widget)))
    }

    /// Apply `edit` to the widget `id`. Returns the removed or overwritten
    /// value alongside the actions.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] when `id` is missing, not a widget, or the edit
    /// is rejected. Nothing is recorded in history on error.
    pub fn edit_widget(&mut self, id: &ElementId, edit: WidgetEdit) -> Result<(Option<String>, Vec<Action>), EditError> {
        let element = self.doc.get(id).ok_or(EditError::NotFound(*id))?;
        let mut edited = element.as_widget().ok_or(EditError::NotAWidget(*id))?.clone();
        let removed = edited.apply(edit)?;

        self.history.save(&self.doc);
        if let Some(slot) = self.doc.get_mut(id).and_then(Element::as_widget_mut) {
            *slot = edited;
        }
        debug!(%id, "widget edited");
        Ok((removed, vec![Action::ElementUpdated { id: *id }, self.history_changed(), Action::RenderNeeded]))
    }

    /// Restore the state before the last mutation.
    pub fn undo(&mut self) -> Vec<Action> {
        self.end_gesture();
        let Some(prev) = self.history.undo(&self.doc) else {
            return Vec::new();
        };
        self.doc.restore(prev);
        debug!(undo_left = self.history.undo_count(), "undo");
        self.after_restore()
    }

    /// Re-apply the last undone mutation.
    pub fn redo(&mut self) -> Vec<Action> {
        self.end_gesture();
        let Some(next) = self.history.redo(&self.doc) else {
            return Vec::new();
        };
        self.doc.restore(next);
        debug!(redo_left = self.history.redo_count(), "redo");
        self.after_restore()
    }

    /// Delete every selected element.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if self.ui.selected_ids.is_empty() {
            return Vec::new();
        }
        let mut actions = self.end_gesture();
        self.history.save(&self.doc);
        let mut count = 0usize;
        for id in std::mem::take(&mut self.ui.selected_ids) {
            if self.doc.remove(&id).is_some() {
                count += 1;
                actions.push(Action::ElementDeleted { id });
            }
        }
        debug!(count, "selection deleted");
        actions.push(Action::SelectionChanged(Vec::new()));
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Copy the selection to the clipboard. Returns how many elements were copied.
    pub fn copy_selection(&mut self) -> usize {
        let copied: Vec<Element> = self
            .doc
            .elements()
            .iter()
            .filter(|e| self.ui.is_selected(&e.id))
            .cloned()
            .collect();
        if copied.is_empty() {
            return 0;
        }
        self.clipboard = copied;
        self.paste_count = 0;
        self.clipboard.len()
    }

    /// Insert copies of the clipboard, offset from the originals, and select them.
    /// Repeated pastes cascade.
    pub fn paste(&mut self) -> Vec<Action> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        self.paste_count += 1;
        let offset = self.config.paste_offset * f64::from(self.paste_count);
        let sources = self.clipboard.clone();
        self.insert_copies(&sources, offset)
    }

    /// Copy the selection in place, one paste offset away, leaving the
    /// clipboard untouched.
    pub fn duplicate_selection(&mut self) -> Vec<Action> {
        let sources: Vec<Element> = self
            .doc
            .elements()
            .iter()
            .filter(|e| self.ui.is_selected(&e.id))
            .cloned()
            .collect();
        if sources.is_empty() {
            return Vec::new();
        }
        self.insert_copies(&sources, self.config.paste_offset)
    }

    /// Select every selectable element.
    pub fn select_all(&mut self) -> Vec<Action> {
        let all: Vec<ElementId> = self.doc.elements().iter().filter(|e| e.is_selectable()).map(|e| e.id).collect();
        self.set_selection(all)
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        self.set_selection(Vec::new())
    }

    /// Remove every element. Undoable.
    pub fn clear_canvas(&mut self) -> Vec<Action> {
        if self.doc.is_empty() {
            return Vec::new();
        }
        self.end_gesture();
        self.history.save(&self.doc);
        let mut actions: Vec<Action> = self.doc.ids().into_iter().map(|id| Action::ElementDeleted { id }).collect();
        self.doc.clear();
        if !self.ui.selected_ids.is_empty() {
            self.ui.selected_ids.clear();
            actions.push(Action::SelectionChanged(Vec::new()));
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// Currently selected element ids, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.ui.selected_ids
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }

    /// All elements, bottom first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.doc.elements()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Internals ---

    fn new_line(&self, geometry: Geometry) -> Line {
        Line { tool: self.ui.tool, geometry, color: self.ui.color, width: self.ui.stroke_width }
    }

    fn begin_shape(&mut self, geometry: Geometry) -> Vec<Action> {
        self.input = InputState::Drawing { preview: self.new_line(geometry) };
        vec![Action::RenderNeeded]
    }

    fn begin_widget_drag(&mut self, id: ElementId, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.ui.is_selected(&id) {
            actions.extend(self.select_hit(id, modifiers.shift));
        }
        self.input = InputState::DraggingWidget { id, start: pt, last: pt, moved: false };
        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_select(&mut self, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let Some(id) = hit::hit_test(pt, &self.doc) else {
            self.ui.marquee = Some(Bounds::from_corners(pt, pt));
            self.input = InputState::Marquee { anchor: pt, current: pt, additive: modifiers.shift };
            return vec![Action::RenderNeeded];
        };

        let mut actions = Vec::new();
        if !self.ui.is_selected(&id) {
            actions.extend(self.select_hit(id, modifiers.shift));
        }
        self.input = InputState::DraggingSelection { start: pt, last: pt, moved: false };
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select `id`, replacing the selection unless `additive`.
    fn select_hit(&mut self, id: ElementId, additive: bool) -> Vec<Action> {
        let mut next = if additive { self.ui.selected_ids.clone() } else { Vec::new() };
        if !next.contains(&id) {
            next.push(id);
        }
        self.set_selection(next)
    }

    fn finish_marquee(&mut self, rect: Bounds, additive: bool) -> Vec<Action> {
        self.ui.marquee = None;
        if rect.width() < CLICK_SLOP && rect.height() < CLICK_SLOP {
            // A click on empty space.
            return if additive { Vec::new() } else { self.clear_selection() };
        }

        let hits = hit::marquee_select(&rect, &self.doc);
        let next = if additive {
            let mut merged = self.ui.selected_ids.clone();
            merged.extend(hits.into_iter().filter(|id| !self.ui.selected_ids.contains(id)));
            merged
        } else {
            hits
        };
        self.set_selection(next)
    }

    fn set_selection(&mut self, ids: Vec<ElementId>) -> Vec<Action> {
        if self.ui.selected_ids == ids {
            return Vec::new();
        }
        self.ui.selected_ids = ids;
        vec![Action::SelectionChanged(self.ui.selected_ids.clone()), Action::RenderNeeded]
    }

    /// Drop selected ids that no longer exist. Returns whether anything changed.
    fn prune_selection(&mut self) -> bool {
        let before = self.ui.selected_ids.len();
        let doc = &self.doc;
        self.ui.selected_ids.retain(|id| doc.contains(id));
        before != self.ui.selected_ids.len()
    }

    fn commit(&mut self, element: Element) -> Vec<Action> {
        self.history.save(&self.doc);
        debug!(id = %element.id, "element committed");
        self.doc.insert(element.clone());
        vec![Action::ElementCreated(element), self.history_changed(), Action::RenderNeeded]
    }

    fn insert_copies(&mut self, sources: &[Element], offset: f64) -> Vec<Action> {
        self.history.save(&self.doc);
        let mut actions = Vec::new();
        let mut ids = Vec::with_capacity(sources.len());
        for source in sources {
            let mut copy = source.duplicate();
            copy.translate(offset, offset);
            ids.push(copy.id);
            self.doc.insert(copy.clone());
            actions.push(Action::ElementCreated(copy));
        }
        debug!(count = ids.len(), "copies inserted");
        self.ui.selected_ids = ids;
        actions.push(Action::SelectionChanged(self.ui.selected_ids.clone()));
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    fn after_restore(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.prune_selection() {
            actions.push(Action::SelectionChanged(self.ui.selected_ids.clone()));
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abandon any gesture. Drawing previews and marquees are discarded;
    /// drags keep whatever they already moved.
    fn end_gesture(&mut self) -> Vec<Action> {
        let ended = std::mem::take(&mut self.input);
        self.ui.marquee = None;
        let mut actions = Vec::new();
        if self.ui.delete_zone_armed {
            self.ui.delete_zone_armed = false;
            actions.push(Action::DeleteZoneArmed(false));
        }
        // A drag that moved has already pushed its snapshot.
        if matches!(
            ended,
            InputState::DraggingSelection { moved: true, .. } | InputState::DraggingWidget { moved: true, .. }
        ) {
            actions.push(self.history_changed());
        }
        if !matches!(ended, InputState::Idle) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn in_delete_zone(&self, pt: Point) -> bool {
        self.config
            .delete_zone()
            .contains(pt, self.config.viewport_width, self.config.viewport_height)
    }

    fn history_changed(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }
}

/// Move the live end of a preview to `pt`.
fn extend_preview(geometry: &mut Geometry, pt: Point) {
    match geometry {
        Geometry::Path { points } => {
            if points.last() != Some(&pt) {
                points.push(pt);
            }
        }
        Geometry::Rectangle { end, .. } | Geometry::Circle { end, .. } | Geometry::Arrow { end, .. } => *end = pt,
        Geometry::Text { .. } => {}
    }
}

/// Lines too small to keep: single-point paths and near-zero shapes.
fn is_degenerate(geometry: &Geometry) -> bool {
    match geometry {
        Geometry::Path { points } => points.len() < 2,
        Geometry::Rectangle { start, end } | Geometry::Circle { start, end } | Geometry::Arrow { start, end } => {
            let b = Bounds::from_corners(*start, *end);
            b.width() < MIN_SHAPE_SIZE && b.height() < MIN_SHAPE_SIZE
        }
        Geometry::Text { content, .. } => content.trim().is_empty(),
    }
}

fn within_slop(start: Point, pt: Point) -> bool {
    (pt.x - start.x).abs() < CLICK_SLOP && (pt.y - start.y).abs() < CLICK_SLOP
}
