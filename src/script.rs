//! JSON-lines input scripts.
//!
//! One command object per line, tagged by `op`:
//!
//! ```text
//! # draw a stroke, then drop an array in the corner
//! {"op":"tool","tool":"pen"}
//! {"op":"down","x":10,"y":10}
//! {"op":"move","x":40,"y":20}
//! {"op":"up","x":40,"y":20}
//! {"op":"place","widget":"array","literal":"[1,2,3]"}
//! {"op":"edit","index":1,"edit":{"edit":"push_back","value":"4"}}
//! {"op":"key","key":"z","modifiers":{"ctrl":true}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Edits address
//! elements by draw-order index since ids are generated at replay time.

use std::io::BufRead;

use canvas::doc::Color;
use canvas::engine::{Action, EditError, EngineCore};
use canvas::geom::Point;
use canvas::input::{Button, Key, Modifiers, Tool};
use canvas::literal::LiteralError;
use canvas::widgets::{WidgetEdit, WidgetKind};
use serde::Deserialize;
use tracing::{debug, info};

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid command: {source}")]
    Parse { line: usize, source: serde_json::Error },
    #[error("line {line}: {source}")]
    Literal { line: usize, source: LiteralError },
    #[error("line {line}: {source}")]
    Edit { line: usize, source: EditError },
    #[error("line {line}: no element at index {index} ({len} on the board)")]
    NoElement { line: usize, index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Tool {
        tool: Tool,
    },
    Color {
        color: Color,
    },
    Width {
        width: f64,
    },
    FontSize {
        size: f64,
    },
    Viewport {
        width: f64,
        height: f64,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
    },
    Place {
        widget: WidgetKind,
        literal: String,
        #[serde(default)]
        at: Option<Point>,
    },
    Edit {
        index: usize,
        edit: WidgetEdit,
    },
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    Delete,
    SelectAll,
    ClearSelection,
    Clear,
}

/// A parsed command and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Totals gathered while replaying a script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayStats {
    pub commands: usize,
    pub actions: usize,
    /// Values returned by widget edits (pops, removals, overwritten cells), in order.
    pub removed: Vec<String>,
}

/// Parse one script line. Returns `None` for blanks and comments.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] when the line is not a valid command.
pub fn parse_line(line: usize, text: &str) -> Result<Option<ScriptLine>, ScriptError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let command = serde_json::from_str(trimmed).map_err(|source| ScriptError::Parse { line, source })?;
    Ok(Some(ScriptLine { line, command }))
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first read or parse failure.
pub fn parse_script<R: BufRead>(reader: R) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut script = Vec::new();
    for (index, text) in reader.lines().enumerate() {
        if let Some(parsed) = parse_line(index + 1, &text?)? {
            script.push(parsed);
        }
    }
    Ok(script)
}

/// Feed every command into `core`.
///
/// # Errors
///
/// Stops at the first command the engine rejects: a bad widget literal, a
/// failed edit, or an edit index past the end of the board.
pub fn replay(core: &mut EngineCore, script: &[ScriptLine]) -> Result<ReplayStats, ScriptError> {
    let mut stats = ReplayStats::default();
    for entry in script {
        let actions = apply(core, entry, &mut stats)?;
        debug!(line = entry.line, actions = actions.len(), "command applied");
        stats.commands += 1;
        stats.actions += actions.len();
    }
    info!(commands = stats.commands, elements = core.elements().len(), "script replayed");
    Ok(stats)
}

fn apply(core: &mut EngineCore, entry: &ScriptLine, stats: &mut ReplayStats) -> Result<Vec<Action>, ScriptError> {
    let line = entry.line;
    let actions = match &entry.command {
        Command::Tool { tool } => {
            core.set_tool(*tool);
            Vec::new()
        }
        Command::Color { color } => {
            core.set_color(*color);
            Vec::new()
        }
        Command::Width { width } => {
            core.set_stroke_width(*width);
            Vec::new()
        }
        Command::FontSize { size } => {
            core.set_font_size(*size);
            Vec::new()
        }
        Command::Viewport { width, height } => {
            core.set_viewport(*width, *height);
            Vec::new()
        }
        Command::Down { x, y, button, modifiers } => core.on_pointer_down(Point::new(*x, *y), *button, *modifiers),
        Command::Move { x, y, modifiers } => core.on_pointer_move(Point::new(*x, *y), *modifiers),
        Command::Up { x, y, button, modifiers } => core.on_pointer_up(Point::new(*x, *y), *button, *modifiers),
        Command::Key { key, modifiers } => core.on_key_down(&Key(key.clone()), *modifiers),
        Command::Text { x, y, content } => core.add_text(Point::new(*x, *y), content),
        Command::Place { widget, literal, at } => core
            .place_widget(*widget, literal, *at)
            .map_err(|source| ScriptError::Literal { line, source })?,
        Command::Edit { index, edit } => {
            let len = core.elements().len();
            let id = core
                .elements()
                .get(*index)
                .map(|e| e.id)
                .ok_or(ScriptError::NoElement { line, index: *index, len })?;
            let (removed, actions) =
                core.edit_widget(&id, edit.clone()).map_err(|source| ScriptError::Edit { line, source })?;
            if let Some(value) = removed {
                info!(line, %value, "widget edit returned value");
                stats.removed.push(value);
            }
            actions
        }
        Command::Undo => core.undo(),
        Command::Redo => core.redo(),
        Command::Copy => {
            let copied = core.copy_selection();
            debug!(line, copied, "copied selection");
            Vec::new()
        }
        Command::Paste => core.paste(),
        Command::Duplicate => core.duplicate_selection(),
        Command::Delete => core.delete_selection(),
        Command::SelectAll => core.select_all(),
        Command::ClearSelection => core.clear_selection(),
        Command::Clear => core.clear_canvas(),
    };
    Ok(actions)
}
