//! Data-structure widgets: arrays, grids, linked lists and deques.
//!
//! A widget is a block of cells placed at an origin on the canvas. Its cell
//! layout drives both hit-testing and the host's drawing, so the layout lives
//! here rather than in any renderer. Cell values are kept as the literal text
//! the user typed (`"1.50"` stays `"1.50"`), but every value entering a widget
//! must be a numeric literal.

#[cfg(test)]
#[path = "widgets_test.rs"]
mod widgets_test;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::{CELL_SIZE, GRID_PAD, NODE_GAP};
use crate::geom::{Bounds, Point};
use crate::literal::{self, LiteralError};

/// The four widget families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Array,
    Grid,
    LinkedList,
    Deque,
}

/// Cell contents, shaped by widget kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetData {
    Array(Vec<String>),
    /// Rows of equal length; ragged input is padded on parse.
    Grid(Vec<Vec<String>>),
    LinkedList(Vec<String>),
    Deque(VecDeque<String>),
}

impl WidgetData {
    /// Build widget contents from a literal such as `[1,2,3]` or `[[1,2],[3,4]]`.
    ///
    /// # Errors
    ///
    /// Returns the [`LiteralError`] raised by the literal parser.
    pub fn parse(kind: WidgetKind, input: &str) -> Result<Self, LiteralError> {
        Ok(match kind {
            WidgetKind::Array => Self::Array(literal::parse_array(input)?),
            WidgetKind::Grid => Self::Grid(literal::parse_grid(input)?),
            WidgetKind::LinkedList => Self::LinkedList(literal::parse_array(input)?),
            WidgetKind::Deque => Self::Deque(literal::parse_array(input)?.into()),
        })
    }

    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Array(_) => WidgetKind::Array,
            Self::Grid(_) => WidgetKind::Grid,
            Self::LinkedList(_) => WidgetKind::LinkedList,
            Self::Deque(_) => WidgetKind::Deque,
        }
    }

    /// Number of cells (grid: rows times columns).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        match self {
            Self::Array(v) | Self::LinkedList(v) => v.len(),
            Self::Grid(rows) => rows.iter().map(Vec::len).sum(),
            Self::Deque(d) => d.len(),
        }
    }
}

/// An edit applied to a placed widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum WidgetEdit {
    /// Overwrite one cell. One-dimensional widgets only accept `row == 0`.
    SetCell { row: usize, col: usize, value: String },
    PushBack { value: String },
    PushFront { value: String },
    PopBack,
    PopFront,
    Insert { index: usize, value: String },
    Remove { index: usize },
}

impl WidgetEdit {
    fn name(&self) -> &'static str {
        match self {
            Self::SetCell { .. } => "set_cell",
            Self::PushBack { .. } => "push_back",
            Self::PushFront { .. } => "push_front",
            Self::PopBack => "pop_back",
            Self::PopFront => "pop_front",
            Self::Insert { .. } => "insert",
            Self::Remove { .. } => "remove",
        }
    }
}

/// Error returned by [`Widget::apply`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error("{edit} is not supported on a {kind:?} widget")]
    Unsupported { kind: WidgetKind, edit: &'static str },
    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("widget is empty")]
    Empty,
    #[error("invalid cell value: {0}")]
    Value(#[from] LiteralError),
}

/// A data-structure widget placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Top-left corner of the first cell.
    pub origin: Point,
    pub data: WidgetData,
}

impl Widget {
    #[must_use]
    pub fn new(origin: Point, data: WidgetData) -> Self {
        Self { origin, data }
    }

    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.data.kind()
    }

    /// Bounds of every cell, row-major. Empty widgets report one placeholder cell.
    #[must_use]
    pub fn cell_bounds(&self) -> Vec<Bounds> {
        let cell = |col: usize, row: usize, stride: f64| {
            #[allow(clippy::cast_precision_loss)]
            let origin = self.origin.offset(col as f64 * stride, row as f64 * CELL_SIZE);
            Bounds::from_origin_size(origin, CELL_SIZE, CELL_SIZE)
        };
        let cells: Vec<Bounds> = match &self.data {
            WidgetData::Array(v) => (0..v.len()).map(|i| cell(i, 0, CELL_SIZE)).collect(),
            WidgetData::Deque(d) => (0..d.len()).map(|i| cell(i, 0, CELL_SIZE)).collect(),
            WidgetData::LinkedList(v) => (0..v.len()).map(|i| cell(i, 0, CELL_SIZE + NODE_GAP)).collect(),
            WidgetData::Grid(rows) => rows
                .iter()
                .enumerate()
                .flat_map(|(r, row)| (0..row.len()).map(move |c| (r, c)))
                .map(|(r, c)| cell(c, r, CELL_SIZE))
                .collect(),
        };
        if cells.is_empty() { vec![cell(0, 0, CELL_SIZE)] } else { cells }
    }

    /// Union of the cell layout.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let placeholder = Bounds::from_origin_size(self.origin, CELL_SIZE, CELL_SIZE);
        self.cell_bounds()
            .iter()
            .fold(None, |acc: Option<Bounds>, b| Some(acc.map_or(*b, |a| a.union(b))))
            .unwrap_or(placeholder)
    }

    /// Apply an edit. Returns the value that was removed or overwritten, if any.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Unsupported`] when the widget kind does not
    /// support the edit, [`WidgetError::OutOfRange`] / [`WidgetError::Empty`]
    /// for bad positions, and [`WidgetError::Value`] for non-numeric values.
    pub fn apply(&mut self, edit: WidgetEdit) -> Result<Option<String>, WidgetError> {
        let kind = self.kind();
        let unsupported = WidgetError::Unsupported { kind, edit: edit.name() };
        match (&mut self.data, edit) {
            (WidgetData::Grid(rows), WidgetEdit::SetCell { row, col, value }) => {
                let value = literal::parse_number(&value)?;
                let len = rows.len();
                let cells = rows.get_mut(row).ok_or(WidgetError::OutOfRange { index: row, len })?;
                let width = cells.len();
                let slot = cells.get_mut(col).ok_or(WidgetError::OutOfRange { index: col, len: width })?;
                Ok(Some(std::mem::replace(slot, value)))
            }
            (WidgetData::Grid(rows), WidgetEdit::PopBack) => {
                rows.pop().map(|row| Some(row.join(","))).ok_or(WidgetError::Empty)
            }
            (WidgetData::Grid(_), _) => Err(unsupported),
            (WidgetData::Array(v) | WidgetData::LinkedList(v), WidgetEdit::SetCell { row, col, value }) => {
                if row != 0 {
                    return Err(WidgetError::OutOfRange { index: row, len: 1 });
                }
                let value = literal::parse_number(&value)?;
                let len = v.len();
                let slot = v.get_mut(col).ok_or(WidgetError::OutOfRange { index: col, len })?;
                Ok(Some(std::mem::replace(slot, value)))
            }
            (WidgetData::Array(v) | WidgetData::LinkedList(v), WidgetEdit::PushBack { value }) => {
                v.push(literal::parse_number(&value)?);
                Ok(None)
            }
            (WidgetData::Array(v) | WidgetData::LinkedList(v), WidgetEdit::PopBack) => {
                v.pop().map(Some).ok_or(WidgetError::Empty)
            }
            (WidgetData::Array(v) | WidgetData::LinkedList(v), WidgetEdit::Insert { index, value }) => {
                if index > v.len() {
                    return Err(WidgetError::OutOfRange { index, len: v.len() });
                }
                v.insert(index, literal::parse_number(&value)?);
                Ok(None)
            }
            (WidgetData::Array(v) | WidgetData::LinkedList(v), WidgetEdit::Remove { index }) => {
                if index >= v.len() {
                    return Err(WidgetError::OutOfRange { index, len: v.len() });
                }
                Ok(Some(v.remove(index)))
            }
            (WidgetData::LinkedList(v), WidgetEdit::PushFront { value }) => {
                v.insert(0, literal::parse_number(&value)?);
                Ok(None)
            }
            (WidgetData::LinkedList(v), WidgetEdit::PopFront) => {
                if v.is_empty() {
                    return Err(WidgetError::Empty);
                }
                Ok(Some(v.remove(0)))
            }
            (WidgetData::Array(_), _) => Err(unsupported),
            (WidgetData::Deque(d), WidgetEdit::SetCell { row, col, value }) => {
                if row != 0 {
                    return Err(WidgetError::OutOfRange { index: row, len: 1 });
                }
                let value = literal::parse_number(&value)?;
                let len = d.len();
                let slot = d.get_mut(col).ok_or(WidgetError::OutOfRange { index: col, len })?;
                Ok(Some(std::mem::replace(slot, value)))
            }
            (WidgetData::Deque(d), WidgetEdit::PushBack { value }) => {
                d.push_back(literal::parse_number(&value)?);
                Ok(None)
            }
            (WidgetData::Deque(d), WidgetEdit::PushFront { value }) => {
                d.push_front(literal::parse_number(&value)?);
                Ok(None)
            }
            (WidgetData::Deque(d), WidgetEdit::PopBack) => d.pop_back().map(Some).ok_or(WidgetError::Empty),
            (WidgetData::Deque(d), WidgetEdit::PopFront) => d.pop_front().map(Some).ok_or(WidgetError::Empty),
            (WidgetData::Deque(_), _) => Err(unsupported),
        }
    }
}

/// Pad every row to the widest row's length with [`GRID_PAD`].
pub(crate) fn pad_rows(rows: &mut [Vec<String>]) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, GRID_PAD.to_owned());
    }
}
