//! Board configuration.
//!
//! The engine itself never reads the environment; hosts build a
//! [`BoardConfig`] however they like (the `structboard` driver uses CLI flags
//! with environment fallbacks) and hand it to
//! [`EngineCore::with_config`](crate::engine::EngineCore::with_config).

use crate::consts::{
    DEFAULT_DELETE_ZONE_SIZE, DEFAULT_HISTORY_LIMIT, DEFAULT_PASTE_OFFSET, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};
use crate::zone::DeleteZone;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    /// Visible canvas width. The delete zone hangs off its right edge.
    pub viewport_width: f64,
    /// Visible canvas height. The delete zone hangs off its bottom edge.
    pub viewport_height: f64,
    /// Side length of the drop-to-delete square.
    pub delete_zone_size: f64,
    /// Undo snapshots kept. Zero disables undo.
    pub history_limit: usize,
    /// Offset between an element and its pasted or duplicated copy.
    pub paste_offset: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            delete_zone_size: DEFAULT_DELETE_ZONE_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            paste_offset: DEFAULT_PASTE_OFFSET,
        }
    }
}

impl BoardConfig {
    #[must_use]
    pub fn delete_zone(&self) -> DeleteZone {
        DeleteZone::new(self.delete_zone_size)
    }
}
