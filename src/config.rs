//! Board configuration from CLI flags and `STRUCTBOARD_*` environment variables.

use canvas::config::BoardConfig;
use canvas::consts::{
    DEFAULT_DELETE_ZONE_SIZE, DEFAULT_HISTORY_LIMIT, DEFAULT_PASTE_OFFSET, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};
use clap::Args;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be a finite, non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("delete zone ({size}) does not fit in a {width}x{height} viewport")]
    ZoneTooLarge { size: f64, width: f64, height: f64 },
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, env = "STRUCTBOARD_VIEWPORT_WIDTH", default_value_t = DEFAULT_VIEWPORT_WIDTH)]
    pub viewport_width: f64,

    #[arg(long, env = "STRUCTBOARD_VIEWPORT_HEIGHT", default_value_t = DEFAULT_VIEWPORT_HEIGHT)]
    pub viewport_height: f64,

    #[arg(long, env = "STRUCTBOARD_DELETE_ZONE", default_value_t = DEFAULT_DELETE_ZONE_SIZE, help = "Side of the bottom-right drop-to-delete square; 0 disables it")]
    pub delete_zone: f64,

    #[arg(long, env = "STRUCTBOARD_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT, help = "Undo snapshots kept; 0 disables undo")]
    pub history_limit: usize,

    #[arg(long, env = "STRUCTBOARD_PASTE_OFFSET", default_value_t = DEFAULT_PASTE_OFFSET)]
    pub paste_offset: f64,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            delete_zone: DEFAULT_DELETE_ZONE_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            paste_offset: DEFAULT_PASTE_OFFSET,
        }
    }
}

impl ConfigArgs {
    /// Validate the flags and build the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive viewport, a negative or
    /// non-finite zone or paste offset, or a zone larger than the viewport.
    pub fn to_board_config(&self) -> Result<BoardConfig, ConfigError> {
        let viewport_width = positive("viewport width", self.viewport_width)?;
        let viewport_height = positive("viewport height", self.viewport_height)?;
        let delete_zone_size = non_negative("delete zone", self.delete_zone)?;
        let paste_offset = non_negative("paste offset", self.paste_offset)?;

        if delete_zone_size > viewport_width.min(viewport_height) {
            return Err(ConfigError::ZoneTooLarge {
                size: delete_zone_size,
                width: viewport_width,
                height: viewport_height,
            });
        }

        Ok(BoardConfig {
            viewport_width,
            viewport_height,
            delete_zone_size,
            history_limit: self.history_limit,
            paste_offset,
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 { Ok(value) } else { Err(ConfigError::NotPositive { name, value }) }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 { Ok(value) } else { Err(ConfigError::Negative { name, value }) }
}
