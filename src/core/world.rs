use serde::Serialize;

use crate::config::ConfigError;
use crate::config::world::WorldConfig;

/// Smallest lattice on which all three clearings still fit beside the water.
pub const MIN_GRID_COLS: u32 = 40;
pub const MIN_GRID_ROWS: u32 = 30;

/// Validated world dimensions, shared read-only by every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldProfile {
    pub width: f64,
    pub height: f64,
    pub tile_size: f64,
    pub cols: u32,
    pub rows: u32,
}

impl WorldProfile {
    pub fn from_config(config: &WorldConfig) -> Result<Self, ConfigError> {
        let (cols, rows) = resolve_grid(config)?;
        Ok(Self {
            width: config.width as f64,
            height: config.height as f64,
            tile_size: config.tile_size as f64,
            cols,
            rows,
        })
    }
}

fn resolve_grid(config: &WorldConfig) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidWorldSize {
        width: config.width,
        height: config.height,
        tile_size: config.tile_size,
        min_cols: MIN_GRID_COLS,
        min_rows: MIN_GRID_ROWS,
    };

    if config.tile_size == 0 {
        return Err(invalid());
    }
    let cols = config.width / config.tile_size;
    let rows = config.height / config.tile_size;
    if cols < MIN_GRID_COLS || rows < MIN_GRID_ROWS {
        return Err(invalid());
    }
    Ok((cols, rows))
}
