use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

const WORLD_JSON: &str = include_str!("../assets/world.json");

/// World dimensions in world units plus the lattice tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 3200,
            height: 2400,
            tile_size: 64,
        }
    }
}

pub fn load_world_config() -> Result<WorldConfig, ConfigError> {
    let config: WorldConfig = serde_json::from_str(WORLD_JSON)?;
    Ok(config)
}
