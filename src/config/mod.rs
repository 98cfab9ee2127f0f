pub mod biome;
pub(crate) mod ordered;
pub mod steps;
pub mod world;

use thiserror::Error;

/// 配置加载 / 校验错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown biome `{0}`")]
    UnknownBiome(String),

    #[error("invalid world size {width}x{height} for tile size {tile_size}: need at least {min_cols}x{min_rows} cells")]
    InvalidWorldSize {
        width: u32,
        height: u32,
        tile_size: u32,
        min_cols: u32,
        min_rows: u32,
    },

    #[error("steps.json references unknown step `{0}`")]
    UnknownStep(String),
}
