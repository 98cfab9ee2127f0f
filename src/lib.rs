//! Wildmap: 俯视角探索游戏的瓦片地图生成器
//!
//! 给定 biome 配置，按固定顺序生成：水体 → 空地 → 桥 → 地形 → 装饰 →
//! 物品刷新点 → 动物刷新区，输出一份不可变的 [`GenerationOutput`]。
//!
//! ```no_run
//! let map = wildmap::generate_builtin("woodland", 42).unwrap();
//! println!("start at {:?}", map.start_position);
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod generation;

use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

pub use crate::algorithms::params::GenerationParams;
pub use crate::config::ConfigError;
pub use crate::core::biome::{Biome, BiomeDefinition, BiomeRegistry};
pub use crate::core::world::WorldProfile;
pub use crate::core::GenerationError;
pub use crate::generation::{build_default_pipeline, GenerationOutput};

use crate::config::world::load_world_config;
use crate::generation::derive_attempt_seed;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// One attempt with exactly `seed`, no retry.
pub fn generate_once(
    profile: &WorldProfile,
    biome: &BiomeDefinition,
    params: &GenerationParams,
    seed: u64,
) -> Result<GenerationOutput, Error> {
    let pipeline = build_default_pipeline(seed)?;
    let state = pipeline.run_all(profile, biome, params)?;
    Ok(GenerationOutput::from_state(state, biome.id(), seed, 1)?)
}

/// Generates a map, retrying with derived seeds while the result is unusable.
///
/// Gives up after `params.max_attempts` and returns the last error.
pub fn generate(
    profile: &WorldProfile,
    biome: &BiomeDefinition,
    params: &GenerationParams,
    seed: u64,
) -> Result<GenerationOutput, Error> {
    let started = Instant::now();
    let mut pipeline = build_default_pipeline(seed)?;
    let max_attempts = params.max_attempts.max(1);
    let mut last_err = None;

    log::info!("generating `{}` map, seed {seed}", biome.id());

    for attempt in 0..max_attempts {
        let attempt_seed = derive_attempt_seed(seed, attempt);
        pipeline.set_seed(attempt_seed);

        match pipeline
            .run_all(profile, biome, params)
            .and_then(|state| GenerationOutput::from_state(state, biome.id(), attempt_seed, attempt + 1))
        {
            Ok(output) => {
                log::info!(
                    "`{}` map ready in {:.2?} ({} attempt(s), {} obstacles)",
                    biome.id(),
                    started.elapsed(),
                    attempt + 1,
                    output.obstacles.len()
                );
                return Ok(output);
            }
            Err(err) => {
                log::warn!("attempt {}/{max_attempts} failed: {err}", attempt + 1);
                last_err = Some(err);
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| GenerationError::Unreachable {
            reason: "no generation attempt was made".to_string(),
        })
        .into())
}

/// Independent generations for many seeds, run in parallel.
pub fn generate_batch(
    profile: &WorldProfile,
    biome: &BiomeDefinition,
    params: &GenerationParams,
    seeds: &[u64],
) -> Vec<Result<GenerationOutput, Error>> {
    seeds
        .par_iter()
        .map(|&seed| generate(profile, biome, params, seed))
        .collect()
}

/// Built-in world size and biomes, default parameters.
///
/// Unknown biome ids fall back to woodland.
pub fn generate_builtin(biome_id: &str, seed: u64) -> Result<GenerationOutput, Error> {
    let profile = WorldProfile::from_config(&load_world_config()?)?;
    let registry = BiomeRegistry::builtin()?;
    let biome = registry
        .get(biome_id)
        .ok_or_else(|| ConfigError::UnknownBiome(biome_id.to_string()))?;
    generate(&profile, biome, &GenerationParams::default(), seed)
}
