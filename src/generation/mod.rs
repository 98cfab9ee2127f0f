pub mod output;
pub mod pipeline;
pub mod step;
pub mod steps;

use crate::config::steps::load_steps_config;
use crate::config::ConfigError;

pub use output::GenerationOutput;
pub use pipeline::GenerationPipeline;
pub use step::{GenerationContext, GenerationState, GenerationStep};

use self::steps::{
    AnimalZoneStep, ClearingStep, CrossingStep, DecorationStep, ItemSpawnStep, TerrainStep,
    WaterStep,
};

/// Build the default generation pipeline.
///
/// Reads step metadata from `assets/steps.json`,
/// then wires up the concrete step implementations.
///
/// **To add a new step:**
/// 1. Add metadata to `assets/steps.json`
/// 2. Implement `GenerationStep` trait
/// 3. Wire it up in the `match` below
pub fn build_default_pipeline(seed: u64) -> Result<GenerationPipeline, ConfigError> {
    let steps_config = load_steps_config()?;
    let mut pipeline = GenerationPipeline::new(seed);

    for meta in steps_config.steps {
        let step: Box<dyn GenerationStep> = match meta.id.as_str() {
            "water" => Box::new(WaterStep),
            "clearings" => Box::new(ClearingStep),
            "crossing" => Box::new(CrossingStep),
            "terrain" => Box::new(TerrainStep),
            "decorations" => Box::new(DecorationStep),
            "item_spawns" => Box::new(ItemSpawnStep),
            "animal_zones" => Box::new(AnimalZoneStep),
            other => return Err(ConfigError::UnknownStep(other.to_string())),
        };
        pipeline.register(meta, step);
    }

    Ok(pipeline)
}

/// Seed for retry `attempt` (attempt 0 keeps the requested seed).
pub fn derive_attempt_seed(master: u64, attempt: u32) -> u64 {
    if attempt == 0 {
        return master;
    }
    master ^ (attempt as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::params::GenerationParams;
    use crate::core::biome::BiomeRegistry;
    use crate::core::world::WorldProfile;
    use crate::config::world::WorldConfig;
    use crate::core::GenerationError;

    #[test]
    fn default_pipeline_follows_steps_json() {
        let pipeline = build_default_pipeline(1).unwrap();
        assert_eq!(
            pipeline.step_ids(),
            vec!["water", "clearings", "crossing", "terrain", "decorations", "item_spawns", "animal_zones"]
        );
    }

    #[test]
    fn steps_refuse_to_run_out_of_order() {
        let pipeline = build_default_pipeline(1).unwrap();
        let profile = WorldProfile::from_config(&WorldConfig::default()).unwrap();
        let registry = BiomeRegistry::builtin().unwrap();
        let biome = registry.require("woodland").unwrap();
        let params = GenerationParams::default();

        let mut state = GenerationState::new(&profile);
        // terrain before water
        let err = pipeline.run_step(3, &mut state, &profile, biome, &params).unwrap_err();
        assert_eq!(err, GenerationError::MissingStage { step: "terrain", requires: "water" });
    }

    #[test]
    fn step_index_past_the_end_is_rejected() {
        let pipeline = build_default_pipeline(1).unwrap();
        let profile = WorldProfile::from_config(&WorldConfig::default()).unwrap();
        let registry = BiomeRegistry::builtin().unwrap();
        let biome = registry.require("woodland").unwrap();
        let params = GenerationParams::default();

        let mut state = GenerationState::new(&profile);
        let err = pipeline.run_step(7, &mut state, &profile, biome, &params).unwrap_err();
        assert_eq!(err, GenerationError::StepOutOfRange { index: 7, total: 7 });
        assert!(state.water.is_none());
    }

    #[test]
    fn rerunning_a_step_on_frozen_inputs_reproduces_it() {
        let pipeline = build_default_pipeline(77).unwrap();
        let profile = WorldProfile::from_config(&WorldConfig::default()).unwrap();
        let registry = BiomeRegistry::builtin().unwrap();
        let biome = registry.require("woodland").unwrap();
        let params = GenerationParams::default();

        let state = pipeline.run_all(&profile, biome, &params).unwrap();
        let mut replay = state.clone();
        pipeline.run_step(5, &mut replay, &profile, biome, &params).unwrap();
        assert_eq!(replay.item_spawns, state.item_spawns);
    }

    #[test]
    fn attempt_seeds_are_distinct() {
        assert_eq!(derive_attempt_seed(9, 0), 9);
        assert_ne!(derive_attempt_seed(9, 1), derive_attempt_seed(9, 2));
    }
}
