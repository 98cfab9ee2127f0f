use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithms::params::GenerationParams;
use crate::config::steps::StepMeta;
use crate::core::biome::BiomeDefinition;
use crate::core::world::WorldProfile;
use crate::core::GenerationError;

use super::step::{GenerationContext, GenerationState, GenerationStep};

/// 元数据 + 执行逻辑
pub struct PipelineStep {
    pub meta: StepMeta,
    pub step: Box<dyn GenerationStep>,
}

/// Manages an ordered list of generation steps.
///
/// Each step gets its own RNG derived from a master seed, so any single
/// step can be re-run on frozen inputs and reproduce the same result.
pub struct GenerationPipeline {
    steps: Vec<PipelineStep>,
    /// Master seed; each step derives a sub-seed from this.
    seed: u64,
}

impl GenerationPipeline {
    pub fn new(seed: u64) -> Self {
        Self {
            steps: Vec::new(),
            seed,
        }
    }

    /// Append a step to the pipeline.
    pub fn register(&mut self, meta: StepMeta, step: Box<dyn GenerationStep>) {
        self.steps.push(PipelineStep { meta, step });
    }

    // ── accessors ───────────────────────────────────────────

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.meta.id.as_str()).collect()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    // ── running ─────────────────────────────────────────────

    /// Execute step `index` against `state`. An index past the last step is an error.
    pub fn run_step(
        &self,
        index: usize,
        state: &mut GenerationState,
        profile: &WorldProfile,
        biome: &BiomeDefinition,
        params: &GenerationParams,
    ) -> Result<(), GenerationError> {
        let entry = self.steps.get(index).ok_or(GenerationError::StepOutOfRange {
            index,
            total: self.steps.len(),
        })?;

        let mut rng = StdRng::seed_from_u64(derive_step_seed(self.seed, index));
        let mut ctx = GenerationContext {
            profile,
            biome,
            params,
            rng: &mut rng,
            state,
        };

        let started = Instant::now();
        entry.step.execute(&mut ctx)?;
        log::debug!(
            "[{}/{}] {} ({}) done in {:.2?}",
            index + 1,
            self.steps.len(),
            entry.meta.name,
            entry.meta.id,
            started.elapsed()
        );
        Ok(())
    }

    /// Run every step from a fresh state.
    pub fn run_all(
        &self,
        profile: &WorldProfile,
        biome: &BiomeDefinition,
        params: &GenerationParams,
    ) -> Result<GenerationState, GenerationError> {
        let mut state = GenerationState::new(profile);
        for index in 0..self.steps.len() {
            self.run_step(index, &mut state, profile, biome, params)?;
        }
        Ok(state)
    }
}

/// Deterministic per-step seed derived from the master seed.
pub(crate) fn derive_step_seed(master: u64, step_index: usize) -> u64 {
    master
        .wrapping_add(step_index as u64)
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}
