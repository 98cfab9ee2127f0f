use rand::rngs::StdRng;

use crate::algorithms::clearing::Clearing;
use crate::algorithms::decoration::DecorationSet;
use crate::algorithms::params::GenerationParams;
use crate::algorithms::spawn_points::SpawnRegistry;
use crate::algorithms::terrain::TerrainLayer;
use crate::algorithms::water::WaterLayout;
use crate::core::biome::BiomeDefinition;
use crate::core::grid::{CellMask, Grid};
use crate::core::world::WorldProfile;
use crate::core::GenerationError;

// ── State ────────────────────────────────────────────────

/// 生成过程中的共享状态（在步骤间传递）
///
/// 每个字段由恰好一个步骤写入；后续步骤只读。
#[derive(Debug, Clone)]
pub struct GenerationState {
    /// 占用网格（水面、空地写入）
    pub grid: Grid,
    pub water: Option<WaterLayout>,
    pub clearings: Option<Vec<Clearing>>,
    pub crossing: Option<CellMask>,
    pub terrain: Option<TerrainLayer>,
    pub decorations: Option<DecorationSet>,
    pub item_spawns: Option<SpawnRegistry>,
    pub animal_zones: Option<SpawnRegistry>,
}

impl GenerationState {
    pub fn new(profile: &WorldProfile) -> Self {
        Self {
            grid: Grid::new(profile),
            water: None,
            clearings: None,
            crossing: None,
            terrain: None,
            decorations: None,
            item_spawns: None,
            animal_zones: None,
        }
    }
}

/// Borrow an earlier step's result or report which step is missing.
pub fn require<'a, T>(
    slot: &'a Option<T>,
    step: &'static str,
    requires: &'static str,
) -> Result<&'a T, GenerationError> {
    slot.as_ref()
        .ok_or(GenerationError::MissingStage { step, requires })
}

// ── Context ─────────────────────────────────────────────────

/// Everything a generation step needs to do its work.
pub struct GenerationContext<'a> {
    pub profile: &'a WorldProfile,
    pub biome: &'a BiomeDefinition,
    pub params: &'a GenerationParams,
    pub rng: &'a mut StdRng,
    pub state: &'a mut GenerationState,
}

// ── Step trait ───────────────────────────────────────────────

/// Trait that every generation step must implement.
///
/// # How to add a new step
///
/// 1. Implement this trait on a struct in `src/generation/steps.rs`
/// 2. Add metadata to `assets/steps.json`
/// 3. Wire the id up in [`super::build_default_pipeline()`]
pub trait GenerationStep: Send + Sync {
    /// 与 steps.json 中的 id 一致
    fn id(&self) -> &'static str;

    /// Execute the step, writing its result into `ctx.state`.
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError>;
}
