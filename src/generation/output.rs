use serde::Serialize;

use crate::algorithms::clearing::Clearing;
use crate::algorithms::decoration::DecorationSet;
use crate::algorithms::spawn_points::SpawnRegistry;
use crate::algorithms::terrain::{TileAssignment, WaterTileHandle};
use crate::algorithms::water::Pond;
use crate::core::geometry::Point;
use crate::core::grid::CellMask;
use crate::core::obstacle::Obstacle;
use crate::core::GenerationError;

use super::step::GenerationState;

/// One finished map. Immutable once returned; nothing is kept between runs.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    pub biome: String,
    /// 实际生效的种子（重试后可能与请求的不同）
    pub seed: u64,
    pub attempts: u32,
    pub cols: u32,
    pub rows: u32,
    pub tile_size: f64,

    /// 默认出生 / 建造点 = 第一个空地的中心
    pub start_position: Point,
    pub clearings: Vec<Clearing>,
    pub item_spawns: SpawnRegistry,
    pub animal_zones: SpawnRegistry,
    /// 水面碰撞体在前，树木 / 岩石在后
    pub obstacles: Vec<Obstacle>,
    pub water_tiles: Vec<WaterTileHandle>,

    pub tiles: Vec<TileAssignment>,
    pub decorations: DecorationSet,
    pub water: CellMask,
    pub crossing: CellMask,
    pub bank: CellMask,
    pub ponds: Vec<Pond>,
}

impl GenerationOutput {
    pub fn from_state(
        state: GenerationState,
        biome: &str,
        seed: u64,
        attempts: u32,
    ) -> Result<Self, GenerationError> {
        const STEP: &str = "output";
        let missing = |requires| GenerationError::MissingStage { step: STEP, requires };

        let grid = state.grid;
        let water = state.water.ok_or_else(|| missing("water"))?;
        let clearings = state.clearings.ok_or_else(|| missing("clearings"))?;
        let crossing = state.crossing.ok_or_else(|| missing("crossing"))?;
        let terrain = state.terrain.ok_or_else(|| missing("terrain"))?;
        let mut decorations = state.decorations.ok_or_else(|| missing("decorations"))?;
        let item_spawns = state.item_spawns.ok_or_else(|| missing("item_spawns"))?;
        let animal_zones = state.animal_zones.ok_or_else(|| missing("animal_zones"))?;

        let start_position = clearings
            .first()
            .map(|c| c.center)
            .ok_or_else(|| GenerationError::Unreachable {
                reason: "no clearing to start from".to_string(),
            })?;

        let mut obstacles = terrain.obstacles;
        obstacles.append(&mut decorations.obstacles);

        Ok(Self {
            biome: biome.to_string(),
            seed,
            attempts,
            cols: grid.cols(),
            rows: grid.rows(),
            tile_size: grid.tile_size(),
            start_position,
            clearings,
            item_spawns,
            animal_zones,
            obstacles,
            water_tiles: terrain.water_tiles,
            tiles: terrain.tiles,
            decorations,
            water: water.cells,
            crossing,
            bank: terrain.bank,
            ponds: water.ponds,
        })
    }

    /// Whether any blocking collider covers `p`.
    pub fn is_blocked(&self, p: Point) -> bool {
        self.obstacles.iter().any(|o| o.contains(p))
    }
}
