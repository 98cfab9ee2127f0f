//! 地形铺设：逐格分类 + 水面碰撞体

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::config::biome::TerrainConfig;
use crate::core::grid::{CellMask, Grid};
use crate::core::obstacle::{Obstacle, ObstacleKind};

use super::clearing::{self, Clearing};
use super::water::WaterLayout;

pub const BRIDGE_TEXTURE: &str = "terrain-bridge";

/// 格子分类，按优先级从高到低
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Crossing,
    Water,
    Bank,
    Clearing,
    Base,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileAssignment {
    pub col: i32,
    pub row: i32,
    pub kind: TileKind,
    pub texture: String,
    /// 贴图变体下标；无变体的分类为 0
    pub variant: u32,
}

/// Handle to a water tile that stays blocking, for ambient animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaterTileHandle {
    /// 在 `tiles` 中的下标
    pub tile_index: usize,
    pub col: i32,
    pub row: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerrainLayer {
    /// 栅格顺序（行优先）
    pub tiles: Vec<TileAssignment>,
    pub obstacles: Vec<Obstacle>,
    pub water_tiles: Vec<WaterTileHandle>,
    pub bank: CellMask,
}

impl TerrainLayer {
    pub fn tile_at(&self, cols: u32, col: i32, row: i32) -> Option<&TileAssignment> {
        if col < 0 || row < 0 || col as u32 >= cols {
            return None;
        }
        self.tiles.get(row as usize * cols as usize + col as usize)
    }
}

pub fn classify(
    col: i32,
    row: i32,
    water: &WaterLayout,
    crossing: &CellMask,
    bank: &CellMask,
    clearings: &[Clearing],
) -> TileKind {
    if crossing.contains(col, row) {
        TileKind::Crossing
    } else if water.contains(col, row) {
        TileKind::Water
    } else if bank.contains(col, row) {
        TileKind::Bank
    } else if clearing::in_any(clearings, col, row) {
        TileKind::Clearing
    } else {
        TileKind::Base
    }
}

fn roll_variant(count: u32, rng: &mut StdRng) -> u32 {
    if count == 0 { 0 } else { rng.gen_range(0..count) }
}

/// Paints every cell in raster order and registers one tile-sized collider per
/// water cell outside the crossing. Water is the only terrain that blocks.
pub fn paint(
    grid: &Grid,
    terrain: &TerrainConfig,
    water: &WaterLayout,
    crossing: &CellMask,
    clearings: &[Clearing],
    rng: &mut StdRng,
) -> TerrainLayer {
    let bank = water.bank();
    let tile = grid.tile_size();
    let capacity = (grid.cols() * grid.rows()) as usize;

    let mut tiles = Vec::with_capacity(capacity);
    let mut obstacles = Vec::new();
    let mut water_tiles = Vec::new();

    for row in 0..grid.rows() as i32 {
        for col in 0..grid.cols() as i32 {
            let kind = classify(col, row, water, crossing, &bank, clearings);
            let (texture, variant) = match kind {
                TileKind::Crossing => (BRIDGE_TEXTURE.to_string(), 0),
                TileKind::Water => {
                    let v = roll_variant(terrain.water_variants, rng);
                    (format!("terrain-{}-{v}", terrain.water), v)
                }
                TileKind::Bank => (terrain.bank_tile.clone(), 0),
                TileKind::Clearing => (terrain.clearing_tile.clone(), 0),
                TileKind::Base => {
                    let v = roll_variant(terrain.base_variants, rng);
                    (format!("{}-{v}", terrain.base), v)
                }
            };

            if kind == TileKind::Water {
                water_tiles.push(WaterTileHandle { tile_index: tiles.len(), col, row });
                obstacles.push(Obstacle::new(
                    ObstacleKind::Water,
                    grid.to_world(col, row),
                    tile,
                    tile,
                ));
            }
            tiles.push(TileAssignment { col, row, kind, texture, variant });
        }
    }

    TerrainLayer { tiles, obstacles, water_tiles, bank }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::config::biome::{load_biomes_config, WaterType};
    use crate::config::world::WorldConfig;
    use crate::core::geometry::Point;
    use crate::core::world::WorldProfile;

    #[test]
    fn priority_and_colliders() {
        let profile = WorldProfile::from_config(&WorldConfig::default()).unwrap();
        let grid = Grid::new(&profile);
        let terrain = load_biomes_config().unwrap()["woodland"].terrain.clone();

        let mut cells = grid.empty_mask();
        for row in 0..37 {
            cells.insert(10, row);
        }
        let water = WaterLayout { kind: WaterType::River, cells, ponds: Vec::new() };
        let mut crossing = grid.empty_mask();
        crossing.insert(10, 18);
        let clearings = vec![Clearing {
            left: 11,
            top: 0,
            right: 14,
            bottom: 4,
            center: Point::new(0.0, 0.0),
        }];

        let mut rng = StdRng::seed_from_u64(3);
        let layer = paint(&grid, &terrain, &water, &crossing, &clearings, &mut rng);

        assert_eq!(layer.tiles.len(), 50 * 37);
        assert_eq!(layer.tile_at(50, 10, 18).unwrap().kind, TileKind::Crossing);
        assert_eq!(layer.tile_at(50, 10, 18).unwrap().texture, BRIDGE_TEXTURE);
        assert_eq!(layer.tile_at(50, 10, 3).unwrap().kind, TileKind::Water);
        // bank wins over clearing
        assert_eq!(layer.tile_at(50, 11, 2).unwrap().kind, TileKind::Bank);
        assert_eq!(layer.tile_at(50, 12, 2).unwrap().kind, TileKind::Clearing);
        assert_eq!(layer.tile_at(50, 12, 2).unwrap().texture, "terrain-dirt");
        assert!(layer.tile_at(50, 30, 30).unwrap().texture.starts_with("terrain-grass-"));

        assert_eq!(layer.obstacles.len(), 36);
        assert_eq!(layer.water_tiles.len(), 36);
        let bridge = grid.to_world(10, 18);
        assert!(layer.obstacles.iter().all(|o| !o.contains(bridge)));
        for handle in &layer.water_tiles {
            assert_eq!(layer.tiles[handle.tile_index].kind, TileKind::Water);
        }
    }
}
