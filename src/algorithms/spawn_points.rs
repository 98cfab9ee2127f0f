//! # 物品刷新点推导
//!
//! 刷新点不是独立随机的：全部由已经落定的装饰物 / 水面 / 空地推导，
//! 唯一的随机性是打乱树列表和小幅抖动。
//!
//! 物品归属哪条规则由 biome 配置的 `item_roles` 决定；
//! 建材则来自 `portal_stages` 的消耗表。

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::algorithms::params::GenerationParams;
use crate::config::biome::{BiomeConfig, ItemRole, WaterType};
use crate::core::geometry::Point;
use crate::core::grid::{Grid, NEIGHBORS_8};
use crate::core::world::WorldProfile;

use super::clearing::Clearing;
use super::decoration::DecorationSet;
use super::water::WaterLayout;

/// 类型 id → 候选坐标列表
pub type SpawnRegistry = BTreeMap<String, Vec<Point>>;

/// Frozen inputs of the item spawn derivation.
pub struct SpawnInputs<'a> {
    pub profile: &'a WorldProfile,
    pub grid: &'a Grid,
    pub water: &'a WaterLayout,
    pub clearings: &'a [Clearing],
    pub decorations: &'a DecorationSet,
}

/// Uniform in `[-amount, amount)`.
pub(crate) fn jitter(rng: &mut StdRng, amount: f64) -> f64 {
    (rng.gen_range(0.0..1.0) * 2.0 - 1.0) * amount
}

fn jittered(p: Point, amount: f64, rng: &mut StdRng) -> Point {
    p.offset(jitter(rng, amount), jitter(rng, amount))
}

/// Builds the item registry. Every key of `item_spawn_counts` is present,
/// possibly with an empty list; roles naming items outside that table are skipped.
pub fn derive_item_spawns(
    biome: &BiomeConfig,
    inputs: &SpawnInputs,
    params: &GenerationParams,
    rng: &mut StdRng,
) -> SpawnRegistry {
    let mut registry: SpawnRegistry = biome
        .item_spawn_counts
        .keys()
        .map(|k| (k.clone(), Vec::new()))
        .collect();
    let deco = inputs.decorations;

    // ── 浆果类：正好是浆果灌木的锚点 ──
    for item in biome.items_with_role(ItemRole::BerryFood) {
        if let Some(list) = registry.get_mut(item) {
            list.extend_from_slice(&deco.berry_anchors);
        }
    }

    // ── 树下食物：打乱后的树列表切成互不重叠的片段 ──
    let mut shuffled = deco.trees.clone();
    shuffled.shuffle(rng);
    let mut remaining = shuffled.as_slice();
    for item in biome.items_with_role(ItemRole::TreeFood) {
        let Some(list) = registry.get_mut(item) else { continue };
        let take = params.tree_food_per_type.min(remaining.len());
        let (slice, rest) = remaining.split_at(take);
        for t in slice {
            list.push(Point::new(
                t.x + jitter(rng, params.tree_food_jitter),
                t.y + params.tree_food_drop,
            ));
        }
        remaining = rest;
    }

    // ── 水边食物 ──
    let water_food = biome.items_with_role(ItemRole::WaterFood);
    if !water_food.is_empty() {
        let bank = water_bank_spawns(inputs.grid, inputs.water, params);
        for item in water_food {
            if let Some(list) = registry.get_mut(item) {
                list.extend_from_slice(&bank);
            }
        }
    }

    // ── 岩石旁 ──
    for item in biome.items_with_role(ItemRole::RockFood) {
        let Some(list) = registry.get_mut(item) else { continue };
        for &r in &deco.rocks {
            list.push(jittered(r, params.rock_item_jitter, rng));
        }
    }

    // ── 建材 ──
    for mat in biome.building_materials() {
        let Some(list) = registry.get_mut(mat) else { continue };
        list.extend(material_spawns(inputs, params, rng));
    }

    registry
}

/// 一种建材的候选点：非起始空地、地图四边、岩石旁、随机散布
fn material_spawns(inputs: &SpawnInputs, params: &GenerationParams, rng: &mut StdRng) -> Vec<Point> {
    let (w, h) = (inputs.profile.width, inputs.profile.height);
    let mut out = Vec::new();

    for c in inputs.clearings.iter().skip(1) {
        for _ in 0..params.material_per_clearing {
            out.push(jittered(c.center, params.material_clearing_jitter, rng));
        }
    }

    let inset = params.material_edge_inset;
    let band = params.material_edge_band;
    for _ in 0..params.material_edge_count {
        let along_x = rng.gen_range(0.0..1.0) * w;
        let along_y = rng.gen_range(0.0..1.0) * h;
        let depth = rng.gen_range(0.0..1.0) * band;
        let p = match rng.gen_range(0..4) {
            0 => Point::new(inset + depth, along_y),
            1 => Point::new(w - inset - depth, along_y),
            2 => Point::new(along_x, inset + depth),
            _ => Point::new(along_x, h - inset - depth),
        };
        out.push(p);
    }

    for &r in &inputs.decorations.rocks {
        out.push(jittered(r, params.rock_item_jitter, rng));
    }

    let s = params.material_scatter_inset;
    for _ in 0..params.material_scatter_count {
        out.push(Point::new(
            s + rng.gen_range(0.0..1.0) * (w - 2.0 * s).max(0.0),
            s + rng.gen_range(0.0..1.0) * (h - 2.0 * s).max(0.0),
        ));
    }
    out
}

/// Positions along the water edge. Deterministic for a given layout.
///
/// River: every few rows, the first water cell with dry land left or right
/// of it. Ponds: for each water cell on the shore, its first dry neighbour.
pub fn water_bank_spawns(grid: &Grid, water: &WaterLayout, params: &GenerationParams) -> Vec<Point> {
    let mut out = Vec::new();
    match water.kind {
        WaterType::River => {
            let stride = params.river_bank_row_stride.max(1) as usize;
            let end = grid.rows().saturating_sub(2) as i32;
            for row in (params.river_bank_row_start as i32..end).step_by(stride) {
                let hit = (0..grid.cols() as i32).find(|&col| {
                    water.contains(col, row)
                        && (!water.contains(col - 1, row) || !water.contains(col + 1, row))
                });
                if let Some(col) = hit {
                    out.push(grid.to_world(col, row));
                }
            }
        }
        WaterType::Oasis => {
            for cell in water.cells.iter() {
                let dry = NEIGHBORS_8.iter().find(|(dc, dr)| {
                    let (c, r) = (cell.col + dc, cell.row + dr);
                    grid.in_bounds(c, r) && !water.contains(c, r)
                });
                if let Some((dc, dr)) = dry {
                    out.push(grid.to_world(cell.col + dc, cell.row + dr));
                }
            }
        }
    }
    out
}
