//! # 装饰物摆放
//!
//! 树 / 灌木 / 岩石：有界拒绝采样，带最小间距与排除区。
//! 花：均匀撒点，只避开空地和水面。
//!
//! 采样次数用完仍未达标时直接返回较少的结果（只记一条 warn）。

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::algorithms::params::{ColliderSpec, GenerationParams};
use crate::config::biome::DecorationsConfig;
use crate::core::geometry::{any_within, Point};
use crate::core::grid::Grid;
use crate::core::obstacle::{Obstacle, ObstacleKind};
use crate::core::world::WorldProfile;

use super::clearing::{self, Clearing};
use super::water::WaterLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    Tree,
    Bush,
    BerryBush,
    Rock,
    Flower,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: Point,
    pub texture: String,
    /// 两段式树木的树冠贴图
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canopy: Option<String>,
}

/// Everything the decoration pass produced. Spawn derivation reads only this.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DecorationSet {
    pub trees: Vec<Point>,
    /// 全部灌木（含浆果灌木）
    pub bushes: Vec<Point>,
    /// 浆果灌木上方的刷新锚点
    pub berry_anchors: Vec<Point>,
    pub rocks: Vec<Point>,
    pub flowers: Vec<Point>,
    pub decorations: Vec<Decoration>,
    /// 树干 / 岩石碰撞体；输出时并入总碰撞体列表
    #[serde(skip)]
    pub obstacles: Vec<Obstacle>,
}

// ── 采样器 ──────────────────────────────────────────────────

/// Cell-center rejection sampler that never lands in a clearing or on water.
struct Scatter<'a> {
    grid: &'a Grid,
    clearings: &'a [Clearing],
    water: &'a WaterLayout,
}

impl Scatter<'_> {
    /// 内圈随机格（不取最外一圈）
    fn candidate(&self, rng: &mut StdRng) -> Option<Point> {
        let col_hi = (self.grid.cols() as i32 - 1).max(2);
        let row_hi = (self.grid.rows() as i32 - 1).max(2);
        let col = rng.gen_range(1..col_hi);
        let row = rng.gen_range(1..row_hi);
        if clearing::in_any(self.clearings, col, row) || self.water.contains(col, row) {
            return None;
        }
        Some(self.grid.to_world(col, row))
    }

    fn run(
        &self,
        label: &str,
        target: u32,
        attempt_factor: u32,
        rng: &mut StdRng,
        fits: impl Fn(&[Point], Point) -> bool,
    ) -> Vec<Point> {
        let mut placed = Vec::with_capacity(target as usize);
        for _ in 0..target * attempt_factor {
            if placed.len() >= target as usize {
                break;
            }
            let Some(p) = self.candidate(rng) else { continue };
            if fits(&placed, p) {
                placed.push(p);
            }
        }
        if placed.len() < target as usize {
            log::warn!("{label}: placed {}/{target}", placed.len());
        }
        placed
    }
}

fn collider(kind: ObstacleKind, at: Point, spec: &ColliderSpec) -> Obstacle {
    Obstacle::new(kind, at.offset(0.0, spec.offset_y), spec.width, spec.height)
}

fn pick<'a>(pool: &'a [String], rng: &mut StdRng) -> Option<&'a String> {
    if pool.is_empty() {
        None
    } else {
        Some(&pool[rng.gen_range(0..pool.len())])
    }
}

// ── 入口 ────────────────────────────────────────────────────

/// Places trees, bushes, rocks, then flowers, in that order.
pub fn place_decorations(
    grid: &Grid,
    profile: &WorldProfile,
    config: &DecorationsConfig,
    clearings: &[Clearing],
    water: &WaterLayout,
    params: &GenerationParams,
    rng: &mut StdRng,
) -> DecorationSet {
    let scatter = Scatter { grid, clearings, water };
    let mut set = DecorationSet::default();

    place_trees(&scatter, config, params, rng, &mut set);
    place_bushes(&scatter, config, params, rng, &mut set);
    place_rocks(&scatter, config, params, rng, &mut set);
    place_flowers(grid, profile, config, clearings, water, params, rng, &mut set);

    log::debug!(
        "decorations: trees={} bushes={} (berry {}) rocks={} flowers={}",
        set.trees.len(),
        set.bushes.len(),
        set.berry_anchors.len(),
        set.rocks.len(),
        set.flowers.len()
    );
    set
}

fn place_trees(
    scatter: &Scatter,
    config: &DecorationsConfig,
    params: &GenerationParams,
    rng: &mut StdRng,
    set: &mut DecorationSet,
) {
    let cfg = &config.trees;
    let trees = scatter.run("trees", cfg.count, params.tree_attempt_factor, rng, |placed, p| {
        !any_within(placed, p, cfg.min_dist)
    });

    for &p in &trees {
        let (texture, canopy) = match pick(&cfg.whole_trees, rng) {
            Some(whole) => (whole.clone(), None),
            None => (cfg.trunk.clone(), pick(&cfg.canopies, rng).cloned()),
        };
        set.decorations.push(Decoration { kind: DecorationKind::Tree, position: p, texture, canopy });
        set.obstacles.push(collider(ObstacleKind::Tree, p, &params.tree_collider));
    }
    set.trees = trees;
}

fn place_bushes(
    scatter: &Scatter,
    config: &DecorationsConfig,
    params: &GenerationParams,
    rng: &mut StdRng,
    set: &mut DecorationSet,
) {
    let cfg = &config.bushes;
    let trees = &set.trees;
    let bushes = scatter.run("bushes", cfg.count, params.bush_attempt_factor, rng, |placed, p| {
        !any_within(trees, p, cfg.tree_clearance) && !any_within(placed, p, cfg.min_dist)
    });

    for &p in &bushes {
        let berry = rng.gen_bool(cfg.berry_chance.clamp(0.0, 1.0));
        let (kind, texture) = if berry {
            set.berry_anchors.push(p.offset(0.0, -params.berry_anchor_lift));
            (DecorationKind::BerryBush, cfg.berry.clone())
        } else {
            (DecorationKind::Bush, cfg.plain.clone())
        };
        set.decorations.push(Decoration { kind, position: p, texture, canopy: None });
    }
    set.bushes = bushes;
}

fn place_rocks(
    scatter: &Scatter,
    config: &DecorationsConfig,
    params: &GenerationParams,
    rng: &mut StdRng,
    set: &mut DecorationSet,
) {
    let cfg = &config.rocks;
    let trees = &set.trees;
    let rocks = scatter.run("rocks", cfg.count, params.rock_attempt_factor, rng, |placed, p| {
        !any_within(trees, p, cfg.tree_clearance) && !any_within(placed, p, cfg.min_dist)
    });

    for &p in &rocks {
        set.decorations.push(Decoration {
            kind: DecorationKind::Rock,
            position: p,
            texture: cfg.texture.clone(),
            canopy: None,
        });
        set.obstacles.push(collider(ObstacleKind::Rock, p, &params.rock_collider));
    }
    set.rocks = rocks;
}

/// 花不做间距检查，也不注册碰撞体
#[allow(clippy::too_many_arguments)]
fn place_flowers(
    grid: &Grid,
    profile: &WorldProfile,
    config: &DecorationsConfig,
    clearings: &[Clearing],
    water: &WaterLayout,
    params: &GenerationParams,
    rng: &mut StdRng,
    set: &mut DecorationSet,
) {
    let cfg = &config.flowers;
    let inset = params.flower_inset;
    let span_x = (profile.width - 2.0 * inset).max(0.0);
    let span_y = (profile.height - 2.0 * inset).max(0.0);

    for _ in 0..cfg.count {
        let p = Point::new(
            inset + rng.gen_range(0.0..1.0) * span_x,
            inset + rng.gen_range(0.0..1.0) * span_y,
        );
        let cell = grid.to_cell(p.x, p.y);
        if clearing::in_any(clearings, cell.col, cell.row) || water.contains(cell.col, cell.row) {
            continue;
        }
        let Some(texture) = pick(&cfg.variants, rng) else { continue };
        set.decorations.push(Decoration {
            kind: DecorationKind::Flower,
            position: p,
            texture: texture.clone(),
            canopy: None,
        });
        set.flowers.push(p);
    }
}
