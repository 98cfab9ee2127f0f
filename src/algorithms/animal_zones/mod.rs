//! # 动物刷新区
//!
//! 每种动物生成至多 `count × 2` 个候选点。
//!
//! 通用规则只看胆小与否：胆小的只接受靠近地图边缘的点。
//! biome 可以按动物类型整体替换规则（[`AnimalZonePolicy`]），
//! 替换后的规则不再与通用规则叠加。

pub mod desert;
pub mod woodland;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::algorithms::params::GenerationParams;
use crate::config::biome::{AnimalConfig, BiomeConfig};
use crate::core::geometry::{any_within, Point};
use crate::core::grid::Grid;
use crate::core::world::WorldProfile;

use super::clearing::{self, Clearing};
use super::spawn_points::{jitter, SpawnRegistry};
use super::water::WaterLayout;

// ═══════════════════════════════════════════════════════════
// 规则
// ═══════════════════════════════════════════════════════════

/// Spatial filter applied on top of the base rejection constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZonePredicate {
    Anywhere,
    /// 距左右边 `margin_x` 以内，或距上下边 `margin_y` 以内
    NearEdges { margin_x: f64, margin_y: f64 },
    /// 离四条边都超过 `margin`
    Interior { margin: f64 },
    /// 离每个空地中心都超过 `min_dist`
    FarFromClearings { min_dist: f64 },
    /// `radius` 内至少 `min_trees` 棵树
    DenseTrees { radius: f64, min_trees: usize },
    /// 离左右边都超过 `margin`
    WithinColumns { margin: f64 },
    /// 靠左右边，或靠南边
    SidesOrSouth { margin_x: f64, margin_south: f64 },
}

impl ZonePredicate {
    pub fn accepts(&self, p: Point, ctx: &ZoneContext) -> bool {
        let (w, h) = (ctx.profile.width, ctx.profile.height);
        match *self {
            ZonePredicate::Anywhere => true,
            ZonePredicate::NearEdges { margin_x, margin_y } => {
                p.x < margin_x || p.x > w - margin_x || p.y < margin_y || p.y > h - margin_y
            }
            ZonePredicate::Interior { margin } => {
                p.x > margin && p.x < w - margin && p.y > margin && p.y < h - margin
            }
            ZonePredicate::FarFromClearings { min_dist } => ctx
                .clearings
                .iter()
                .all(|c| p.distance(c.center) > min_dist),
            ZonePredicate::DenseTrees { radius, min_trees } => {
                let r2 = radius * radius;
                ctx.trees.iter().filter(|t| t.distance_sq(p) < r2).count() >= min_trees
            }
            ZonePredicate::WithinColumns { margin } => p.x > margin && p.x < w - margin,
            ZonePredicate::SidesOrSouth { margin_x, margin_south } => {
                p.x < margin_x || p.x > w - margin_x || p.y > h - margin_south
            }
        }
    }
}

/// How one animal type's candidates are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZonePlan {
    /// 拒绝采样 + 空间过滤
    Sample(ZonePredicate),
    /// 沿水边取点（每 `row_stride` 行，水格左右 `reach` 格内找第一块干地）；
    /// 点数不够预算时退回 `Sample(Anywhere)`
    WaterEdge { row_stride: u32, reach: i32 },
    /// 每个空地中心周围 `±spread` 直接撒 `per_clearing` 个点，不做拒绝采样
    AroundClearings { per_clearing: u32, spread: f64 },
}

/// Per-biome replacement rules, keyed by animal type.
pub trait AnimalZonePolicy: Send + Sync {
    fn override_for(&self, kind: &str) -> Option<ZonePlan>;
}

/// 没有任何替换规则
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericZones;

impl AnimalZonePolicy for GenericZones {
    fn override_for(&self, _kind: &str) -> Option<ZonePlan> {
        None
    }
}

/// The shy/bold rule every animal falls back to.
pub fn generic_plan(animal: &AnimalConfig, params: &GenerationParams) -> ZonePlan {
    if animal.shy {
        ZonePlan::Sample(ZonePredicate::NearEdges {
            margin_x: params.shy_margin_x,
            margin_y: params.shy_margin_y,
        })
    } else {
        ZonePlan::Sample(ZonePredicate::Anywhere)
    }
}

/// 优先用 biome 的替换规则，否则走通用规则
pub fn resolve_plan(
    policy: &dyn AnimalZonePolicy,
    kind: &str,
    animal: &AnimalConfig,
    params: &GenerationParams,
) -> ZonePlan {
    policy
        .override_for(kind)
        .unwrap_or_else(|| generic_plan(animal, params))
}

// ═══════════════════════════════════════════════════════════
// 采样
// ═══════════════════════════════════════════════════════════

/// Frozen inputs of the animal zone derivation.
pub struct ZoneContext<'a> {
    pub profile: &'a WorldProfile,
    pub grid: &'a Grid,
    pub clearings: &'a [Clearing],
    pub water: &'a WaterLayout,
    pub trees: &'a [Point],
    pub params: &'a GenerationParams,
}

impl ZoneContext<'_> {
    /// 基础约束：不在空地格内，离每棵树至少 `animal_tree_clearance`
    pub fn is_open_ground(&self, p: Point) -> bool {
        let cell = self.grid.to_cell(p.x, p.y);
        !clearing::in_any(self.clearings, cell.col, cell.row)
            && !any_within(self.trees, p, self.params.animal_tree_clearance)
    }

    /// Whether `p` is a point `plan` could have produced.
    pub fn admits(&self, plan: &ZonePlan, p: Point) -> bool {
        match *plan {
            ZonePlan::Sample(pred) => self.is_open_ground(p) && pred.accepts(p, self),
            ZonePlan::WaterEdge { reach, .. } => {
                let cell = self.grid.to_cell(p.x, p.y);
                let on_edge = !self.water.contains(cell.col, cell.row)
                    && (-reach..=reach).any(|d| self.water.contains(cell.col + d, cell.row));
                on_edge || self.is_open_ground(p)
            }
            ZonePlan::AroundClearings { spread, .. } => self.clearings.iter().any(|c| {
                (p.x - c.center.x).abs() <= spread && (p.y - c.center.y).abs() <= spread
            }),
        }
    }
}

/// Bounded rejection sampling inside the inset world rectangle.
pub fn pick_spawn_points(
    ctx: &ZoneContext,
    budget: usize,
    predicate: ZonePredicate,
    rng: &mut StdRng,
) -> Vec<Point> {
    let params = ctx.params;
    let inset = params.animal_inset;
    let span_x = (ctx.profile.width - 2.0 * inset).max(0.0);
    let span_y = (ctx.profile.height - 2.0 * inset).max(0.0);

    let mut points = Vec::with_capacity(budget);
    for _ in 0..budget * params.animal_attempt_factor as usize {
        if points.len() >= budget {
            break;
        }
        let p = Point::new(
            inset + rng.gen_range(0.0..1.0) * span_x,
            inset + rng.gen_range(0.0..1.0) * span_y,
        );
        if !ctx.is_open_ground(p) || any_within(&points, p, params.animal_spacing) {
            continue;
        }
        if predicate.accepts(p, ctx) {
            points.push(p);
        }
    }
    points
}

/// 水边候选：对每个满足行步长的水格，从左到右在 ±reach 格内找第一块干地
fn water_edge_points(ctx: &ZoneContext, row_stride: u32, reach: i32) -> Vec<Point> {
    let stride = row_stride.max(1) as i32;
    ctx.water
        .cells
        .iter()
        .filter(|cell| cell.row % stride == 0)
        .filter_map(|cell| {
            (-reach..=reach)
                .map(|dc| cell.col + dc)
                .find(|&c| !ctx.water.contains(c, cell.row))
                .map(|c| ctx.grid.to_world(c, cell.row))
        })
        .collect()
}

pub fn run_plan(ctx: &ZoneContext, plan: ZonePlan, budget: usize, rng: &mut StdRng) -> Vec<Point> {
    match plan {
        ZonePlan::Sample(pred) => pick_spawn_points(ctx, budget, pred, rng),
        ZonePlan::WaterEdge { row_stride, reach } => {
            let mut points = water_edge_points(ctx, row_stride, reach);
            if points.len() >= budget {
                points.shuffle(rng);
                points.truncate(budget);
                points
            } else {
                pick_spawn_points(ctx, budget, ZonePredicate::Anywhere, rng)
            }
        }
        ZonePlan::AroundClearings { per_clearing, spread } => {
            let mut points = Vec::new();
            for c in ctx.clearings {
                for _ in 0..per_clearing {
                    points.push(c.center.offset(jitter(rng, spread), jitter(rng, spread)));
                }
            }
            points.truncate(budget);
            points
        }
    }
}

/// Candidate spawn points for every animal in the biome roster.
pub fn derive_animal_zones(
    biome: &BiomeConfig,
    policy: &dyn AnimalZonePolicy,
    ctx: &ZoneContext,
    rng: &mut StdRng,
) -> SpawnRegistry {
    let mut zones = SpawnRegistry::new();
    for (kind, animal) in &biome.animals {
        let plan = resolve_plan(policy, kind, animal, ctx.params);
        let budget = animal.count as usize * 2;
        let points = run_plan(ctx, plan, budget, rng);
        if points.len() < budget {
            log::debug!("animal zone `{kind}`: {}/{budget} candidates", points.len());
        }
        zones.insert(kind.clone(), points);
    }
    zones
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::config::biome::{load_biomes_config, WaterType};
    use crate::config::world::WorldConfig;
    use crate::core::grid::CellMask;

    fn fixture() -> (WorldProfile, Grid, WaterLayout, Vec<Clearing>, Vec<Point>) {
        let profile = WorldProfile::from_config(&WorldConfig::default()).unwrap();
        let grid = Grid::new(&profile);
        let mut cells = CellMask::new(50, 37);
        for row in 0..37 {
            for col in 24..27 {
                cells.insert(col, row);
            }
        }
        let water = WaterLayout { kind: WaterType::River, cells, ponds: Vec::new() };
        let clearings = vec![Clearing {
            left: 10,
            top: 10,
            right: 14,
            bottom: 14,
            center: grid.to_world(12, 12),
        }];
        let trees = vec![Point::new(1000.0, 1000.0), Point::new(2000.0, 1500.0)];
        (profile, grid, water, clearings, trees)
    }

    #[test]
    fn sampled_points_respect_base_constraints() {
        let (profile, grid, water, clearings, trees) = fixture();
        let params = GenerationParams::default();
        let ctx = ZoneContext {
            profile: &profile,
            grid: &grid,
            clearings: &clearings,
            water: &water,
            trees: &trees,
            params: &params,
        };
        let pred = ZonePredicate::NearEdges { margin_x: 800.0, margin_y: 600.0 };
        let mut rng = StdRng::seed_from_u64(12);
        let points = pick_spawn_points(&ctx, 10, pred, &mut rng);

        assert!(!points.is_empty() && points.len() <= 10);
        for (i, p) in points.iter().enumerate() {
            assert!(ctx.admits(&ZonePlan::Sample(pred), *p));
            assert!(p.x >= 100.0 && p.x <= 3100.0 && p.y >= 100.0 && p.y <= 2300.0);
            for q in &points[i + 1..] {
                assert!(p.distance(*q) >= 100.0);
            }
        }
    }

    #[test]
    fn water_edge_points_hug_the_channel() {
        let (profile, grid, water, clearings, trees) = fixture();
        let params = GenerationParams::default();
        let ctx = ZoneContext {
            profile: &profile,
            grid: &grid,
            clearings: &clearings,
            water: &water,
            trees: &trees,
            params: &params,
        };
        let points = water_edge_points(&ctx, 6, 2);
        // rows 0, 6, … 36, three water cells each
        assert_eq!(points.len(), 7 * 3);
        for p in &points {
            let cell = grid.to_cell(p.x, p.y);
            assert_eq!(cell.row % 6, 0);
            assert!([22, 23, 27].contains(&cell.col));
        }

        let mut rng = StdRng::seed_from_u64(1);
        let plan = ZonePlan::WaterEdge { row_stride: 6, reach: 2 };
        let picked = run_plan(&ctx, plan, 4, &mut rng);
        assert_eq!(picked.len(), 4);
        assert!(picked.iter().all(|p| ctx.admits(&plan, *p)));
    }

    #[test]
    fn around_clearings_is_truncated_to_budget() {
        let (profile, grid, water, _, trees) = fixture();
        let params = GenerationParams::default();
        let clearings: Vec<Clearing> = (0..3)
            .map(|i| Clearing {
                left: 5 + i * 10,
                top: 5,
                right: 9 + i * 10,
                bottom: 9,
                center: grid.to_world(7 + i * 10, 7),
            })
            .collect();
        let ctx = ZoneContext {
            profile: &profile,
            grid: &grid,
            clearings: &clearings,
            water: &water,
            trees: &trees,
            params: &params,
        };
        let plan = ZonePlan::AroundClearings { per_clearing: 3, spread: 150.0 };
        let mut rng = StdRng::seed_from_u64(5);
        let points = run_plan(&ctx, plan, 8, &mut rng);
        assert_eq!(points.len(), 8);
        assert!(points.iter().all(|p| ctx.admits(&plan, *p)));
    }

    #[test]
    fn generic_rule_splits_on_shyness() {
        let biomes = load_biomes_config().unwrap();
        let params = GenerationParams::default();
        let bear = &biomes["woodland"].animals["bear"];
        let wolf = &biomes["woodland"].animals["wolf"];
        assert_eq!(generic_plan(bear, &params), ZonePlan::Sample(ZonePredicate::Anywhere));
        assert!(matches!(
            generic_plan(wolf, &params),
            ZonePlan::Sample(ZonePredicate::NearEdges { .. })
        ));
        assert_eq!(resolve_plan(&GenericZones, "bear", bear, &params), generic_plan(bear, &params));
    }
}
