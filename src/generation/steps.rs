//! 具体生成步骤：每个步骤把一个算法接到共享状态上

use crate::algorithms::animal_zones::{derive_animal_zones, ZoneContext};
use crate::algorithms::clearing::place_clearings;
use crate::algorithms::crossing::place_crossing;
use crate::algorithms::decoration::place_decorations;
use crate::algorithms::spawn_points::{derive_item_spawns, SpawnInputs};
use crate::algorithms::terrain::paint;
use crate::core::GenerationError;

use super::step::{require, GenerationContext, GenerationStep};

// ── 1. 水体 ──────────────────────────────────────────────────

pub struct WaterStep;

impl GenerationStep for WaterStep {
    fn id(&self) -> &'static str {
        "water"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let strategy = ctx.biome.water_strategy();
        let water = strategy.synthesize(&mut ctx.state.grid, ctx.params, ctx.rng);
        ctx.state.water = Some(water);
        Ok(())
    }
}

// ── 2. 空地 ──────────────────────────────────────────────────

pub struct ClearingStep;

impl GenerationStep for ClearingStep {
    fn id(&self) -> &'static str {
        "clearings"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        require(&ctx.state.water, self.id(), "water")?;
        let clearings = place_clearings(&mut ctx.state.grid, ctx.params, ctx.rng)?;
        ctx.state.clearings = Some(clearings);
        Ok(())
    }
}

// ── 3. 桥 ────────────────────────────────────────────────────

pub struct CrossingStep;

impl GenerationStep for CrossingStep {
    fn id(&self) -> &'static str {
        "crossing"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let water = require(&ctx.state.water, self.id(), "water")?;
        let grid = &ctx.state.grid;

        let crossing = if ctx.biome.water_strategy().needs_crossing() {
            if let Some(row) = (0..grid.rows() as i32).find(|&r| !water.cells.row_has_any(r)) {
                return Err(GenerationError::Unreachable {
                    reason: format!("river is broken at row {row}"),
                });
            }
            place_crossing(water, grid.rows(), grid.cols(), ctx.params)?
        } else {
            grid.empty_mask()
        };

        ctx.state.crossing = Some(crossing);
        Ok(())
    }
}

// ── 4. 地形 ──────────────────────────────────────────────────

pub struct TerrainStep;

impl GenerationStep for TerrainStep {
    fn id(&self) -> &'static str {
        "terrain"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let state = &*ctx.state;
        let water = require(&state.water, self.id(), "water")?;
        let crossing = require(&state.crossing, self.id(), "crossing")?;
        let clearings = require(&state.clearings, self.id(), "clearings")?;

        let layer = paint(
            &state.grid,
            &ctx.biome.config.terrain,
            water,
            crossing,
            clearings,
            ctx.rng,
        );
        ctx.state.terrain = Some(layer);
        Ok(())
    }
}

// ── 5. 装饰 ──────────────────────────────────────────────────

pub struct DecorationStep;

impl GenerationStep for DecorationStep {
    fn id(&self) -> &'static str {
        "decorations"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let state = &*ctx.state;
        let water = require(&state.water, self.id(), "water")?;
        let clearings = require(&state.clearings, self.id(), "clearings")?;

        let set = place_decorations(
            &state.grid,
            ctx.profile,
            &ctx.biome.config.decorations,
            clearings,
            water,
            ctx.params,
            ctx.rng,
        );
        ctx.state.decorations = Some(set);
        Ok(())
    }
}

// ── 6. 物品刷新点 ────────────────────────────────────────────

pub struct ItemSpawnStep;

impl GenerationStep for ItemSpawnStep {
    fn id(&self) -> &'static str {
        "item_spawns"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let state = &*ctx.state;
        let inputs = SpawnInputs {
            profile: ctx.profile,
            grid: &state.grid,
            water: require(&state.water, self.id(), "water")?,
            clearings: require(&state.clearings, self.id(), "clearings")?,
            decorations: require(&state.decorations, self.id(), "decorations")?,
        };
        let registry = derive_item_spawns(&ctx.biome.config, &inputs, ctx.params, ctx.rng);
        ctx.state.item_spawns = Some(registry);
        Ok(())
    }
}

// ── 7. 动物刷新区 ────────────────────────────────────────────

pub struct AnimalZoneStep;

impl GenerationStep for AnimalZoneStep {
    fn id(&self) -> &'static str {
        "animal_zones"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let state = &*ctx.state;
        let zone_ctx = ZoneContext {
            profile: ctx.profile,
            grid: &state.grid,
            clearings: require(&state.clearings, self.id(), "clearings")?,
            water: require(&state.water, self.id(), "water")?,
            trees: &require(&state.decorations, self.id(), "decorations")?.trees,
            params: ctx.params,
        };
        let zones = derive_animal_zones(
            &ctx.biome.config,
            ctx.biome.animal_policy(),
            &zone_ctx,
            ctx.rng,
        );
        ctx.state.animal_zones = Some(zones);
        Ok(())
    }
}
