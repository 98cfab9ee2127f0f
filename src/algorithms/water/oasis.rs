//! 绿洲：若干个互相远离的椭圆水塘

use rand::rngs::StdRng;
use rand::Rng;

use crate::algorithms::params::GenerationParams;
use crate::config::biome::WaterType;
use crate::core::geometry::{self, Ellipse, Shape};
use crate::core::grid::{Cell, Grid};

use super::{Pond, WaterLayout, WaterStrategy};

/// Two or three elliptical ponds with a minimum center spacing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OasisPools;

impl OasisPools {
    /// 在内缩区域里随机选池塘中心，距离过近的候选直接丢弃
    fn pick_centers(grid: &Grid, params: &GenerationParams, rng: &mut StdRng) -> Vec<Cell> {
        let wanted = rng.gen_range(params.pool_count_min..=params.pool_count_max.max(params.pool_count_min));
        let inset = params.pool_edge_inset as i32;
        let col_hi = (grid.cols() as i32 - inset).max(inset + 1);
        let row_hi = (grid.rows() as i32 - inset).max(inset + 1);
        let spacing_sq = params.pool_min_spacing * params.pool_min_spacing;

        let mut centers: Vec<Cell> = Vec::new();
        for _ in 0..wanted * params.pool_attempts_per_pool {
            if centers.len() >= wanted as usize {
                break;
            }
            let cand = Cell::new(rng.gen_range(inset..col_hi), rng.gen_range(inset..row_hi));
            let too_close = centers.iter().any(|c| {
                let dc = (c.col - cand.col) as f64;
                let dr = (c.row - cand.row) as f64;
                dc * dc + dr * dr < spacing_sq
            });
            if !too_close {
                centers.push(cand);
            }
        }

        if centers.len() < wanted as usize {
            log::warn!("oasis: placed {}/{} ponds", centers.len(), wanted);
        }
        centers
    }
}

impl WaterStrategy for OasisPools {
    fn kind(&self) -> WaterType {
        WaterType::Oasis
    }

    fn synthesize(&self, grid: &mut Grid, params: &GenerationParams, rng: &mut StdRng) -> WaterLayout {
        let centers = Self::pick_centers(grid, params, rng);
        let radius_max = params.pool_radius_max.max(params.pool_radius_min);
        let mut cells = grid.empty_mask();
        let mut ponds = Vec::with_capacity(centers.len());

        for center in centers {
            let rx = rng.gen_range(params.pool_radius_min..=radius_max) as i32;
            let ry = rng.gen_range(params.pool_radius_min..=radius_max) as i32;
            let shape = Ellipse::new(center.col as f64, center.row as f64, rx as f64, ry as f64);
            geometry::fill_mask(&shape, &mut cells);
            for (col, row) in shape.cells() {
                grid.mark_occupied(col, row);
            }
            ponds.push(Pond { center, rx, ry });
        }

        log::debug!("oasis: ponds={} cells={}", ponds.len(), cells.len());

        WaterLayout {
            kind: WaterType::Oasis,
            cells,
            ponds,
        }
    }
}
