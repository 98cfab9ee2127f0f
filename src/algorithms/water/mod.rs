//! # 水体生成
//!
//! 两种可互换的策略：
//! - [`river::RiverPath`]：贯穿整张地图的蜿蜒河道（需要架桥）
//! - [`oasis::OasisPools`]：2~3 个互不靠近的椭圆水塘
//!
//! 两者都把水格标记为已占用，并输出统一的 [`WaterLayout`]。

pub mod oasis;
pub mod river;

use rand::rngs::StdRng;
use serde::Serialize;

use crate::algorithms::params::GenerationParams;
use crate::config::biome::WaterType;
use crate::core::grid::{Cell, CellMask, Grid};

/// 单个椭圆水塘（格子坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pond {
    pub center: Cell,
    pub rx: i32,
    pub ry: i32,
}

impl Pond {
    /// Upper bound on the number of cells this pond can cover.
    pub fn max_cells(&self) -> usize {
        ((2 * self.rx + 1) * (2 * self.ry + 1)) as usize
    }
}

/// Finished water feature, independent of how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct WaterLayout {
    pub kind: WaterType,
    pub cells: CellMask,
    /// 仅绿洲策略非空
    pub ponds: Vec<Pond>,
}

impl WaterLayout {
    pub fn contains(&self, col: i32, row: i32) -> bool {
        self.cells.contains(col, row)
    }

    /// Cells touching water (8-neighbourhood) that are not water themselves.
    pub fn bank(&self) -> CellMask {
        self.cells.ring()
    }
}

/// A way of laying water onto the grid.
pub trait WaterStrategy: Send + Sync {
    fn kind(&self) -> WaterType;

    /// 生成水格，并把它们标记为已占用
    fn synthesize(&self, grid: &mut Grid, params: &GenerationParams, rng: &mut StdRng) -> WaterLayout;

    /// Whether the result cuts the map and needs a crossing carved through it.
    fn needs_crossing(&self) -> bool {
        false
    }
}
