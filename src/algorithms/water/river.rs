//! 河流：逐行推进的正弦河道

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::Rng;

use crate::algorithms::params::GenerationParams;
use crate::config::biome::WaterType;
use crate::core::grid::Grid;

use super::{WaterLayout, WaterStrategy};

/// Single meandering channel from row 0 to the last row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiverPath;

/// 河道形状参数（全部在格子单位下）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiverShape {
    pub base: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

/// `[min, max)` 上均匀取值；区间为空（`max <= min`）时固定取 `min`
fn uniform(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max > min { rng.gen_range(min..max) } else { min }
}

impl RiverShape {
    pub fn roll(cols: u32, params: &GenerationParams, rng: &mut StdRng) -> Self {
        let cols = cols as f64;
        let base = cols * params.river_base_min + rng.gen_range(0.0..1.0) * cols * params.river_base_span;
        Self {
            base,
            amplitude: uniform(rng, params.river_amplitude_min, params.river_amplitude_max),
            frequency: uniform(rng, params.river_frequency_min, params.river_frequency_max),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    /// 第 `row` 行的河道中心列，夹在 `[inset, cols - 1 - inset]`
    pub fn center_at(&self, row: u32, cols: u32, inset: u32) -> i32 {
        let lo = inset as f64;
        let hi = (cols as f64 - 1.0 - inset as f64).max(lo);
        let raw = self.base + self.amplitude * (row as f64 * self.frequency + self.phase).sin();
        raw.clamp(lo, hi).round() as i32
    }
}

impl WaterStrategy for RiverPath {
    fn kind(&self) -> WaterType {
        WaterType::River
    }

    fn synthesize(&self, grid: &mut Grid, params: &GenerationParams, rng: &mut StdRng) -> WaterLayout {
        let shape = RiverShape::roll(grid.cols(), params, rng);
        let half = (params.river_width / 2) as i32;
        let mut cells = grid.empty_mask();

        for row in 0..grid.rows() {
            let center = shape.center_at(row, grid.cols(), params.river_edge_inset);
            for dc in -half..=half {
                let col = center + dc;
                if cells.insert(col, row as i32) {
                    grid.mark_occupied(col, row as i32);
                }
            }
        }

        log::debug!(
            "river: base={:.1} amplitude={:.2} frequency={:.3} cells={}",
            shape.base,
            shape.amplitude,
            shape.frequency,
            cells.len()
        );

        WaterLayout {
            kind: WaterType::River,
            cells,
            ponds: Vec::new(),
        }
    }

    fn needs_crossing(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::config::world::WorldConfig;
    use crate::core::world::WorldProfile;

    fn grid() -> Grid {
        Grid::new(&WorldProfile::from_config(&WorldConfig::default()).unwrap())
    }

    #[test]
    fn river_spans_every_row_inside_the_inset() {
        let params = GenerationParams::default();
        for seed in 0..32 {
            let mut g = grid();
            let mut rng = StdRng::seed_from_u64(seed);
            let water = RiverPath.synthesize(&mut g, &params, &mut rng);

            for row in 0..g.rows() as i32 {
                let cols: Vec<i32> = (0..g.cols() as i32)
                    .filter(|&c| water.contains(c, row))
                    .collect();
                assert_eq!(cols.len(), 3, "seed {seed} row {row}");
                assert!(cols[0] >= 2 && *cols.last().unwrap() <= g.cols() as i32 - 3);
            }
            assert!(water.cells.iter().all(|c| g.is_occupied(c.col, c.row)));
        }
    }

    #[test]
    fn fixed_amplitude_and_frequency_are_accepted() {
        let params = GenerationParams::from_json(
            r#"{ "river_amplitude_min": 5.0, "river_amplitude_max": 5.0,
                 "river_frequency_min": 0.08, "river_frequency_max": 0.02 }"#,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let shape = RiverShape::roll(50, &params, &mut rng);
        assert_eq!(shape.amplitude, 5.0);
        assert_eq!(shape.frequency, 0.08);

        let mut g = grid();
        let water = RiverPath.synthesize(&mut g, &params, &mut rng);
        for row in 0..g.rows() as i32 {
            assert!(water.cells.row_has_any(row));
        }
    }

    #[test]
    fn center_is_clamped() {
        let shape = RiverShape { base: 100.0, amplitude: 0.0, frequency: 0.0, phase: 0.0 };
        assert_eq!(shape.center_at(0, 50, 3), 46);
        let shape = RiverShape { base: -10.0, ..shape };
        assert_eq!(shape.center_at(0, 50, 3), 3);
    }
}
