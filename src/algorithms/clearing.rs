//! 空地：玩家建造用的矩形区域

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::algorithms::params::GenerationParams;
use crate::core::geometry::{Point, Rect, Shape};
use crate::core::grid::Grid;
use crate::core::GenerationError;

/// Axis-aligned rectangle of cells, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Clearing {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    /// 世界坐标中心
    pub center: Point,
}

impl Clearing {
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.left && col <= self.right && row >= self.top && row <= self.bottom
    }

    pub fn rect(&self) -> Rect {
        Rect::inclusive(self.left, self.top, self.right, self.bottom)
    }
}

/// True when (col, row) lies inside any clearing.
pub fn in_any(clearings: &[Clearing], col: i32, row: i32) -> bool {
    clearings.iter().any(|c| c.contains(col, row))
}

/// 清空区加一圈边框后是否全部空闲
fn is_free(grid: &Grid, left: i32, top: i32, w: i32, h: i32, border: i32) -> bool {
    let grown = Rect::new(left - border, top - border, left + w + border, top + h + border);
    grown
        .cells()
        .into_iter()
        .all(|(col, row)| !grid.is_occupied(col, row))
}

/// 偏移序列：0, -1, +1, -2, +2 …
fn shift_sequence(max_shift: i32) -> impl Iterator<Item = i32> {
    std::iter::once(0).chain((1..=max_shift).flat_map(|s| [-s, s]))
}

/// Places one clearing per anchor, marking its cells occupied.
///
/// Each rectangle starts at its anchor and slides sideways until it and a
/// one-cell border are clear of water and earlier clearings. The first
/// clearing is the default start location.
pub fn place_clearings(
    grid: &mut Grid,
    params: &GenerationParams,
    rng: &mut StdRng,
) -> Result<Vec<Clearing>, GenerationError> {
    let cols = grid.cols() as i32;
    let rows = grid.rows() as i32;
    let edge = params.clearing_border as i32;
    let size_max = params.clearing_size_max.max(params.clearing_size_min);
    let tile = grid.tile_size();

    let mut clearings = Vec::with_capacity(params.clearing_anchors.len());

    for (index, anchor) in params.clearing_anchors.iter().enumerate() {
        let w = rng.gen_range(params.clearing_size_min..=size_max) as i32;
        let h = rng.gen_range(params.clearing_size_min..=size_max) as i32;
        let prefer_col = (cols as f64 * anchor[0]).floor() as i32;
        let prefer_row = (rows as f64 * anchor[1]).floor() as i32;

        let max_left = (cols - w - edge).max(edge);
        let top = (prefer_row - h / 2).clamp(edge, (rows - h - edge).max(edge));
        let base_left = (prefer_col - w / 2).clamp(edge, max_left);

        let left = shift_sequence(params.clearing_max_shift as i32)
            .map(|s| base_left + s)
            .filter(|&l| l >= edge && l <= max_left)
            .find(|&l| is_free(grid, l, top, w, h, edge))
            .ok_or(GenerationError::ClearingOverlap {
                index,
                col: prefer_col,
                row: prefer_row,
            })?;

        let right = left + w - 1;
        let bottom = top + h - 1;
        let center = Point::new(
            (left + right) as f64 / 2.0 * tile + tile / 2.0,
            (top + bottom) as f64 / 2.0 * tile + tile / 2.0,
        );
        let clearing = Clearing { left, top, right, bottom, center };

        for (col, row) in clearing.rect().cells() {
            grid.mark_occupied(col, row);
        }
        if left != base_left {
            log::debug!("clearing #{index}: shifted {} cells to avoid water", left - base_left);
        }
        clearings.push(clearing);
    }

    Ok(clearings)
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
    fn open_map_uses_anchor_positions() {
        let mut g = grid();
        let mut rng = StdRng::seed_from_u64(7);
        let clearings = place_clearings(&mut g, &GenerationParams::default(), &mut rng).unwrap();

        assert_eq!(clearings.len(), 3);
        for c in &clearings {
            assert!((5..=6).contains(&c.width()) && (5..=6).contains(&c.height()));
            assert!(c.left >= 1 && c.top >= 1 && c.right <= 48 && c.bottom <= 35);
            assert!(g.is_occupied(c.left, c.top) && g.is_occupied(c.right, c.bottom));
        }
        // anchor (0.3, 0.5) → col 15, row 18
        let first = clearings[0];
        assert!(first.contains(15, 18));
        assert_eq!(first.center.x, (first.left + first.right) as f64 / 2.0 * 64.0 + 32.0);
    }

    #[test]
    fn slides_away_from_occupied_columns() {
        let mut g = grid();
        for row in 0..37 {
            for col in 13..=17 {
                g.mark_occupied(col, row);
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        let clearings = place_clearings(&mut g, &GenerationParams::default(), &mut rng).unwrap();
        let first = clearings[0];
        assert!(first.right < 12 || first.left > 18, "{first:?}");
    }

    #[test]
    fn fully_blocked_map_reports_overlap() {
        let mut g = grid();
        for row in 0..37 {
            for col in 0..50 {
                g.mark_occupied(col, row);
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        let err = place_clearings(&mut g, &GenerationParams::default(), &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::ClearingOverlap { index: 0, .. }));
    }

    #[test]
    fn clearings_never_touch_each_other() {
        for seed in 0..16 {
            let mut g = grid();
            let mut rng = StdRng::seed_from_u64(seed);
            let clearings = place_clearings(&mut g, &GenerationParams::default(), &mut rng).unwrap();
            for (i, a) in clearings.iter().enumerate() {
                for b in &clearings[i + 1..] {
                    let overlap = a.left <= b.right && b.left <= a.right
                        && a.top <= b.bottom && b.top <= a.bottom;
                    assert!(!overlap);
                }
            }
        }
    }
}
