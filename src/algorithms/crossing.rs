//! 桥：在河道中段挖出一条 3 行宽的可通行带

use crate::algorithms::params::GenerationParams;
use crate::core::grid::CellMask;
use crate::core::GenerationError;

use super::water::WaterLayout;

/// Row search window `[start, end]` within the middle of the map.
pub fn crossing_window(rows: u32, params: &GenerationParams) -> (i32, i32) {
    let start = (rows as f64 * params.crossing_window_start).floor() as i32;
    let end = (rows as f64 * params.crossing_window_end).floor() as i32;
    (start, end.max(start))
}

/// 从中点向两侧交替搜索：+0, -1, +1, -2, +2 …
pub fn find_crossing_row(water: &WaterLayout, rows: u32, params: &GenerationParams) -> Option<i32> {
    let (start, end) = crossing_window(rows, params);
    let mid = (start + end) / 2;
    let span = (end - start + 1) * 2;

    (0..span)
        .map(|offset| {
            if offset % 2 == 0 {
                mid + offset / 2
            } else {
                mid - (offset + 1) / 2
            }
        })
        .filter(|&row| row >= start && row <= end)
        .find(|&row| water.cells.row_has_any(row))
}

/// Carves the crossing band. Every returned cell is also a water cell.
///
/// A river with no bridgeable row would leave the map cut in two, so that
/// case is reported instead of returning an empty band.
pub fn place_crossing(
    water: &WaterLayout,
    rows: u32,
    cols: u32,
    params: &GenerationParams,
) -> Result<CellMask, GenerationError> {
    let Some(row) = find_crossing_row(water, rows, params) else {
        let (start, end) = crossing_window(rows, params);
        return Err(GenerationError::Unreachable {
            reason: format!("no water row to bridge between rows {start} and {end}"),
        });
    };

    let half = params.crossing_half_width as i32;
    let mut band = CellMask::new(cols, rows);
    for r in row - half..=row + half {
        for col in 0..cols as i32 {
            if water.contains(col, r) {
                band.insert(col, r);
            }
        }
    }

    log::debug!("crossing: row={row} cells={}", band.len());
    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::biome::WaterType;

    fn layout(cols: u32, rows: u32, cells: &[(i32, i32)]) -> WaterLayout {
        let mut mask = CellMask::new(cols, rows);
        for &(c, r) in cells {
            mask.insert(c, r);
        }
        WaterLayout { kind: WaterType::River, cells: mask, ponds: Vec::new() }
    }

    #[test]
    fn prefers_the_middle_row() {
        let cells: Vec<(i32, i32)> = (0..37).flat_map(|r| [(20, r), (21, r), (22, r)]).collect();
        let water = layout(50, 37, &cells);
        let params = GenerationParams::default();
        // window = [11, 25], mid = 18
        assert_eq!(find_crossing_row(&water, 37, &params), Some(18));

        let band = place_crossing(&water, 37, 50, &params).unwrap();
        assert_eq!(band.len(), 9);
        assert!(band.is_subset(&water.cells));
        assert!(band.contains(21, 17) && band.contains(21, 19));
    }

    #[test]
    fn searches_outward_alternately() {
        let water = layout(50, 37, &[(5, 17), (5, 20)]);
        let params = GenerationParams::default();
        assert_eq!(find_crossing_row(&water, 37, &params), Some(17));

        let water = layout(50, 37, &[(5, 11)]);
        assert_eq!(find_crossing_row(&water, 37, &params), Some(11));
    }

    #[test]
    fn dry_window_is_unreachable() {
        let water = layout(50, 37, &[(5, 2), (5, 33)]);
        let params = GenerationParams::default();
        assert!(matches!(
            place_crossing(&water, 37, 50, &params),
            Err(GenerationError::Unreachable { .. })
        ));
    }
}
