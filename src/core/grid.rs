use serde::Serialize;

use super::geometry::Point;
use super::world::WorldProfile;

// ── Cell ────────────────────────────────────────────────────

/// 格子坐标 (col, row)。用有符号整数，方便做邻居偏移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// 打包后的格子键：`row * cols + col`
pub type CellKey = u32;

/// 8 邻域偏移，dc 外层、dr 内层
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// ── Grid ────────────────────────────────────────────────────

/// The lattice laid over the continuous world, plus per-cell occupancy.
///
/// Occupancy only lives for one generation run; later passes read it to keep
/// clear of water and clearings.
#[derive(Debug, Clone)]
pub struct Grid {
    cols: u32,
    rows: u32,
    tile_size: f64,
    /// 行优先存储: occupied[row * cols + col]
    occupied: Vec<bool>,
}

impl Grid {
    pub fn new(profile: &WorldProfile) -> Self {
        let len = (profile.cols as usize) * (profile.rows as usize);
        Self {
            cols: profile.cols,
            rows: profile.rows,
            tile_size: profile.tile_size,
            occupied: vec![false; len],
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as u32) < self.cols && (row as u32) < self.rows
    }

    pub fn key(&self, col: i32, row: i32) -> Option<CellKey> {
        if self.in_bounds(col, row) {
            Some(row as u32 * self.cols + col as u32)
        } else {
            None
        }
    }

    pub fn cell_of(&self, key: CellKey) -> Cell {
        Cell::new((key % self.cols) as i32, (key / self.cols) as i32)
    }

    /// World position → the cell containing it. May be out of bounds.
    pub fn to_cell(&self, x: f64, y: f64) -> Cell {
        Cell::new(
            (x / self.tile_size).floor() as i32,
            (y / self.tile_size).floor() as i32,
        )
    }

    /// Cell → its center in world space.
    pub fn to_world(&self, col: i32, row: i32) -> Point {
        Point::new(
            col as f64 * self.tile_size + self.tile_size / 2.0,
            row as f64 * self.tile_size + self.tile_size / 2.0,
        )
    }

    /// 越界格子静默忽略
    pub fn mark_occupied(&mut self, col: i32, row: i32) {
        if let Some(key) = self.key(col, row) {
            self.occupied[key as usize] = true;
        }
    }

    pub fn is_occupied(&self, col: i32, row: i32) -> bool {
        self.key(col, row)
            .map(|key| self.occupied[key as usize])
            .unwrap_or(false)
    }

    pub fn empty_mask(&self) -> CellMask {
        CellMask::new(self.cols, self.rows)
    }
}

// ── CellMask ────────────────────────────────────────────────

/// Dense cell set over the lattice. Iteration is always raster order
/// (row-major), so anything derived from it is stable for a given seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    cols: u32,
    rows: u32,
    data: Vec<bool>,
    len: usize,
}

impl CellMask {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            data: vec![false; (cols as usize) * (rows as usize)],
            len: 0,
        }
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col >= 0 && row >= 0 && (col as u32) < self.cols && (row as u32) < self.rows {
            Some(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        self.index(col, row).map(|i| self.data[i]).unwrap_or(false)
    }

    /// 返回 true 表示新插入；越界格子忽略
    pub fn insert(&mut self, col: i32, row: i32) -> bool {
        match self.index(col, row) {
            Some(i) if !self.data[i] => {
                self.data[i] = true;
                self.len += 1;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.cols as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(move |(i, _)| Cell::new((i % cols) as i32, (i / cols) as i32))
    }

    pub fn row_has_any(&self, row: i32) -> bool {
        (0..self.cols as i32).any(|col| self.contains(col, row))
    }

    pub fn is_subset(&self, other: &CellMask) -> bool {
        self.iter().all(|c| other.contains(c.col, c.row))
    }

    /// 8 邻域膨胀后去掉自身：紧贴水面的岸边格子
    pub fn ring(&self) -> CellMask {
        let mut out = CellMask::new(self.cols, self.rows);
        for cell in self.iter() {
            for (dc, dr) in NEIGHBORS_8 {
                let (c, r) = (cell.col + dc, cell.row + dr);
                if !self.contains(c, r) {
                    out.insert(c, r);
                }
            }
        }
        out
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.iter().collect()
    }
}

impl Serialize for CellMask {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::world::WorldConfig;

    fn grid() -> Grid {
        Grid::new(&WorldProfile::from_config(&WorldConfig::default()).unwrap())
    }

    #[test]
    fn world_and_cell_round_trip() {
        let g = grid();
        let p = g.to_world(7, 3);
        assert_eq!(p, Point::new(7.0 * 64.0 + 32.0, 3.0 * 64.0 + 32.0));
        assert_eq!(g.to_cell(p.x, p.y), Cell::new(7, 3));
        assert_eq!(g.to_cell(63.9, 0.0), Cell::new(0, 0));
        assert_eq!(g.to_cell(64.0, 0.0), Cell::new(1, 0));
    }

    #[test]
    fn packed_key_matches_cell() {
        let g = grid();
        let key = g.key(12, 5).unwrap();
        assert_eq!(key, 5 * 50 + 12);
        assert_eq!(g.cell_of(key), Cell::new(12, 5));
        assert_eq!(g.key(50, 0), None);
        assert_eq!(g.key(-1, 0), None);
    }

    #[test]
    fn occupancy_ignores_out_of_range() {
        let mut g = grid();
        g.mark_occupied(3, 4);
        g.mark_occupied(-5, 100);
        assert!(g.is_occupied(3, 4));
        assert!(!g.is_occupied(4, 3));
        assert!(!g.is_occupied(-5, 100));
    }

    #[test]
    fn ring_surrounds_without_overlap() {
        let mut mask = CellMask::new(10, 10);
        mask.insert(5, 5);
        mask.insert(5, 6);
        let ring = mask.ring();
        assert_eq!(ring.len(), 3 * 4 - 2);
        assert!(ring.iter().all(|c| !mask.contains(c.col, c.row)));

        let mut corner = CellMask::new(10, 10);
        corner.insert(0, 0);
        assert_eq!(corner.ring().len(), 3);
    }

    #[test]
    fn mask_iterates_in_raster_order() {
        let mut mask = CellMask::new(4, 4);
        mask.insert(3, 0);
        mask.insert(0, 2);
        mask.insert(1, 0);
        assert!(!mask.insert(1, 0));
        assert_eq!(
            mask.to_vec(),
            vec![Cell::new(1, 0), Cell::new(3, 0), Cell::new(0, 2)]
        );
    }
}
