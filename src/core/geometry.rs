//! # 几何工具
//!
//! 世界坐标点 [`Point`]，以及作用在格子坐标上的 [`Shape`]（矩形 / 椭圆）。
//! 形状只负责几何判定，写入哪张 [`CellMask`] 由调用方决定。

use serde::{Deserialize, Serialize};

use super::grid::CellMask;

// ═══════════════════════════════════════════════════════════
// 世界坐标
// ═══════════════════════════════════════════════════════════

/// A position in continuous world space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// True when any of `points` lies strictly closer than `min_dist` to `p`.
pub fn any_within(points: &[Point], p: Point, min_dist: f64) -> bool {
    let limit = min_dist * min_dist;
    points.iter().any(|q| q.distance_sq(p) < limit)
}

// ═══════════════════════════════════════════════════════════
// 核心 Trait
// ═══════════════════════════════════════════════════════════

/// 轴对齐包围盒（格子坐标，半开区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }
}

/// A region of lattice cells.
pub trait Shape {
    /// 判定格子 (col, row) 是否在形状内部
    fn contains(&self, col: i32, row: i32) -> bool;

    fn bounding_box(&self) -> BoundingBox;

    /// Every contained cell, row-major within the bounding box.
    fn cells(&self) -> Vec<(i32, i32)> {
        let bb = self.bounding_box();
        let mut out = Vec::new();
        for row in bb.y_min..bb.y_max {
            for col in bb.x_min..bb.x_max {
                if self.contains(col, row) {
                    out.push((col, row));
                }
            }
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════
// 基础形状
// ═══════════════════════════════════════════════════════════

/// 矩形（轴对齐，半开区间 `[x0, x1) × [y0, y1)`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// 从包含式边界 (left..=right, top..=bottom) 创建
    pub fn inclusive(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right + 1, bottom + 1)
    }
}

impl Shape for Rect {
    fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.x0 && col < self.x1 && row >= self.y0 && row < self.y1
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x0, self.y0, self.x1, self.y1)
    }
}

/// 椭圆：`(dx/rx)² + (dy/ry)² ≤ 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self { cx, cy, rx: rx.abs(), ry: ry.abs() }
    }
}

impl Shape for Ellipse {
    fn contains(&self, col: i32, row: i32) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let dx = (col as f64 - self.cx) / self.rx;
        let dy = (row as f64 - self.cy) / self.ry;
        dx * dx + dy * dy <= 1.0
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            (self.cx - self.rx).floor() as i32,
            (self.cy - self.ry).floor() as i32,
            (self.cx + self.rx).floor() as i32 + 1,
            (self.cy + self.ry).floor() as i32 + 1,
        )
    }
}

// ═══════════════════════════════════════════════════════════
// 填充
// ═══════════════════════════════════════════════════════════

/// Inserts every in-bounds cell of `shape` into `mask`, returning how many were new.
pub fn fill_mask(shape: &dyn Shape, mask: &mut CellMask) -> usize {
    shape
        .cells()
        .into_iter()
        .filter(|&(col, row)| mask.insert(col, row))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipse_stays_inside_its_box() {
        let ell = Ellipse::new(10.0, 10.0, 3.0, 2.0);
        let cells = ell.cells();
        assert!(cells.len() <= 7 * 5);
        assert!(cells.contains(&(10, 10)));
        assert!(cells.contains(&(13, 10)));
        assert!(cells.contains(&(10, 12)));
        assert!(!cells.contains(&(13, 12)));
    }

    #[test]
    fn inclusive_rect_covers_both_ends() {
        let rect = Rect::inclusive(2, 3, 6, 7);
        assert_eq!(rect.cells().len(), 25);
        assert!(rect.contains(6, 7));
        assert!(!rect.contains(7, 7));
    }

    #[test]
    fn any_within_is_strict() {
        let pts = [Point::new(0.0, 0.0)];
        assert!(any_within(&pts, Point::new(79.0, 0.0), 80.0));
        assert!(!any_within(&pts, Point::new(80.0, 0.0), 80.0));
    }
}
