use serde::Serialize;

use super::geometry::Point;

/// 碰撞体来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Water,
    Tree,
    Rock,
}

/// Axis-aligned blocking collider, centered on `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, center: Point, width: f64, height: f64) -> Self {
        Self { kind, center, width, height }
    }

    /// 边界闭区间判定
    pub fn contains(&self, p: Point) -> bool {
        (p.x - self.center.x).abs() <= self.width / 2.0
            && (p.y - self.center.y).abs() <= self.height / 2.0
    }
}
