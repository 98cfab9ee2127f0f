//! 林地动物的专属刷新规则

use super::{AnimalZonePolicy, ZonePlan, ZonePredicate};

// 熊：深林，远离所有空地
const BEAR_CLEARING_DIST: f64 = 400.0;
// 狼：林缘
const WOLF_MARGIN_X: f64 = 600.0;
const WOLF_MARGIN_Y: f64 = 400.0;
// 獾：密林
const BADGER_RADIUS: f64 = 200.0;
const BADGER_MIN_TREES: usize = 3;
// 水豚：河边，每 6 行取一次
const CAPYBARA_ROW_STRIDE: u32 = 6;
// 鹿：空地周围
const DEER_PER_CLEARING: u32 = 3;
const DEER_SPREAD: f64 = 150.0;
// 狐狸
const FOX_MARGIN_X: f64 = 800.0;
const FOX_MARGIN_Y: f64 = 600.0;

const WATER_REACH: i32 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct WoodlandZones;

impl AnimalZonePolicy for WoodlandZones {
    fn override_for(&self, kind: &str) -> Option<ZonePlan> {
        let plan = match kind {
            "bear" => ZonePlan::Sample(ZonePredicate::FarFromClearings {
                min_dist: BEAR_CLEARING_DIST,
            }),
            "wolf" => ZonePlan::Sample(ZonePredicate::NearEdges {
                margin_x: WOLF_MARGIN_X,
                margin_y: WOLF_MARGIN_Y,
            }),
            "badger" => ZonePlan::Sample(ZonePredicate::DenseTrees {
                radius: BADGER_RADIUS,
                min_trees: BADGER_MIN_TREES,
            }),
            "capybara" => ZonePlan::WaterEdge {
                row_stride: CAPYBARA_ROW_STRIDE,
                reach: WATER_REACH,
            },
            "deer" => ZonePlan::AroundClearings {
                per_clearing: DEER_PER_CLEARING,
                spread: DEER_SPREAD,
            },
            "rabbit" | "bird" => ZonePlan::Sample(ZonePredicate::Anywhere),
            "fox" => ZonePlan::Sample(ZonePredicate::NearEdges {
                margin_x: FOX_MARGIN_X,
                margin_y: FOX_MARGIN_Y,
            }),
            _ => return None,
        };
        Some(plan)
    }
}
