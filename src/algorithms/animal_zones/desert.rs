//! 沙漠动物的专属刷新规则

use super::{AnimalZonePolicy, ZonePlan, ZonePredicate};

const CAMEL_EDGE_MARGIN: f64 = 300.0;
const SNAKE_COLUMN_MARGIN: f64 = 200.0;
const SCORPION_MARGIN_X: f64 = 600.0;
const SCORPION_MARGIN_SOUTH: f64 = 500.0;
const VULTURE_CLEARING_DIST: f64 = 350.0;
const FENNEC_MARGIN_X: f64 = 800.0;
const FENNEC_MARGIN_Y: f64 = 600.0;

const WATER_REACH: i32 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct DesertZones;

impl AnimalZonePolicy for DesertZones {
    fn override_for(&self, kind: &str) -> Option<ZonePlan> {
        let plan = match kind {
            // 开阔沙地，离边缘远一点
            "camel" => ZonePlan::Sample(ZonePredicate::Interior {
                margin: CAMEL_EDGE_MARGIN,
            }),
            // 绿洲边，每一行都取
            "crocodile" => ZonePlan::WaterEdge {
                row_stride: 1,
                reach: WATER_REACH,
            },
            "snake" => ZonePlan::Sample(ZonePredicate::WithinColumns {
                margin: SNAKE_COLUMN_MARGIN,
            }),
            "scorpion" => ZonePlan::Sample(ZonePredicate::SidesOrSouth {
                margin_x: SCORPION_MARGIN_X,
                margin_south: SCORPION_MARGIN_SOUTH,
            }),
            "lizard" | "roadrunner" => ZonePlan::Sample(ZonePredicate::Anywhere),
            "vulture" => ZonePlan::Sample(ZonePredicate::FarFromClearings {
                min_dist: VULTURE_CLEARING_DIST,
            }),
            "fennec" => ZonePlan::Sample(ZonePredicate::NearEdges {
                margin_x: FENNEC_MARGIN_X,
                margin_y: FENNEC_MARGIN_Y,
            }),
            _ => return None,
        };
        Some(plan)
    }
}
