//! 生成算法参数定义
//!
//! 所有距离单位：`*_dist` / `*_margin` / `*_inset` / `*_jitter` 为世界坐标，
//! 其余以格子为单位，比例值相对于地图宽高。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    // 重试
    pub max_attempts: u32,

    // 河流
    pub river_width: u32,
    pub river_base_min: f64,
    pub river_base_span: f64,
    pub river_amplitude_min: f64,
    pub river_amplitude_max: f64,
    pub river_frequency_min: f64,
    pub river_frequency_max: f64,
    pub river_edge_inset: u32,

    // 绿洲
    pub pool_count_min: u32,
    pub pool_count_max: u32,
    pub pool_attempts_per_pool: u32,
    pub pool_edge_inset: u32,
    pub pool_min_spacing: f64,
    pub pool_radius_min: u32,
    pub pool_radius_max: u32,

    // 桥
    pub crossing_window_start: f64,
    pub crossing_window_end: f64,
    pub crossing_half_width: u32,

    // 空地
    pub clearing_anchors: Vec<[f64; 2]>,
    pub clearing_size_min: u32,
    pub clearing_size_max: u32,
    pub clearing_border: u32,
    pub clearing_max_shift: u32,

    // 装饰
    pub tree_attempt_factor: u32,
    pub bush_attempt_factor: u32,
    pub rock_attempt_factor: u32,
    pub berry_anchor_lift: f64,
    pub flower_inset: f64,
    pub tree_collider: ColliderSpec,
    pub rock_collider: ColliderSpec,

    // 物品
    pub tree_food_per_type: usize,
    pub tree_food_jitter: f64,
    pub tree_food_drop: f64,
    pub river_bank_row_start: u32,
    pub river_bank_row_stride: u32,
    pub rock_item_jitter: f64,
    pub material_per_clearing: u32,
    pub material_clearing_jitter: f64,
    pub material_edge_count: u32,
    pub material_edge_inset: f64,
    pub material_edge_band: f64,
    pub material_scatter_count: u32,
    pub material_scatter_inset: f64,

    // 动物
    pub animal_attempt_factor: u32,
    pub animal_inset: f64,
    pub animal_tree_clearance: f64,
    pub animal_spacing: f64,
    pub shy_margin_x: f64,
    pub shy_margin_y: f64,
}

/// 碰撞体尺寸 + 相对装饰中心的纵向偏移
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderSpec {
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_attempts: 8,

            river_width: 3,
            river_base_min: 0.4,
            river_base_span: 0.2,
            river_amplitude_min: 4.0,
            river_amplitude_max: 7.0,
            river_frequency_min: 0.06,
            river_frequency_max: 0.09,
            river_edge_inset: 3,

            pool_count_min: 2,
            pool_count_max: 3,
            pool_attempts_per_pool: 30,
            pool_edge_inset: 5,
            pool_min_spacing: 12.0,
            pool_radius_min: 2,
            pool_radius_max: 3,

            crossing_window_start: 0.3,
            crossing_window_end: 0.7,
            crossing_half_width: 1,

            clearing_anchors: vec![[0.3, 0.5], [0.7, 0.25], [0.5, 0.8]],
            clearing_size_min: 5,
            clearing_size_max: 6,
            clearing_border: 1,
            clearing_max_shift: 12,

            tree_attempt_factor: 5,
            bush_attempt_factor: 4,
            rock_attempt_factor: 4,
            berry_anchor_lift: 10.0,
            flower_inset: 40.0,
            tree_collider: ColliderSpec { offset_y: 12.0, width: 16.0, height: 16.0 },
            rock_collider: ColliderSpec { offset_y: 0.0, width: 20.0, height: 16.0 },

            tree_food_per_type: 12,
            tree_food_jitter: 15.0,
            tree_food_drop: 20.0,
            river_bank_row_start: 2,
            river_bank_row_stride: 3,
            rock_item_jitter: 20.0,
            material_per_clearing: 3,
            material_clearing_jitter: 40.0,
            material_edge_count: 10,
            material_edge_inset: 80.0,
            material_edge_band: 200.0,
            material_scatter_count: 6,
            material_scatter_inset: 150.0,

            animal_attempt_factor: 20,
            animal_inset: 100.0,
            animal_tree_clearance: 50.0,
            animal_spacing: 100.0,
            shy_margin_x: 800.0,
            shy_margin_y: 600.0,
        }
    }
}

impl GenerationParams {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
