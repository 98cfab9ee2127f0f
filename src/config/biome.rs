use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

const BIOMES_JSON: &str = include_str!("../assets/biomes.json");

// ── Terrain ─────────────────────────────────────────────────

/// 水体生成方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterType {
    /// A single meandering channel spanning the map top to bottom.
    River,
    /// Two or three small elliptical ponds.
    Oasis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub base: String,
    pub base_variants: u32,
    pub water: String,
    pub water_variants: u32,
    pub water_type: WaterType,
    pub clearing_tile: String,
    pub bank_tile: String,
}

// ── Decorations ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    pub count: u32,
    pub min_dist: f64,
    pub trunk: String,
    #[serde(default)]
    pub canopies: Vec<String>,
    /// 单张贴图的整树（树冠 + 树干），非空时优先使用
    #[serde(default)]
    pub whole_trees: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BushConfig {
    pub count: u32,
    #[serde(default = "default_bush_min_dist")]
    pub min_dist: f64,
    #[serde(default = "default_tree_clearance")]
    pub tree_clearance: f64,
    pub berry_chance: f64,
    pub plain: String,
    pub berry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RockConfig {
    pub count: u32,
    #[serde(default = "default_rock_min_dist")]
    pub min_dist: f64,
    #[serde(default = "default_tree_clearance")]
    pub tree_clearance: f64,
    pub texture: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowerConfig {
    pub count: u32,
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorationsConfig {
    pub trees: TreeConfig,
    pub bushes: BushConfig,
    pub rocks: RockConfig,
    pub flowers: FlowerConfig,
}

fn default_bush_min_dist() -> f64 {
    40.0
}

fn default_rock_min_dist() -> f64 {
    50.0
}

fn default_tree_clearance() -> f64 {
    50.0
}

// ── Animals / items ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub texture: String,
    pub favorite_food: String,
    pub tameable: bool,
    pub shy: bool,
    pub speed: f64,
    pub flee_speed: f64,
    pub required_feedings: u32,
    pub count: u32,
}

/// How an item type's spawn candidates are derived from the finished map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRole {
    /// Exactly the berry-bush anchors.
    BerryFood,
    /// Under a disjoint slice of the tree list.
    TreeFood,
    /// Along the water edge.
    WaterFood,
    /// Next to rocks.
    RockFood,
}

/// 传送门建造阶段：名称 + 材料消耗
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalStage {
    pub name: String,
    /// 书写顺序即材料顺序
    #[serde(with = "crate::config::ordered")]
    pub cost: Vec<(String, u32)>,
}

// ── Biome ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub next_biome: Option<String>,
    #[serde(default)]
    pub background_color: String,
    pub terrain: TerrainConfig,
    pub decorations: DecorationsConfig,
    pub animals: BTreeMap<String, AnimalConfig>,
    /// Desired spawn count per item type. Consumed by the external spawner;
    /// generation only uses its keys.
    pub item_spawn_counts: BTreeMap<String, u32>,
    #[serde(default, with = "crate::config::ordered")]
    pub item_roles: Vec<(String, ItemRole)>,
    #[serde(default)]
    pub portal_stages: Vec<PortalStage>,
}

impl BiomeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BiomeConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Item types declared with `role`, in declaration order.
    pub fn items_with_role(&self, role: ItemRole) -> Vec<&str> {
        self.item_roles
            .iter()
            .filter(|(_, r)| *r == role)
            .map(|(item, _)| item.as_str())
            .collect()
    }

    /// Every material key that appears in any portal stage cost, in first-appearance order.
    pub fn building_materials(&self) -> Vec<&str> {
        let mut mats: Vec<&str> = Vec::new();
        for stage in &self.portal_stages {
            for (key, _) in &stage.cost {
                if !mats.contains(&key.as_str()) {
                    mats.push(key);
                }
            }
        }
        mats
    }
}

pub type BiomesConfig = BTreeMap<String, BiomeConfig>;

pub fn load_biomes_config() -> Result<BiomesConfig, ConfigError> {
    let config: BiomesConfig = serde_json::from_str(BIOMES_JSON)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_biomes_parse() {
        let biomes = load_biomes_config().unwrap();
        assert!(biomes.contains_key("woodland"));
        assert!(biomes.contains_key("desert"));

        let woodland = &biomes["woodland"];
        assert_eq!(woodland.terrain.water_type, WaterType::River);
        assert_eq!(woodland.decorations.bushes.min_dist, 40.0);
        assert_eq!(woodland.animals["deer"].count, 4);
        assert_eq!(biomes["desert"].terrain.water_type, WaterType::Oasis);
    }

    #[test]
    fn building_materials_follow_stage_order() {
        let biomes = load_biomes_config().unwrap();
        assert_eq!(
            biomes["woodland"].building_materials(),
            vec!["planks", "stones", "straw"]
        );
        assert_eq!(
            biomes["desert"].building_materials(),
            vec!["urns", "mummies", "scepters"]
        );
    }

    #[test]
    fn roles_are_looked_up_by_declaration() {
        let biomes = load_biomes_config().unwrap();
        let woodland = &biomes["woodland"];
        assert_eq!(woodland.items_with_role(ItemRole::TreeFood), vec!["mushrooms", "acorns"]);
        assert!(woodland.items_with_role(ItemRole::RockFood).is_empty());
        assert_eq!(biomes["desert"].items_with_role(ItemRole::RockFood), vec!["beetles"]);
    }

    #[test]
    fn stage_cost_keeps_written_order() {
        let stage: PortalStage =
            serde_json::from_str(r#"{ "name": "Gate", "cost": { "straw": 2, "planks": 5 } }"#).unwrap();
        assert_eq!(stage.cost, vec![("straw".to_string(), 2), ("planks".to_string(), 5)]);
    }
}
