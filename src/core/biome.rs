use std::collections::BTreeMap;

use serde::Serialize;

use crate::algorithms::animal_zones::desert::DesertZones;
use crate::algorithms::animal_zones::woodland::WoodlandZones;
use crate::algorithms::animal_zones::{AnimalZonePolicy, GenericZones};
use crate::algorithms::water::oasis::OasisPools;
use crate::algorithms::water::river::RiverPath;
use crate::algorithms::water::WaterStrategy;
use crate::config::biome::{load_biomes_config, AnimalConfig, BiomeConfig, BiomesConfig, WaterType};
use crate::config::ConfigError;

/// 找不到请求的 biome 时回退到这一个
pub const FALLBACK_BIOME: &str = "woodland";

static RIVER: RiverPath = RiverPath;
static OASIS: OasisPools = OasisPools;
static WOODLAND_ZONES: WoodlandZones = WoodlandZones;
static DESERT_ZONES: DesertZones = DesertZones;
static GENERIC_ZONES: GenericZones = GenericZones;

// ── Biome 变体 ──────────────────────────────────────────────

/// Which built-in placement policies a biome runs with.
///
/// Anything that is not a known id still generates, using only the generic
/// shy/bold animal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Woodland,
    Desert,
    Custom,
}

impl Biome {
    pub fn from_id(id: &str) -> Self {
        match id {
            "woodland" => Biome::Woodland,
            "desert" => Biome::Desert,
            _ => Biome::Custom,
        }
    }

    pub fn animal_policy(self) -> &'static dyn AnimalZonePolicy {
        match self {
            Biome::Woodland => &WOODLAND_ZONES,
            Biome::Desert => &DESERT_ZONES,
            Biome::Custom => &GENERIC_ZONES,
        }
    }
}

// ── 定义 = 变体 + 配置 ──────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BiomeDefinition {
    pub kind: Biome,
    pub config: BiomeConfig,
}

impl BiomeDefinition {
    pub fn new(config: BiomeConfig) -> Self {
        Self {
            kind: Biome::from_id(&config.id),
            config,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn water_strategy(&self) -> &'static dyn WaterStrategy {
        match self.config.terrain.water_type {
            WaterType::River => &RIVER,
            WaterType::Oasis => &OASIS,
        }
    }

    pub fn animal_policy(&self) -> &'static dyn AnimalZonePolicy {
        self.kind.animal_policy()
    }
}

// ── 注册表 ──────────────────────────────────────────────────

/// Lookup over every loaded biome, keyed by id.
#[derive(Debug, Clone)]
pub struct BiomeRegistry {
    biomes: BTreeMap<String, BiomeDefinition>,
}

impl BiomeRegistry {
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self::from_config(load_biomes_config()?))
    }

    pub fn from_config(config: BiomesConfig) -> Self {
        let biomes = config
            .into_iter()
            .map(|(id, biome)| (id, BiomeDefinition::new(biome)))
            .collect();
        Self { biomes }
    }

    /// The requested biome, or the fallback biome when `id` is unknown.
    pub fn get(&self, id: &str) -> Option<&BiomeDefinition> {
        self.biomes
            .get(id)
            .or_else(|| self.biomes.get(FALLBACK_BIOME))
    }

    /// Strict lookup, no fallback.
    pub fn require(&self, id: &str) -> Result<&BiomeDefinition, ConfigError> {
        self.biomes
            .get(id)
            .ok_or_else(|| ConfigError::UnknownBiome(id.to_string()))
    }

    /// The biome the portal in `id` leads to, if any.
    pub fn next_biome(&self, id: &str) -> Option<&BiomeDefinition> {
        let next = self.biomes.get(id)?.config.next_biome.as_deref()?;
        self.biomes.get(next)
    }

    /// Biomes in the order a player meets them: the fallback biome, then
    /// along the `next_biome` chain, then anything unreachable by id.
    pub fn progression(&self) -> Vec<&BiomeDefinition> {
        let mut order: Vec<&BiomeDefinition> = Vec::with_capacity(self.biomes.len());
        let mut cursor = self.biomes.get(FALLBACK_BIOME);
        while let Some(biome) = cursor {
            // 环形链路到重复处停止
            if order.iter().any(|b| b.id() == biome.id()) {
                break;
            }
            order.push(biome);
            cursor = biome
                .config
                .next_biome
                .as_deref()
                .and_then(|next| self.biomes.get(next));
        }
        for biome in self.biomes.values() {
            if !order.iter().any(|b| b.id() == biome.id()) {
                order.push(biome);
            }
        }
        order
    }

    /// Searches every biome's roster for an animal type, in progression order.
    pub fn find_animal_config(&self, kind: &str) -> Option<&AnimalConfig> {
        self.progression()
            .into_iter()
            .find_map(|b| b.config.animals.get(kind))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.biomes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_falls_back_to_woodland() {
        let registry = BiomeRegistry::builtin().unwrap();
        assert_eq!(registry.get("tundra").unwrap().id(), "woodland");
        assert_eq!(registry.get("desert").unwrap().kind, Biome::Desert);
        assert!(matches!(
            registry.require("tundra"),
            Err(ConfigError::UnknownBiome(_))
        ));
    }

    #[test]
    fn portal_chain_ends_in_desert() {
        let registry = BiomeRegistry::builtin().unwrap();
        assert_eq!(registry.next_biome("woodland").unwrap().id(), "desert");
        assert!(registry.next_biome("desert").is_none());
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["desert", "woodland"]);
    }

    #[test]
    fn animal_lookup_spans_biomes() {
        let registry = BiomeRegistry::builtin().unwrap();
        assert_eq!(registry.find_animal_config("camel").unwrap().favorite_food, "dates");
        assert_eq!(registry.find_animal_config("bear").unwrap().count, 2);
        assert!(registry.find_animal_config("dragon").is_none());
    }

    #[test]
    fn shared_animal_resolves_to_the_earlier_biome() {
        let mut config = load_biomes_config().unwrap();
        let mut fox = config["woodland"].animals["fox"].clone();
        let woodland_count = fox.count;
        fox.count = woodland_count + 7;
        config.get_mut("desert").unwrap().animals.insert("fox".to_string(), fox);

        let registry = BiomeRegistry::from_config(config);
        let ids: Vec<&str> = registry.progression().iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec!["woodland", "desert"]);
        assert_eq!(registry.find_animal_config("fox").unwrap().count, woodland_count);
    }

    #[test]
    fn progression_survives_a_portal_cycle() {
        let mut config = load_biomes_config().unwrap();
        config.get_mut("desert").unwrap().next_biome = Some("woodland".to_string());
        let registry = BiomeRegistry::from_config(config);
        assert_eq!(registry.progression().len(), 2);
    }

    #[test]
    fn water_strategy_follows_config() {
        let registry = BiomeRegistry::builtin().unwrap();
        let woodland = registry.require("woodland").unwrap();
        let desert = registry.require("desert").unwrap();
        assert_eq!(woodland.water_strategy().kind(), WaterType::River);
        assert_eq!(desert.water_strategy().kind(), WaterType::Oasis);
    }
}
