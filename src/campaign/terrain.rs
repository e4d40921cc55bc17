//! Terrain types and the defense bonuses they grant a garrison

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Terrain of a map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Plains,
    Mountain,
    Snow,
    City,
    Desert,
    Forest,
    Swamp,
    Ruins,
    Crystals,
    Water,
}

impl std::str::FromStr for TerrainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plains" => Ok(TerrainType::Plains),
            "mountain" => Ok(TerrainType::Mountain),
            "snow" => Ok(TerrainType::Snow),
            "city" => Ok(TerrainType::City),
            "desert" => Ok(TerrainType::Desert),
            "forest" => Ok(TerrainType::Forest),
            "swamp" => Ok(TerrainType::Swamp),
            "ruins" => Ok(TerrainType::Ruins),
            "crystals" => Ok(TerrainType::Crystals),
            "water" => Ok(TerrainType::Water),
            other => Err(format!("unknown terrain '{}'", other)),
        }
    }
}

/// Display data and defense bonus for one terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainInfo {
    pub display_name: String,
    /// Fractional armor bonus for defenders, `0.2` = +20%
    #[serde(default)]
    pub defense_bonus: Option<f64>,
}

/// Lookup of terrain bonuses and names
pub trait TerrainLookup {
    /// Defender armor bonus; terrain without an entry gives 0
    fn defense_bonus(&self, terrain: TerrainType) -> f64;

    fn display_name(&self, terrain: TerrainType) -> String;
}

pub const UNKNOWN_TERRAIN_NAME: &str = "Unknown";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainTable {
    entries: AHashMap<TerrainType, TerrainInfo>,
}

impl TerrainTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.insert(TerrainType::Plains, "Plains", Some(0.0));
        table.insert(TerrainType::Mountain, "Mountain", Some(0.2));
        table.insert(TerrainType::Snow, "Frozen Land", Some(0.1));
        table.insert(TerrainType::City, "City", Some(0.3));
        table.insert(TerrainType::Desert, "Desert", Some(0.05));
        table.insert(TerrainType::Forest, "Forest", Some(0.1));
        table.insert(TerrainType::Swamp, "Swamp", Some(0.05));
        table.insert(TerrainType::Ruins, "Ruins", Some(0.15));
        table.insert(TerrainType::Crystals, "Crystals", Some(0.0));
        // Water is named but grants nothing
        table.insert(TerrainType::Water, "Water", None);
        table
    }

    pub fn insert(&mut self, terrain: TerrainType, display_name: &str, defense_bonus: Option<f64>) {
        self.entries.insert(
            terrain,
            TerrainInfo {
                display_name: display_name.to_string(),
                defense_bonus,
            },
        );
    }

    pub fn set(&mut self, terrain: TerrainType, info: TerrainInfo) {
        self.entries.insert(terrain, info);
    }

    pub fn get(&self, terrain: TerrainType) -> Option<&TerrainInfo> {
        self.entries.get(&terrain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TerrainType, &TerrainInfo)> + '_ {
        self.entries.iter().map(|(t, info)| (*t, info))
    }
}

impl TerrainLookup for TerrainTable {
    fn defense_bonus(&self, terrain: TerrainType) -> f64 {
        self.entries
            .get(&terrain)
            .and_then(|info| info.defense_bonus)
            .unwrap_or(0.0)
    }

    fn display_name(&self, terrain: TerrainType) -> String {
        self.entries
            .get(&terrain)
            .map(|info| info.display_name.clone())
            .unwrap_or_else(|| UNKNOWN_TERRAIN_NAME.to_string())
    }
}
