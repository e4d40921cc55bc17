//! Game data bundle: unit stats, terrain and leaders
//!
//! The stock tables are built in. A TOML file with the same shape as
//! `data/game_data.toml` can replace them wholesale.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::army::buffs::{Buff, BuffScope, BuffStat, CombatStrategy, Leader, LeaderRoster};
use crate::army::unit_type::{UnitStatTable, UnitStats, UnitType};
use crate::campaign::terrain::{TerrainTable, TerrainType};
use crate::core::error::{ConquestError, Result};
use crate::core::types::{LeaderId, StrategyId};

/// Everything the battle engine reads but never writes
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub units: UnitStatTable,
    pub terrain: TerrainTable,
    pub roster: LeaderRoster,
}

impl GameData {
    pub fn standard() -> Self {
        Self {
            units: UnitStatTable::standard(),
            terrain: TerrainTable::standard(),
            roster: LeaderRoster::standard(),
        }
    }

    /// Load game data from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let data = Self::parse_toml(&content)?;
        tracing::info!("Loaded game data from {}", path.display());
        Ok(data)
    }

    /// Parse game data from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let toml_data: TomlGameData = toml::from_str(content)?;

        let mut data = Self::default();

        for (name, stats) in toml_data.units {
            let unit = name.parse::<UnitType>().map_err(ConquestError::InvalidGameData)?;
            stats
                .validate()
                .map_err(|e| invalid(format!("unit '{}': {}", name, e)))?;
            data.units.insert(unit, stats);
        }
        if data.units.is_empty() {
            return Err(invalid("no unit stats defined".into()));
        }

        for (name, entry) in toml_data.terrain {
            let terrain = name.parse::<TerrainType>().map_err(ConquestError::InvalidGameData)?;
            if let Some(bonus) = entry.defense_bonus {
                if !(bonus.is_finite() && bonus >= 0.0) {
                    return Err(invalid(format!(
                        "terrain '{}': defense bonus must be non-negative, got {}",
                        name, bonus
                    )));
                }
            }
            data.terrain.insert(terrain, &entry.display_name, entry.defense_bonus);
        }

        for leader in toml_data.leaders {
            let id = LeaderId::new(leader.id.clone());
            if data.roster.leader(&id).is_some() {
                return Err(invalid(format!("duplicate leader '{}'", leader.id)));
            }
            data.roster.add_leader(Leader {
                id,
                buffs: convert_buffs(&leader.id, leader.buffs)?,
                name: leader.name,
            });
        }

        for strategy in toml_data.strategies {
            let id = StrategyId::new(strategy.id.clone());
            if data.roster.strategy(&id).is_some() {
                return Err(invalid(format!("duplicate strategy '{}'", strategy.id)));
            }
            data.roster.add_strategy(CombatStrategy {
                id,
                buffs: convert_buffs(&strategy.id, strategy.buffs)?,
                name: strategy.name,
            });
        }

        Ok(data)
    }
}

fn invalid(msg: String) -> ConquestError {
    ConquestError::InvalidGameData(msg)
}

fn convert_buffs(owner: &str, buffs: Vec<TomlBuff>) -> Result<Vec<Buff>> {
    buffs
        .into_iter()
        .map(|b| b.into_buff().map_err(|e| invalid(format!("'{}': {}", owner, e))))
        .collect()
}

#[derive(Debug, Deserialize)]
struct TomlGameData {
    #[serde(default)]
    units: BTreeMap<String, UnitStats>,
    #[serde(default)]
    terrain: BTreeMap<String, TomlTerrain>,
    #[serde(default)]
    leaders: Vec<TomlBuffSource>,
    #[serde(default)]
    strategies: Vec<TomlBuffSource>,
}

#[derive(Debug, Deserialize)]
struct TomlTerrain {
    display_name: String,
    defense_bonus: Option<f64>,
}

/// A leader or a strategy; both are a named list of buffs
#[derive(Debug, Deserialize)]
struct TomlBuffSource {
    id: String,
    name: String,
    #[serde(default)]
    buffs: Vec<TomlBuff>,
}

/// `unit` absent means the buff is army-wide
#[derive(Debug, Deserialize)]
struct TomlBuff {
    unit: Option<String>,
    stat: String,
    percent: f64,
}

impl TomlBuff {
    fn into_buff(self) -> std::result::Result<Buff, String> {
        let scope = match self.unit {
            Some(unit) => BuffScope::UnitType(unit.parse()?),
            None => BuffScope::Global,
        };
        let stat = match self.stat.to_ascii_lowercase().as_str() {
            "attack" => BuffStat::Attack,
            "armor" | "defense" => BuffStat::Armor,
            "hp" => BuffStat::Hp,
            "speed" => BuffStat::Speed,
            other => return Err(format!("unknown buff stat '{}'", other)),
        };
        if !(self.percent.is_finite() && self.percent > -1.0) {
            return Err(format!("buff percent must be above -1.0, got {}", self.percent));
        }
        Ok(Buff::new(scope, stat, self.percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::buffs::BuffProvider;
    use crate::army::unit_type::UnitCatalog;
    use crate::campaign::terrain::TerrainLookup;

    const BUNDLED: &str = include_str!("../../data/game_data.toml");

    #[test]
    fn test_bundled_file_matches_standard_tables() {
        let data = GameData::parse_toml(BUNDLED).expect("bundled game data should parse");
        let standard = GameData::standard();

        for unit in UnitType::ALL {
            assert_eq!(data.units.base_stats(unit), standard.units.base_stats(unit));
        }
        for (terrain, info) in standard.terrain.iter() {
            assert_eq!(data.terrain.get(terrain), Some(info), "{:?}", terrain);
        }
        for id in ["gen1", "gen2"] {
            let id = LeaderId::new(id);
            assert_eq!(data.roster.leader(&id), standard.roster.leader(&id));
        }
        for id in ["defensive_stance", "aggressive_charge", "guerilla_tactics"] {
            let id = StrategyId::new(id);
            assert_eq!(data.roster.strategy(&id), standard.roster.strategy(&id));
        }
    }

    #[test]
    fn test_parse_minimal() {
        let content = r#"
            [units.militia]
            hp = 20
            attack = 4.0
            armor = 1.0
            range = 1
            speed = 1.0

            [terrain.plains]
            display_name = "Open Field"

            [[leaders]]
            id = "boss"
            name = "The Boss"
            buffs = [{ unit = "militia", stat = "hp", percent = 0.5 }]
        "#;

        let data = GameData::parse_toml(content).expect("should parse");

        assert_eq!(data.units.len(), 1);
        assert!(data.units.base_stats(UnitType::Archer).is_none());
        assert_eq!(data.terrain.display_name(TerrainType::Plains), "Open Field");
        assert_eq!(data.terrain.defense_bonus(TerrainType::Plains), 0.0);

        let buffs = data.roster.leader_buffs(&LeaderId::new("boss")).unwrap();
        assert_eq!(buffs, &[Buff::for_unit(UnitType::Militia, BuffStat::Hp, 0.5)]);
    }

    #[test]
    fn test_rejects_unknown_unit() {
        let content = r#"
            [units.dragon]
            hp = 500
            attack = 50.0
            armor = 20.0
            range = 2
            speed = 5.0
        "#;
        let err = GameData::parse_toml(content).unwrap_err();
        assert!(matches!(err, ConquestError::InvalidGameData(_)));
    }

    #[test]
    fn test_rejects_zero_hp() {
        let content = r#"
            [units.archer]
            hp = 0
            attack = 10.0
            armor = 2.0
            range = 3
            speed = 2.0
        "#;
        let err = GameData::parse_toml(content).unwrap_err();
        assert!(err.to_string().contains("hp must be positive"));
    }

    #[test]
    fn test_rejects_bad_buff_stat() {
        let content = r#"
            [units.militia]
            hp = 50
            attack = 8.0
            armor = 5.0
            range = 1
            speed = 2.0

            [[strategies]]
            id = "odd"
            name = "Odd"
            buffs = [{ stat = "luck", percent = 0.1 }]
        "#;
        let err = GameData::parse_toml(content).unwrap_err();
        assert!(err.to_string().contains("luck"));
    }

    #[test]
    fn test_rejects_empty_units() {
        let err = GameData::parse_toml("").unwrap_err();
        assert!(matches!(err, ConquestError::InvalidGameData(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = GameData::parse_toml("units = [").unwrap_err();
        assert!(matches!(err, ConquestError::TomlError(_)));
    }
}
