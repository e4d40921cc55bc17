//! Unit types and the stat catalog they are looked up in

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Type of military unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Militia, // Basic infantry
    Archer,  // Ranged
    Cavalry, // Mounted, heavy hitter
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Militia, UnitType::Archer, UnitType::Cavalry];

    pub fn name(&self) -> &'static str {
        match self {
            UnitType::Militia => "Militia",
            UnitType::Archer => "Archer",
            UnitType::Cavalry => "Cavalry",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl std::str::FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "militia" => Ok(UnitType::Militia),
            "archer" | "archers" => Ok(UnitType::Archer),
            "cavalry" => Ok(UnitType::Cavalry),
            other => Err(format!("unknown unit type '{}'", other)),
        }
    }
}

/// Base combat statistics for one soldier of a unit type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub hp: u32,
    pub attack: f64,
    pub armor: f64,
    /// 1 = melee, anything above fires in the ranged phases
    pub range: u32,
    /// Carried for completeness, combat math ignores it
    pub speed: f64,
}

impl UnitStats {
    pub fn is_ranged(&self) -> bool {
        self.range > 1
    }

    pub fn is_melee(&self) -> bool {
        self.range == 1
    }

    /// Check the invariants every catalog entry must hold
    pub fn validate(&self) -> Result<(), String> {
        if self.hp == 0 {
            return Err("hp must be positive".into());
        }
        if !(self.attack.is_finite() && self.attack > 0.0) {
            return Err(format!("attack must be positive, got {}", self.attack));
        }
        if !(self.armor.is_finite() && self.armor >= 0.0) {
            return Err(format!("armor must be non-negative, got {}", self.armor));
        }
        if self.range == 0 {
            return Err("range must be at least 1".into());
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(format!("speed must be positive, got {}", self.speed));
        }
        Ok(())
    }
}

/// Source of base unit statistics
pub trait UnitCatalog {
    /// Base stats for a unit type, `None` if the catalog does not know it
    fn base_stats(&self, unit: UnitType) -> Option<UnitStats>;
}

/// Table-backed unit catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitStatTable {
    stats: AHashMap<UnitType, UnitStats>,
}

impl UnitStatTable {
    /// An empty catalog; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock roster: militia, archers and cavalry
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.insert(
            UnitType::Militia,
            UnitStats { hp: 50, attack: 8.0, armor: 5.0, range: 1, speed: 2.0 },
        );
        table.insert(
            UnitType::Archer,
            UnitStats { hp: 35, attack: 10.0, armor: 2.0, range: 3, speed: 2.0 },
        );
        table.insert(
            UnitType::Cavalry,
            UnitStats { hp: 80, attack: 15.0, armor: 8.0, range: 1, speed: 4.0 },
        );
        table
    }

    pub fn insert(&mut self, unit: UnitType, stats: UnitStats) {
        self.stats.insert(unit, stats);
    }

    pub fn remove(&mut self, unit: UnitType) -> Option<UnitStats> {
        self.stats.remove(&unit)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl UnitCatalog for UnitStatTable {
    fn base_stats(&self, unit: UnitType) -> Option<UnitStats> {
        self.stats.get(&unit).copied()
    }
}
