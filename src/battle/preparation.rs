//! Army preparation - per-battle stat snapshots of both sides
//!
//! Effective stats are fixed when the side is prepared. Only counts and
//! remaining hp move once the rounds start.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::army::buffs::{apply_buffs, Buff};
use crate::army::composition::Composition;
use crate::army::unit_type::{UnitCatalog, UnitStats, UnitType};
use crate::core::types::Side;

/// One unit type's block of troops inside a prepared side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedUnit {
    pub count: u32,
    pub stats: UnitStats,
    pub total_hp: u64,
}

impl PreparedUnit {
    pub fn new(count: u32, stats: UnitStats) -> Self {
        Self {
            count,
            stats,
            total_hp: count as u64 * stats.hp as u64,
        }
    }

    /// Remove up to `casualties` troops, returns how many actually fell
    pub fn apply_casualties(&mut self, casualties: u32) -> u32 {
        let fallen = casualties.min(self.count);
        self.count -= fallen;
        self.total_hp = self
            .total_hp
            .saturating_sub(fallen as u64 * self.stats.hp as u64);
        fallen
    }
}

/// A side's army with effective stats, as it enters the battle
///
/// Troops whose type has no catalog entry cannot fight. They sit in
/// `reserve`, untouched by the rounds, and are handed back with the
/// survivors so the map never loses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSide {
    pub side: Side,
    units: BTreeMap<UnitType, PreparedUnit>,
    #[serde(default)]
    reserve: Composition,
}

impl PreparedSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            units: BTreeMap::new(),
            reserve: Composition::new(),
        }
    }

    /// Troops held out of the fight
    pub fn reserve(&self) -> &Composition {
        &self.reserve
    }

    pub fn add_reserve(&mut self, unit: UnitType, count: u32) {
        self.reserve.add(unit, count);
    }

    pub fn insert(&mut self, unit: UnitType, prepared: PreparedUnit) {
        self.units.insert(unit, prepared);
    }

    pub fn get(&self, unit: UnitType) -> Option<&PreparedUnit> {
        self.units.get(&unit)
    }

    pub fn get_mut(&mut self, unit: UnitType) -> Option<&mut PreparedUnit> {
        self.units.get_mut(&unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitType, &PreparedUnit)> + '_ {
        self.units.iter().map(|(unit, prepared)| (*unit, prepared))
    }

    /// Fighting troops still standing across all unit types
    pub fn total_count(&self) -> u64 {
        self.units.values().map(|u| u.count as u64).sum()
    }

    pub fn is_defeated(&self) -> bool {
        self.total_count() == 0
    }

    /// Surviving fighting troops as a plain composition
    pub fn composition(&self) -> Composition {
        self.iter().map(|(unit, prepared)| (unit, prepared.count)).collect()
    }

    /// Everything the side still has: fighting survivors plus the reserve
    pub fn remaining(&self) -> Composition {
        let mut remaining = self.composition();
        remaining.merge(&self.reserve);
        remaining
    }
}

/// Build a side's snapshot from its composition
///
/// Unit types the catalog does not know go to the reserve. `buffs` only affect the
/// attacker and `terrain_bonus` only scales the defender's armor.
pub fn prepare_side<C: UnitCatalog + ?Sized>(
    side: Side,
    composition: &Composition,
    catalog: &C,
    buffs: &[Buff],
    terrain_bonus: f64,
) -> PreparedSide {
    let mut prepared = PreparedSide::new(side);

    for (unit, count) in composition.iter() {
        let Some(mut stats) = catalog.base_stats(unit) else {
            tracing::debug!("Holding back {} {:?}: not in unit catalog", count, unit);
            prepared.add_reserve(unit, count);
            continue;
        };

        match side {
            Side::Attacker => apply_buffs(unit, &mut stats, buffs),
            Side::Defender => stats.armor *= 1.0 + terrain_bonus,
        }

        prepared.insert(unit, PreparedUnit::new(count, stats));
    }

    prepared
}

pub fn prepare_attacker<C: UnitCatalog + ?Sized>(
    composition: &Composition,
    catalog: &C,
    buffs: &[Buff],
) -> PreparedSide {
    prepare_side(Side::Attacker, composition, catalog, buffs, 0.0)
}

pub fn prepare_defender<C: UnitCatalog + ?Sized>(
    composition: &Composition,
    catalog: &C,
    terrain_bonus: f64,
) -> PreparedSide {
    prepare_side(Side::Defender, composition, catalog, &[], terrain_bonus)
}
