//! Composition - troop counts keyed by unit type

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::army::unit_type::UnitType;

/// Troop counts per unit type
///
/// Zero counts are never stored, so a missing type and a zero count are
/// the same thing and two compositions with the same troops compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<UnitType, u32>", into = "BTreeMap<UnitType, u32>")]
pub struct Composition {
    counts: BTreeMap<UnitType, u32>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, unit: UnitType, count: u32) -> Self {
        self.set(unit, count);
        self
    }

    pub fn get(&self, unit: UnitType) -> u32 {
        self.counts.get(&unit).copied().unwrap_or(0)
    }

    pub fn set(&mut self, unit: UnitType, count: u32) {
        if count == 0 {
            self.counts.remove(&unit);
        } else {
            self.counts.insert(unit, count);
        }
    }

    /// Add troops of one type (saturating)
    pub fn add(&mut self, unit: UnitType, count: u32) {
        let total = self.get(unit).saturating_add(count);
        self.set(unit, total);
    }

    /// Add every troop of another composition to this one
    pub fn merge(&mut self, other: &Composition) {
        for (unit, count) in other.iter() {
            self.add(unit, count);
        }
    }

    /// Total number of troops across all types
    ///
    /// Summed in `u64`, so no set of per-type `u32` counts can overflow it.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| count as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Non-zero entries in unit type order
    pub fn iter(&self) -> impl Iterator<Item = (UnitType, u32)> + '_ {
        self.counts.iter().map(|(unit, count)| (*unit, *count))
    }
}

impl FromIterator<(UnitType, u32)> for Composition {
    fn from_iter<I: IntoIterator<Item = (UnitType, u32)>>(iter: I) -> Self {
        let mut composition = Composition::new();
        for (unit, count) in iter {
            composition.add(unit, count);
        }
        composition
    }
}

impl From<BTreeMap<UnitType, u32>> for Composition {
    fn from(counts: BTreeMap<UnitType, u32>) -> Self {
        counts.into_iter().collect()
    }
}

impl From<Composition> for BTreeMap<UnitType, u32> {
    fn from(composition: Composition) -> Self {
        composition.counts
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(unit, count)| format!("{} {}", count, unit))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
