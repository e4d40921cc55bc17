//! Typed percent buffs granted by leaders and combat strategies

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::army::unit_type::{UnitStats, UnitType};
use crate::core::types::{LeaderId, StrategyId};

/// Which units a buff reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffScope {
    Global,
    UnitType(UnitType),
}

impl BuffScope {
    pub fn applies_to(&self, unit: UnitType) -> bool {
        match self {
            BuffScope::Global => true,
            BuffScope::UnitType(t) => *t == unit,
        }
    }
}

/// Which stat a buff modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffStat {
    Attack,
    Armor,
    Hp,
    Speed,
}

/// A percent modifier, `percent = 0.1` means +10%
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub scope: BuffScope,
    pub stat: BuffStat,
    pub percent: f64,
}

impl Buff {
    pub fn new(scope: BuffScope, stat: BuffStat, percent: f64) -> Self {
        Self { scope, stat, percent }
    }

    pub fn global(stat: BuffStat, percent: f64) -> Self {
        Self::new(BuffScope::Global, stat, percent)
    }

    pub fn for_unit(unit: UnitType, stat: BuffStat, percent: f64) -> Self {
        Self::new(BuffScope::UnitType(unit), stat, percent)
    }

    pub fn multiplier(&self) -> f64 {
        1.0 + self.percent
    }
}

/// Apply buffs to a unit's stats
///
/// Global buffs land before unit-type buffs; every buff compounds
/// multiplicatively. Hp is rounded down and never drops below 1.
pub fn apply_buffs(unit: UnitType, stats: &mut UnitStats, buffs: &[Buff]) {
    let global = buffs.iter().filter(|b| b.scope == BuffScope::Global);
    let specific = buffs
        .iter()
        .filter(|b| b.scope != BuffScope::Global && b.scope.applies_to(unit));

    for buff in global.chain(specific) {
        let m = buff.multiplier();
        match buff.stat {
            BuffStat::Attack => stats.attack *= m,
            BuffStat::Armor => stats.armor *= m,
            BuffStat::Hp => stats.hp = ((stats.hp as f64 * m).floor() as u32).max(1),
            BuffStat::Speed => stats.speed *= m,
        }
    }
}

/// A general who can lead an attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub id: LeaderId,
    pub name: String,
    #[serde(default)]
    pub buffs: Vec<Buff>,
}

/// An army-wide stance chosen before an attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStrategy {
    pub id: StrategyId,
    pub name: String,
    #[serde(default)]
    pub buffs: Vec<Buff>,
}

/// Resolves buffs by source
pub trait BuffProvider {
    /// Buffs of a leader, `None` when the leader is unknown
    fn leader_buffs(&self, leader: &LeaderId) -> Option<&[Buff]>;

    /// Buffs of a combat strategy, `None` when the strategy is unknown
    fn strategy_buffs(&self, _strategy: &StrategyId) -> Option<&[Buff]> {
        None
    }
}

/// Registry of leaders and strategies
#[derive(Debug, Clone, Default)]
pub struct LeaderRoster {
    leaders: AHashMap<LeaderId, Leader>,
    strategies: AHashMap<StrategyId, CombatStrategy>,
}

impl LeaderRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock generals and strategies
    pub fn standard() -> Self {
        let mut roster = Self::new();

        roster.add_leader(Leader {
            id: LeaderId::new("gen1"),
            name: "Valerius".into(),
            buffs: vec![
                Buff::global(BuffStat::Attack, 0.10),
                Buff::for_unit(UnitType::Cavalry, BuffStat::Speed, 0.20),
            ],
        });
        roster.add_leader(Leader {
            id: LeaderId::new("gen2"),
            name: "Lyra".into(),
            buffs: vec![Buff::for_unit(UnitType::Archer, BuffStat::Attack, 0.25)],
        });

        roster.add_strategy(CombatStrategy {
            id: StrategyId::new("defensive_stance"),
            name: "Defensive Stance".into(),
            buffs: vec![Buff::global(BuffStat::Armor, 0.15)],
        });
        roster.add_strategy(CombatStrategy {
            id: StrategyId::new("aggressive_charge"),
            name: "Aggressive Charge".into(),
            buffs: vec![Buff::global(BuffStat::Attack, 0.10)],
        });
        roster.add_strategy(CombatStrategy {
            id: StrategyId::new("guerilla_tactics"),
            name: "Guerilla Tactics".into(),
            buffs: vec![Buff::for_unit(UnitType::Militia, BuffStat::Hp, 0.20)],
        });

        roster
    }

    pub fn add_leader(&mut self, leader: Leader) {
        self.leaders.insert(leader.id.clone(), leader);
    }

    pub fn add_strategy(&mut self, strategy: CombatStrategy) {
        self.strategies.insert(strategy.id.clone(), strategy);
    }

    pub fn leader(&self, id: &LeaderId) -> Option<&Leader> {
        self.leaders.get(id)
    }

    pub fn strategy(&self, id: &StrategyId) -> Option<&CombatStrategy> {
        self.strategies.get(id)
    }
}

impl BuffProvider for LeaderRoster {
    fn leader_buffs(&self, leader: &LeaderId) -> Option<&[Buff]> {
        self.leaders.get(leader).map(|l| l.buffs.as_slice())
    }

    fn strategy_buffs(&self, strategy: &StrategyId) -> Option<&[Buff]> {
        self.strategies.get(strategy).map(|s| s.buffs.as_slice())
    }
}
