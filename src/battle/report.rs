//! Battle reports and the bounded log they are kept in

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::army::composition::Composition;
use crate::army::unit_type::UnitType;
use crate::battle::constants::BATTLE_LOG_CAPACITY;
use crate::battle::outcome::Outcome;
use crate::battle::preparation::PreparedSide;
use crate::battle::resolution::RoundResult;
use crate::core::types::{AuxiliaryId, BattleId, LeaderId, PlayerId, StrategyId, TileCoord};

/// Immutable record of one resolved battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub id: BattleId,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
    pub location: TileCoord,
    pub attacker: PlayerId,
    /// Owner of the target before the battle
    pub defender: Option<PlayerId>,
    pub leader: Option<LeaderId>,
    pub auxiliary: Option<AuxiliaryId>,
    pub strategy: Option<StrategyId>,
    pub initial_attacker: PreparedSide,
    pub initial_defender: PreparedSide,
    pub final_attacker: Composition,
    pub final_defender: Composition,
    pub attacker_casualties: u64,
    pub defender_casualties: u64,
    pub terrain: String,
    pub rounds: Vec<RoundResult>,
    pub outcome: Outcome,
    pub narrative: String,
}

/// Losses of one unit type over a whole battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasualtyLine {
    pub unit: UnitType,
    pub initial: u32,
    pub remaining: u32,
}

impl CasualtyLine {
    pub fn lost(&self) -> u32 {
        self.initial.saturating_sub(self.remaining)
    }
}

impl BattleReport {
    pub fn initial_attacker_total(&self) -> u64 {
        self.initial_attacker.total_count()
    }

    pub fn initial_defender_total(&self) -> u64 {
        self.initial_defender.total_count()
    }

    pub fn rounds_fought(&self) -> usize {
        self.rounds.len()
    }

    /// Per-type `initial -> remaining` lines for the attacker
    pub fn attacker_breakdown(&self) -> Vec<CasualtyLine> {
        breakdown(&self.initial_attacker, &self.final_attacker)
    }

    /// Per-type `initial -> remaining` lines for the defender
    pub fn defender_breakdown(&self) -> Vec<CasualtyLine> {
        breakdown(&self.initial_defender, &self.final_defender)
    }

    pub fn headline(&self) -> String {
        format!("Battle at {}: {}!", self.location, self.outcome)
    }
}

fn breakdown(initial: &PreparedSide, remaining: &Composition) -> Vec<CasualtyLine> {
    initial
        .iter()
        .filter(|(_, unit)| unit.count > 0)
        .map(|(unit, prepared)| CasualtyLine {
            unit,
            initial: prepared.count,
            remaining: remaining.get(unit),
        })
        .collect()
}

/// Short text describing how a battle ended
pub fn narrative(outcome: Outcome, surviving_attackers: u64) -> String {
    match outcome {
        Outcome::Victory => format!("Tile conquered. {} troops survived.", surviving_attackers),
        Outcome::Defeat => format!("Attack failed. {} troops returned.", surviving_attackers),
    }
}

/// Notice that a battle was resolved, for the host to surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleNotification {
    pub report_id: BattleId,
    pub outcome: Outcome,
    pub location: TileCoord,
    /// Tiles whose owner or garrison changed
    pub affected_tiles: Vec<TileCoord>,
    pub message: String,
}

/// Bounded battle history, oldest first
///
/// At capacity the oldest report is evicted before a new one goes in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleLog {
    reports: VecDeque<BattleReport>,
    capacity: usize,
}

impl Default for BattleLog {
    fn default() -> Self {
        Self::with_capacity(BATTLE_LOG_CAPACITY)
    }
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            reports: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a report, returning the evicted one if the log was full
    pub fn push(&mut self, report: BattleReport) -> Option<BattleReport> {
        let evicted = if self.reports.len() >= self.capacity {
            self.reports.pop_front()
        } else {
            None
        };
        self.reports.push_back(report);
        evicted
    }

    pub fn get(&self, id: BattleId) -> Option<&BattleReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn latest(&self) -> Option<&BattleReport> {
        self.reports.back()
    }

    /// Oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &BattleReport> + '_ {
        self.reports.iter()
    }

    /// Newest first
    pub fn iter_recent(&self) -> impl Iterator<Item = &BattleReport> + '_ {
        self.reports.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}
