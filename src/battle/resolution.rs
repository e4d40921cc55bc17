//! Round simulation - phased combat between two prepared sides
//!
//! Each round: attacker ranged -> defender ranged -> attacker melee -> defender melee.
//! Every phase reads the state left by the previous one, so the side that
//! shoots first thins out what the other side can shoot back with.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::army::composition::Composition;
use crate::army::unit_type::UnitStats;
use crate::battle::constants::{ARMOR_SCALE, DAMAGE_VARIANCE_MAX, DAMAGE_VARIANCE_MIN, MAX_ROUNDS};
use crate::battle::preparation::PreparedSide;
use crate::core::types::Side;

/// Whether a unit fights at range or in melee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reach {
    Ranged,
    Melee,
}

impl Reach {
    pub fn matches(&self, stats: &UnitStats) -> bool {
        match self {
            Reach::Ranged => stats.is_ranged(),
            Reach::Melee => stats.is_melee(),
        }
    }
}

/// One of the four ordered sub-steps of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AttackerRanged,
    DefenderRanged,
    AttackerMelee,
    DefenderMelee,
}

impl Phase {
    /// Fixed execution order within a round
    pub const ORDER: [Phase; 4] = [
        Phase::AttackerRanged,
        Phase::DefenderRanged,
        Phase::AttackerMelee,
        Phase::DefenderMelee,
    ];

    /// The side dealing damage in this phase
    pub fn actor(&self) -> Side {
        match self {
            Phase::AttackerRanged | Phase::AttackerMelee => Side::Attacker,
            Phase::DefenderRanged | Phase::DefenderMelee => Side::Defender,
        }
    }

    pub fn reach(&self) -> Reach {
        match self {
            Phase::AttackerRanged | Phase::DefenderRanged => Reach::Ranged,
            Phase::AttackerMelee | Phase::DefenderMelee => Reach::Melee,
        }
    }
}

/// Casualty ledger of a single round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub attacker_casualties: Composition,
    pub defender_casualties: Composition,
}

impl RoundResult {
    pub fn casualties(&self, side: Side) -> &Composition {
        match side {
            Side::Attacker => &self.attacker_casualties,
            Side::Defender => &self.defender_casualties,
        }
    }

    fn casualties_mut(&mut self, side: Side) -> &mut Composition {
        match side {
            Side::Attacker => &mut self.attacker_casualties,
            Side::Defender => &mut self.defender_casualties,
        }
    }
}

/// Armor mitigation with diminishing returns
///
/// Armor 0 lets everything through, armor 100 halves the damage.
pub fn mitigate(allocated: f64, armor: f64) -> f64 {
    allocated * (ARMOR_SCALE / (ARMOR_SCALE + armor))
}

/// Raw damage a side's units of the given reach put out this phase
pub fn group_damage<R: Rng + ?Sized>(side: &PreparedSide, reach: Reach, rng: &mut R) -> f64 {
    side.iter()
        .filter(|(_, unit)| reach.matches(&unit.stats))
        .map(|(_, unit)| {
            let factor = rng.gen_range(DAMAGE_VARIANCE_MIN..=DAMAGE_VARIANCE_MAX);
            unit.count as f64 * unit.stats.attack * factor
        })
        .sum()
}

/// Spread damage over the target in proportion to each type's headcount
///
/// `snapshot_total` is the target's troop count when the phase began.
/// Returns the casualties inflicted per unit type.
pub fn distribute_damage(target: &mut PreparedSide, total_damage: f64, snapshot_total: u64) -> Composition {
    let mut casualties = Composition::new();
    if snapshot_total == 0 {
        return casualties;
    }

    let unit_types: Vec<_> = target.iter().map(|(unit, _)| unit).collect();
    for unit_type in unit_types {
        let Some(unit) = target.get_mut(unit_type) else {
            continue;
        };
        if unit.count == 0 {
            continue;
        }

        let proportion = unit.count as f64 / snapshot_total as f64;
        let allocated = total_damage * proportion;
        let effective = mitigate(allocated, unit.stats.armor);
        let killed = ((effective / unit.stats.hp as f64).floor() as u32).min(unit.count);

        if killed > 0 {
            let fallen = unit.apply_casualties(killed);
            casualties.add(unit_type, fallen);
        }
    }

    casualties
}

/// Run one phase, recording casualties into the round's ledger
pub fn execute_phase<R: Rng + ?Sized>(
    phase: Phase,
    attacker: &mut PreparedSide,
    defender: &mut PreparedSide,
    round: &mut RoundResult,
    rng: &mut R,
) {
    let (acting, target) = match phase.actor() {
        Side::Attacker => (&*attacker, &mut *defender),
        Side::Defender => (&*defender, &mut *attacker),
    };

    let snapshot_total = target.total_count();
    if snapshot_total == 0 {
        return;
    }

    let damage = group_damage(acting, phase.reach(), rng);
    let casualties = distribute_damage(target, damage, snapshot_total);

    tracing::trace!(
        "{:?}: {:.1} damage, {} casualties",
        phase,
        damage,
        casualties.total()
    );

    round
        .casualties_mut(phase.actor().opponent())
        .merge(&casualties);
}

/// Run the four phases of a single round
pub fn simulate_round<R: Rng + ?Sized>(
    attacker: &mut PreparedSide,
    defender: &mut PreparedSide,
    rng: &mut R,
) -> RoundResult {
    let mut round = RoundResult::default();
    for phase in Phase::ORDER {
        execute_phase(phase, attacker, defender, &mut round, rng);
    }
    round
}

/// Fight rounds until one side is gone or `max_rounds` is reached
pub fn simulate_rounds<R: Rng + ?Sized>(
    attacker: &mut PreparedSide,
    defender: &mut PreparedSide,
    max_rounds: u32,
    rng: &mut R,
) -> Vec<RoundResult> {
    let mut rounds = Vec::new();

    for round_number in 1..=max_rounds {
        if attacker.is_defeated() || defender.is_defeated() {
            break;
        }

        let round = simulate_round(attacker, defender, rng);
        tracing::debug!(
            "Round {}: attacker lost {}, defender lost {} ({} vs {} remain)",
            round_number,
            round.attacker_casualties.total(),
            round.defender_casualties.total(),
            attacker.total_count(),
            defender.total_count()
        );
        rounds.push(round);
    }

    rounds
}

/// Full record of a simulated battle, before any map changes
#[derive(Debug, Clone)]
pub struct BattleSimulation {
    pub initial_attacker: PreparedSide,
    pub initial_defender: PreparedSide,
    pub attacker: PreparedSide,
    pub defender: PreparedSide,
    pub rounds: Vec<RoundResult>,
}

/// Simulate a whole battle between two prepared sides
pub fn simulate_battle<R: Rng + ?Sized>(
    attacker: PreparedSide,
    defender: PreparedSide,
    rng: &mut R,
) -> BattleSimulation {
    let initial_attacker = attacker.clone();
    let initial_defender = defender.clone();
    let mut attacker = attacker;
    let mut defender = defender;

    let rounds = simulate_rounds(&mut attacker, &mut defender, MAX_ROUNDS, rng);

    BattleSimulation {
        initial_attacker,
        initial_defender,
        attacker,
        defender,
        rounds,
    }
}
