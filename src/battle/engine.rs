//! Battle engine - resolves a player's attack on a tile from start to finish
//!
//! prepare -> simulate rounds -> resolve outcome -> compile report

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::army::buffs::{Buff, BuffProvider, BuffStat};
use crate::army::composition::Composition;
use crate::battle::outcome::{apply_outcome, determine_outcome, OutcomeContext};
use crate::battle::preparation::{prepare_attacker, prepare_defender};
use crate::battle::report::{narrative, BattleLog, BattleNotification, BattleReport};
use crate::battle::resolution::simulate_battle;
use crate::campaign::map::TerritoryMap;
use crate::campaign::terrain::TerrainLookup;
use crate::core::error::{ConquestError, Result};
use crate::core::types::{AuxiliaryId, BattleId, LeaderId, PlayerId, StrategyId, TileCoord};
use crate::data::GameData;

/// A player's order to attack a tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRequest {
    pub attacker: PlayerId,
    /// Where surviving attackers return after a defeat
    pub home: TileCoord,
    pub target: TileCoord,
    pub composition: Composition,
    pub leader: Option<LeaderId>,
    /// Recorded on the report, has no combat effect
    pub auxiliary: Option<AuxiliaryId>,
    /// Opt-in strategy buffs, applied after the leader's
    pub strategy: Option<StrategyId>,
}

impl AttackRequest {
    pub fn new(attacker: PlayerId, home: TileCoord, target: TileCoord, composition: Composition) -> Self {
        Self {
            attacker,
            home,
            target,
            composition,
            leader: None,
            auxiliary: None,
            strategy: None,
        }
    }

    pub fn with_leader(mut self, leader: LeaderId) -> Self {
        self.leader = Some(leader);
        self
    }

    pub fn with_auxiliary(mut self, auxiliary: AuxiliaryId) -> Self {
        self.auxiliary = Some(auxiliary);
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyId) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

/// Session-scoped battle resolver
///
/// Owns the game data, the random source, the report id sequence and the
/// battle log. Taking `&mut` on both the engine and the map for the length
/// of a battle keeps two battles from touching the same tiles at once.
pub struct BattleEngine {
    data: GameData,
    rng: ChaCha8Rng,
    next_battle_id: u64,
    log: BattleLog,
    notifications: Vec<BattleNotification>,
}

impl BattleEngine {
    /// Engine with an entropy-seeded random source
    pub fn new(data: GameData) -> Self {
        Self::with_rng(data, ChaCha8Rng::from_entropy())
    }

    /// Engine with a fixed seed, for reproducible battles
    pub fn with_seed(data: GameData, seed: u64) -> Self {
        Self::with_rng(data, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(data: GameData, rng: ChaCha8Rng) -> Self {
        Self {
            data,
            rng,
            next_battle_id: 1,
            log: BattleLog::new(),
            notifications: Vec::new(),
        }
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn battle_log(&self) -> &BattleLog {
        &self.log
    }

    pub fn report(&self, id: BattleId) -> Option<&BattleReport> {
        self.log.get(id)
    }

    /// Forget every stored report; ids keep counting up
    pub fn clear_battle_log(&mut self) {
        self.log.clear();
        tracing::info!("Battle log cleared");
    }

    /// Take the notifications produced since the last call
    pub fn drain_notifications(&mut self) -> Vec<BattleNotification> {
        std::mem::take(&mut self.notifications)
    }

    fn next_battle_id(&mut self) -> BattleId {
        let id = BattleId(self.next_battle_id);
        self.next_battle_id += 1;
        id
    }

    /// Buffs the attacker fights with: leader first, then strategy
    ///
    /// A leader contributes attack buffs only. A named strategy contributes
    /// every buff it carries.
    fn attacker_buffs(&self, request: &AttackRequest) -> Vec<Buff> {
        let mut buffs = Vec::new();

        if let Some(leader) = &request.leader {
            match self.data.roster.leader_buffs(leader) {
                Some(leader_buffs) => buffs.extend(
                    leader_buffs
                        .iter()
                        .filter(|buff| buff.stat == BuffStat::Attack)
                        .copied(),
                ),
                None => tracing::debug!("Unknown leader {:?}, no buffs applied", leader),
            }
        }

        if let Some(strategy) = &request.strategy {
            match self.data.roster.strategy_buffs(strategy) {
                Some(strategy_buffs) => buffs.extend_from_slice(strategy_buffs),
                None => tracing::debug!("Unknown strategy {:?}, no buffs applied", strategy),
            }
        }

        buffs
    }

    /// Resolve an attack, mutate the map and record the report
    ///
    /// Fails only when the target tile does not exist.
    pub fn resolve_battle<M: TerritoryMap + ?Sized>(
        &mut self,
        map: &mut M,
        request: &AttackRequest,
    ) -> Result<BattleReport> {
        let target = map
            .tile(request.target)
            .ok_or(ConquestError::TileNotFound(request.target))?;
        let terrain = target.terrain;
        let defender_id = target.owner;
        let defender_composition = target.garrison.clone();

        let terrain_bonus = self.data.terrain.defense_bonus(terrain);
        let buffs = self.attacker_buffs(request);
        let attacker = prepare_attacker(&request.composition, &self.data.units, &buffs);
        let defender = prepare_defender(&defender_composition, &self.data.units, terrain_bonus);

        if let Some(auxiliary) = &request.auxiliary {
            tracing::debug!("Auxiliary {:?} accompanies the attack without combat effect", auxiliary);
        }

        let sim = simulate_battle(attacker, defender, &mut self.rng);

        // Troops the catalog could not field stay with their side
        let final_attacker = sim.attacker.remaining();
        let final_defender = sim.defender.remaining();
        let attacker_casualties = sim
            .initial_attacker
            .total_count()
            .saturating_sub(sim.attacker.total_count());
        let defender_casualties = sim
            .initial_defender
            .total_count()
            .saturating_sub(sim.defender.total_count());
        let outcome = determine_outcome(&final_attacker, &final_defender);

        let affected_tiles = apply_outcome(
            map,
            outcome,
            &OutcomeContext {
                target: request.target,
                home: request.home,
                attacker: request.attacker,
                final_attacker: &final_attacker,
                final_defender: &final_defender,
            },
        )?;

        let id = self.next_battle_id();
        let surviving = final_attacker.total();
        let report = BattleReport {
            id,
            timestamp: unix_timestamp(),
            location: request.target,
            attacker: request.attacker,
            defender: defender_id,
            leader: request.leader.clone(),
            auxiliary: request.auxiliary.clone(),
            strategy: request.strategy.clone(),
            attacker_casualties,
            defender_casualties,
            initial_attacker: sim.initial_attacker,
            initial_defender: sim.initial_defender,
            final_attacker,
            final_defender,
            terrain: self.data.terrain.display_name(terrain),
            rounds: sim.rounds,
            outcome,
            narrative: narrative(outcome, surviving),
        };

        tracing::info!(
            "{} at {} after {} rounds: attacker lost {}, defender lost {}",
            outcome,
            request.target,
            report.rounds_fought(),
            report.attacker_casualties,
            report.defender_casualties
        );

        self.notifications.push(BattleNotification {
            report_id: id,
            outcome,
            location: request.target,
            affected_tiles,
            message: report.headline(),
        });

        if let Some(evicted) = self.log.push(report.clone()) {
            tracing::debug!("Battle log full, evicted {}", evicted.id);
        }

        Ok(report)
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
