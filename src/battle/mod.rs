//! Battle resolution - a player's attack on a tile, start to finish
//!
//! Pipeline per battle:
//! - Preparation: composition + catalog + buffs/terrain -> prepared sides
//! - Resolution: up to ten rounds of four ordered phases
//! - Outcome: victory or defeat, written back into the map
//! - Report: immutable record pushed into a bounded log

pub mod constants;
pub mod engine;
pub mod outcome;
pub mod preparation;
pub mod report;
pub mod resolution;

// Re-exports for convenient access
pub use constants::*;
pub use engine::{AttackRequest, BattleEngine};
pub use outcome::{apply_outcome, determine_outcome, Outcome, OutcomeContext};
pub use preparation::{prepare_attacker, prepare_defender, prepare_side, PreparedSide, PreparedUnit};
pub use report::{narrative, BattleLog, BattleNotification, BattleReport, CasualtyLine};
pub use resolution::{
    distribute_damage, execute_phase, group_damage, mitigate, simulate_battle, simulate_round,
    simulate_rounds, BattleSimulation, Phase, Reach, RoundResult,
};
