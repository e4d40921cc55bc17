//! Outcome resolution - who won, and what happens to the tiles

use serde::{Deserialize, Serialize};

use crate::army::composition::Composition;
use crate::campaign::map::TerritoryMap;
use crate::core::error::{ConquestError, Result};
use crate::core::types::{PlayerId, TileCoord};

/// Battle outcome from the attacker's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    pub fn is_victory(&self) -> bool {
        matches!(self, Outcome::Victory)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Victory => write!(f, "Victory"),
            Outcome::Defeat => write!(f, "Defeat"),
        }
    }
}

/// Victory needs surviving attackers and an empty defense
///
/// Mutual wipeout and a stalemate at the round cap both count as defeat.
pub fn determine_outcome(final_attacker: &Composition, final_defender: &Composition) -> Outcome {
    if final_attacker.total() > 0 && final_defender.total() == 0 {
        Outcome::Victory
    } else {
        Outcome::Defeat
    }
}

/// Everything the outcome step needs to touch the map
#[derive(Debug, Clone)]
pub struct OutcomeContext<'a> {
    pub target: TileCoord,
    pub home: TileCoord,
    pub attacker: PlayerId,
    pub final_attacker: &'a Composition,
    pub final_defender: &'a Composition,
}

/// Write the battle's result into the map
///
/// Victory hands the target to the attacker and garrisons it with the
/// survivors. Defeat leaves ownership alone, keeps the defender's survivors on
/// the target and sends the attacker's survivors home. Returns the tiles that
/// changed so the host can redraw them.
pub fn apply_outcome<M: TerritoryMap + ?Sized>(
    map: &mut M,
    outcome: Outcome,
    ctx: &OutcomeContext<'_>,
) -> Result<Vec<TileCoord>> {
    let mut affected = vec![ctx.target];

    match outcome {
        Outcome::Victory => {
            let tile = map
                .tile_mut(ctx.target)
                .ok_or(ConquestError::TileNotFound(ctx.target))?;
            tile.owner = Some(ctx.attacker);
            tile.garrison = ctx.final_attacker.clone();
        }
        Outcome::Defeat => {
            let tile = map
                .tile_mut(ctx.target)
                .ok_or(ConquestError::TileNotFound(ctx.target))?;
            tile.garrison = ctx.final_defender.clone();

            if !ctx.final_attacker.is_empty() {
                match map.tile_mut(ctx.home) {
                    Some(home) => {
                        home.garrison.merge(ctx.final_attacker);
                        if ctx.home != ctx.target {
                            affected.push(ctx.home);
                        }
                    }
                    None => tracing::warn!(
                        "Home tile {} missing, {} surviving attackers lost",
                        ctx.home,
                        ctx.final_attacker.total()
                    ),
                }
            }
        }
    }

    Ok(affected)
}
