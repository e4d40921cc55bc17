pub mod error;
pub mod types;

pub use error::{ConquestError, Result};
pub use types::{AuxiliaryId, BattleId, LeaderId, PlayerId, Side, StrategyId, TileCoord};
