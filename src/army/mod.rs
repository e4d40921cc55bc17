//! Armies: unit types, their compositions and the buffs that modify them

pub mod buffs;
pub mod composition;
pub mod unit_type;

pub use buffs::{
    apply_buffs, Buff, BuffProvider, BuffScope, BuffStat, CombatStrategy, Leader, LeaderRoster,
};
pub use composition::Composition;
pub use unit_type::{UnitCatalog, UnitStatTable, UnitStats, UnitType};
