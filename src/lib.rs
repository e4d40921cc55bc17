//! Conquest Core - battle resolution for a territorial strategy game
//!
//! A player sends an army from a home tile against a target tile. The engine
//! prepares both sides, fights up to ten rounds of ranged and melee phases,
//! hands the tile over or sends the survivors home, and files a report.

pub mod army;
pub mod battle;
pub mod campaign;
pub mod core;
pub mod data;
