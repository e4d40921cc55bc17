pub mod map;
pub mod terrain;

pub use map::{TerritoryMap, Tile, TileGrid};
pub use terrain::{TerrainInfo, TerrainLookup, TerrainTable, TerrainType};
