//! Territory map - tiles with an owner, a terrain and a garrison
//!
//! The battle engine only needs to read and write individual tiles, so it
//! talks to the map through [`TerritoryMap`]. [`TileGrid`] is the in-memory
//! implementation used by the simulator binary and the tests.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::army::composition::Composition;
use crate::campaign::terrain::TerrainType;
use crate::core::types::{PlayerId, TileCoord};

/// A single map tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: TileCoord,
    pub terrain: TerrainType,
    pub owner: Option<PlayerId>,
    pub garrison: Composition,
}

impl Tile {
    pub fn new(coord: TileCoord, terrain: TerrainType) -> Self {
        Self {
            coord,
            terrain,
            owner: None,
            garrison: Composition::new(),
        }
    }

    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_garrison(mut self, garrison: Composition) -> Self {
        self.garrison = garrison;
        self
    }
}

/// Tile storage the battle engine reads from and writes to
pub trait TerritoryMap {
    fn tile(&self, coord: TileCoord) -> Option<&Tile>;

    fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile>;

    fn contains(&self, coord: TileCoord) -> bool {
        self.tile(coord).is_some()
    }
}

/// Sparse in-memory map
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    tiles: AHashMap<TileCoord, Tile>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tile, replacing whatever was at its coordinate
    pub fn insert(&mut self, tile: Tile) -> Option<Tile> {
        self.tiles.insert(tile.coord, tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles owned by a player
    pub fn owned_by(&self, owner: PlayerId) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.values().filter(move |t| t.owner == Some(owner))
    }
}

impl TerritoryMap for TileGrid {
    fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord)
    }
}
