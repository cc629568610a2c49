//! Immutable copies of the tile row, used for diffing.

use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Tile, TileId, TileKind};

/// Ordered, immutable copy of a board's tiles at one instant.
///
/// Cloning is cheap (shared storage). Two snapshots are equal when they hold
/// the same tiles (ids and kinds) in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    tiles: Arc<[Tile]>,
}

impl Snapshot {
    pub fn new(tiles: impl Into<Arc<[Tile]>>) -> Self {
        Self {
            tiles: tiles.into(),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Board index of a tile id, if present.
    pub fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.tiles.iter().map(|t| t.kind)
    }

    /// Kinds as one-letter codes, e.g. `"obbcbr"` (handy in logs and test failures).
    pub fn codes(&self) -> String {
        self.kinds().map(|k| k.as_str()).collect()
    }
}

impl Index<usize> for Snapshot {
    type Output = Tile;

    fn index(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

impl From<Vec<Tile>> for Snapshot {
    fn from(tiles: Vec<Tile>) -> Self {
        Self::new(tiles)
    }
}
