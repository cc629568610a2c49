//! Board module - the single-row match engine
//!
//! The board is a row of `columns` tiles. Runs of three or more equal kinds are
//! eliminated, survivors compact to the right keeping their order and identity,
//! and fresh tiles (new ids) enter on the left until the row is full again.
//! Index 0 is the leftmost tile.
//!
//! The row length never changes: `tiles().len() == columns()` before and after
//! every public operation.

use std::ops::Range;

use tracing::{debug, trace, warn};

use crate::rng::{KindSource, RandomKinds};
use crate::scoring::calculate_round_score;
use crate::snapshot::Snapshot;
use crate::types::{Tile, TileId, TileKind, LONG_CASCADE_WARN_ROUNDS, MIN_MATCH_LEN};

/// Maximal runs of equal kinds, in left-to-right order.
pub fn find_runs(tiles: &[Tile]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    while start < tiles.len() {
        let kind = tiles[start].kind;
        let mut end = start + 1;
        while end < tiles.len() && tiles[end].kind == kind {
            end += 1;
        }
        runs.push(start..end);
        start = end;
    }
    runs
}

/// All positions that belong to a run of at least [`MIN_MATCH_LEN`], ascending.
pub fn find_matches(tiles: &[Tile]) -> Vec<usize> {
    find_runs(tiles)
        .into_iter()
        .filter(|run| run.len() >= MIN_MATCH_LEN)
        .flatten()
        .collect()
}

/// Whether any run of at least [`MIN_MATCH_LEN`] exists.
pub fn has_match(tiles: &[Tile]) -> bool {
    let mut len = 0;
    for (i, tile) in tiles.iter().enumerate() {
        if i > 0 && tiles[i - 1].kind == tile.kind {
            len += 1;
        } else {
            len = 1;
        }
        if len >= MIN_MATCH_LEN {
            return true;
        }
    }
    false
}

/// The match-3 board engine.
///
/// Owns the tile row, the score and the kind source used for every new tile.
#[derive(Debug, Clone)]
pub struct Board<S = RandomKinds> {
    columns: usize,
    tiles: Vec<Tile>,
    score: u32,
    /// Next id handed out; ids are never reused within one board.
    next_id: u64,
    /// Matched count per round of the last accepted swap.
    last_cascade: Vec<usize>,
    source: S,
}

impl Board<RandomKinds> {
    /// Create a normalized board with uniform random kinds from `seed`.
    pub fn new(columns: usize, seed: u32) -> Self {
        Self::with_source(columns, RandomKinds::new(seed))
    }
}

impl<S: KindSource> Board<S> {
    /// Create a board of `columns` tiles drawn from `source`, then spot-replace
    /// matched positions until no run of three remains.
    pub fn with_source(columns: usize, source: S) -> Self {
        let mut board = Self {
            columns,
            tiles: Vec::with_capacity(columns),
            score: 0,
            next_id: 0,
            last_cascade: Vec::new(),
            source,
        };
        for _ in 0..columns {
            let tile = board.spawn();
            board.tiles.push(tile);
        }
        board.normalize_start();
        board
    }

    /// Create a board with exactly these kinds, ids `0..n` by position.
    ///
    /// No normalization happens: the row may already contain runs. Intended for
    /// scenario tests and replays.
    pub fn from_kinds(kinds: &[TileKind], source: S) -> Self {
        let tiles: Vec<Tile> = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| Tile::new(TileId(i as u64), kind))
            .collect();
        Self {
            columns: tiles.len(),
            next_id: tiles.len() as u64,
            tiles,
            score: 0,
            last_cascade: Vec::new(),
            source,
        }
    }

    /// Draw a new tile with a fresh id.
    fn spawn(&mut self) -> Tile {
        let id = TileId(self.next_id);
        self.next_id += 1;
        Tile::new(id, self.source.next_kind())
    }

    /// Replace only matched positions until the row has no match.
    fn normalize_start(&mut self) {
        let mut rounds = 0usize;
        loop {
            let matches = find_matches(&self.tiles);
            if matches.is_empty() {
                break;
            }
            for index in matches {
                self.tiles[index] = self.spawn();
            }
            rounds += 1;
            if rounds == LONG_CASCADE_WARN_ROUNDS {
                warn!(rounds, columns = self.columns, "start normalization is unusually long");
            }
        }
        debug!(rounds, columns = self.columns, "board normalized");
    }

    /// Swap two adjacent tiles if that creates a match, then resolve cascades.
    ///
    /// Returns false without touching the board when `i == j`, the indices are
    /// not adjacent, either is out of range, or the swap would not create a
    /// match anywhere.
    pub fn attempt_swap(&mut self, i: usize, j: usize) -> bool {
        if i == j || i.abs_diff(j) != 1 || i >= self.columns || j >= self.columns {
            trace!(i, j, columns = self.columns, "swap rejected: invalid indices");
            return false;
        }

        self.tiles.swap(i, j);
        if !has_match(&self.tiles) {
            self.tiles.swap(i, j);
            trace!(i, j, "swap rejected: no match");
            return false;
        }

        self.resolve_matches();
        true
    }

    /// Cascade: score, remove, compact, refill, repeat until stable.
    fn resolve_matches(&mut self) {
        self.last_cascade.clear();
        loop {
            let matches = find_matches(&self.tiles);
            if matches.is_empty() {
                break;
            }

            let points = calculate_round_score(matches.len());
            self.score = self.score.saturating_add(points);
            self.last_cascade.push(matches.len());
            debug!(
                round = self.last_cascade.len(),
                matched = matches.len(),
                points,
                score = self.score,
                "cascade round"
            );

            self.refill_after_clearing(&matches);

            if self.last_cascade.len() == LONG_CASCADE_WARN_ROUNDS {
                warn!(rounds = LONG_CASCADE_WARN_ROUNDS, "cascade is unusually long");
            }
        }
    }

    /// Drop the matched positions, keep survivors in order, prepend new tiles.
    fn refill_after_clearing(&mut self, matches: &[usize]) {
        if matches.is_empty() {
            return;
        }
        let mut cleared = vec![false; self.tiles.len()];
        for &index in matches {
            cleared[index] = true;
        }

        let missing = matches.len();
        let mut next = Vec::with_capacity(self.columns);
        for _ in 0..missing {
            let tile = self.spawn();
            next.push(tile);
        }
        next.extend(
            self.tiles
                .iter()
                .zip(&cleared)
                .filter(|&(_, &gone)| !gone)
                .map(|(tile, _)| *tile),
        );
        debug_assert_eq!(next.len(), self.columns);
        self.tiles = next;
    }

    /// Immutable copy of the current row.
    pub fn tiles(&self) -> Snapshot {
        Snapshot::new(self.tiles.as_slice())
    }

    pub fn tile(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Matched positions per cascade round of the last accepted swap.
    pub fn last_cascade(&self) -> &[usize] {
        &self.last_cascade
    }

    pub fn has_match(&self) -> bool {
        has_match(&self.tiles)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
