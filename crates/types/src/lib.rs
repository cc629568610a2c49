//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with serde derives, making them usable in any
//! context (board engine, transition planning, terminal rendering, JSON dumps).
//!
//! # Board
//!
//! The board is a single row of `columns` tiles. Each tile carries an opaque
//! [`TileId`] assigned once at creation and a [`TileKind`]; only the kind takes
//! part in matching.
//!
//! - **Match**: a run of at least [`MIN_MATCH_LEN`] consecutive tiles of one kind
//! - **Score**: [`POINTS_PER_TILE`] for every matched position in every cascade round
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host tick interval (~60 FPS) |
//! | `SWAP_PHASE_MS` | 140 | Two tiles trade places |
//! | `ELIMINATE_PHASE_MS` | 200 | Matched tiles pop and vanish |
//! | `REFILL_PHASE_MS` | 240 | Survivors slide right, new tiles enter from the left |
//! | `FLAT_PHASE_MS` | 240 | Single-phase fallback when no swap is known |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{Cue, TileKind, TransitionCategory, KIND_COUNT};
//!
//! // Parse from string (case-insensitive)
//! let kind = TileKind::from_str("B").unwrap();
//! assert_eq!(kind, TileKind::BlueRicky);
//! assert_eq!(kind.as_str(), "b");
//!
//! assert_eq!(TileKind::ALL.len(), KIND_COUNT);
//! assert_eq!(Cue::Eliminate.as_str(), "eliminate");
//! assert_eq!(TransitionCategory::Insert.as_str(), "insert");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default board width (number of tiles in the row)
pub const DEFAULT_COLUMNS: usize = 12;

/// Smallest board a session accepts
pub const MIN_COLUMNS: usize = 3;

/// Largest board a session accepts
pub const MAX_COLUMNS: usize = 64;

/// Minimum run length that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Points awarded per matched position
pub const POINTS_PER_TILE: u32 = 10;

/// Cascades longer than this are reported as suspicious (they still run to completion)
pub const LONG_CASCADE_WARN_ROUNDS: usize = 64;

/// Host tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Duration of the swap phase
pub const SWAP_PHASE_MS: u32 = 140;

/// Duration of the eliminate phase
pub const ELIMINATE_PHASE_MS: u32 = 200;

/// Duration of the refill phase
pub const REFILL_PHASE_MS: u32 = 240;

/// Duration of the single flat phase used when no swap pair is known
pub const FLAT_PHASE_MS: u32 = 240;

/// Scale an eliminated tile pops up to before it shrinks away
pub const ELIMINATE_POP_SCALE: f32 = 1.2;

/// Eliminate-phase progress at which the pop peaks
pub const ELIMINATE_POP_AT: f32 = 0.25;

/// Scale an eliminated tile shrinks towards before it disappears
pub const ELIMINATE_END_SCALE: f32 = 0.3;

/// Scale an inserted tile starts from before growing to full size
pub const INSERT_START_SCALE: f32 = 0.6;

/// Number of distinct tile kinds
pub const KIND_COUNT: usize = 4;


/// Opaque tile identity.
///
/// Assigned once by the board when a tile is created and never handed to a
/// different logical tile. Transition planning correlates snapshots by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four tile kinds
///
/// Kinds are named after the tetromino silhouettes drawn on the tiles:
/// - **OrangeRicky**: L-shaped, orange
/// - **BlueRicky**: J-shaped, blue
/// - **ClevelandZ**: Z-shaped, green
/// - **RhodeIslandZ**: S-shaped, red
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    OrangeRicky,
    BlueRicky,
    ClevelandZ,
    RhodeIslandZ,
}

impl TileKind {
    /// All kinds in draw order.
    pub const ALL: [TileKind; KIND_COUNT] = [
        TileKind::OrangeRicky,
        TileKind::BlueRicky,
        TileKind::ClevelandZ,
        TileKind::RhodeIslandZ,
    ];

    /// Parse a kind from its one-letter code (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::TileKind;
    ///
    /// assert_eq!(TileKind::from_str("o"), Some(TileKind::OrangeRicky));
    /// assert_eq!(TileKind::from_str("R"), Some(TileKind::RhodeIslandZ));
    /// assert_eq!(TileKind::from_str("t"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(TileKind::OrangeRicky),
            "b" => Some(TileKind::BlueRicky),
            "c" => Some(TileKind::ClevelandZ),
            "r" => Some(TileKind::RhodeIslandZ),
            _ => None,
        }
    }

    /// One-letter lowercase code
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::OrangeRicky => "o",
            TileKind::BlueRicky => "b",
            TileKind::ClevelandZ => "c",
            TileKind::RhodeIslandZ => "r",
        }
    }

    /// Position in [`TileKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            TileKind::OrangeRicky => 0,
            TileKind::BlueRicky => 1,
            TileKind::ClevelandZ => 2,
            TileKind::RhodeIslandZ => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// One board cell's content: an identity plus a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind) -> Self {
        Self { id, kind }
    }
}

/// How a tile participates in a phase.
///
/// The category also selects the easing curve the scheduler uses for the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCategory {
    /// Tile slides (or holds still) between two board indices
    Move,
    /// Tile pops and fades out in place
    Eliminate,
    /// Tile enters from off-board on the left
    Insert,
}

impl TransitionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionCategory::Move => "move",
            TransitionCategory::Eliminate => "eliminate",
            TransitionCategory::Insert => "insert",
        }
    }
}

/// Per-tile transition within one phase.
///
/// Indices are board positions and may lie outside `0..columns` for tiles
/// entering from (or leaving to) off-board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: TileId,
    pub kind: TileKind,
    pub category: TransitionCategory,
    pub from_index: i32,
    pub to_index: i32,
    pub from_alpha: f32,
    pub to_alpha: f32,
    pub from_scale: f32,
    pub to_scale: f32,
}

impl TransitionRecord {
    /// Fully visible tile moving between two indices (or held when they are equal).
    pub fn moving(tile: Tile, from_index: i32, to_index: i32) -> Self {
        Self {
            id: tile.id,
            kind: tile.kind,
            category: TransitionCategory::Move,
            from_index,
            to_index,
            from_alpha: 1.0,
            to_alpha: 1.0,
            from_scale: 1.0,
            to_scale: 1.0,
        }
    }

    /// Tile fading out at `index`, shrinking from full size. The scheduler
    /// adds the pop up to [`ELIMINATE_POP_SCALE`] on the way.
    pub fn eliminating(tile: Tile, index: i32) -> Self {
        Self {
            id: tile.id,
            kind: tile.kind,
            category: TransitionCategory::Eliminate,
            from_index: index,
            to_index: index,
            from_alpha: 1.0,
            to_alpha: 0.0,
            from_scale: 1.0,
            to_scale: ELIMINATE_END_SCALE,
        }
    }

    /// Tile fading in while sliding from `from_index` to `to_index`.
    pub fn inserting(tile: Tile, from_index: i32, to_index: i32) -> Self {
        Self {
            id: tile.id,
            kind: tile.kind,
            category: TransitionCategory::Insert,
            from_index,
            to_index,
            from_alpha: 0.0,
            to_alpha: 1.0,
            from_scale: INSERT_START_SCALE,
            to_scale: 1.0,
        }
    }

    /// True for a move record whose endpoints differ.
    pub fn is_displacing(&self) -> bool {
        self.category == TransitionCategory::Move && self.from_index != self.to_index
    }
}

/// Which stage of the visual story a phase tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Swap,
    Eliminate,
    Refill,
    /// Single-phase fallback synthesized straight from old to new
    Flat,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Swap => "swap",
            PhaseKind::Eliminate => "eliminate",
            PhaseKind::Refill => "refill",
            PhaseKind::Flat => "flat",
        }
    }
}

/// One stage of an animation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub records: Vec<TransitionRecord>,
    pub duration_ms: u32,
}

impl Phase {
    pub fn new(kind: PhaseKind, records: Vec<TransitionRecord>, duration_ms: u32) -> Self {
        Self {
            kind,
            records,
            duration_ms,
        }
    }

    /// Find the record for a tile id.
    pub fn record(&self, id: TileId) -> Option<&TransitionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn has_category(&self, category: TransitionCategory) -> bool {
        self.records.iter().any(|r| r.category == category)
    }
}

/// Interpolated on-screen state of one tile for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub id: TileId,
    pub kind: TileKind,
    /// Fractional board index
    pub position: f32,
    pub alpha: f32,
    pub scale: f32,
}

impl RenderState {
    /// Resting state of a tile at a board index.
    pub fn at_rest(tile: Tile, index: usize) -> Self {
        Self {
            id: tile.id,
            kind: tile.kind,
            position: index as f32,
            alpha: 1.0,
            scale: 1.0,
        }
    }
}

/// Reaction cue fired once at phase entry (consumed by the audio layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Eliminate,
    Refill,
    Move,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Eliminate => "eliminate",
            Cue::Refill => "refill",
            Cue::Move => "move",
        }
    }
}

/// Session mode.
///
/// - **Free**: endless play, never finishes
/// - **ScoreAttack**: score as much as possible before the timer runs out
/// - **SpeedRun**: reach the target score as fast as possible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GameMode {
    Free,
    ScoreAttack { duration_ms: u64 },
    SpeedRun { target_score: u32 },
}

impl GameMode {
    pub fn is_free(&self) -> bool {
        matches!(self, GameMode::Free)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Free => "free",
            GameMode::ScoreAttack { .. } => "score_attack",
            GameMode::SpeedRun { .. } => "speed_run",
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Free
    }
}
