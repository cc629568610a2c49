//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board rules: tile identity, run detection, cascade
//! resolution and scoring. It has **zero dependencies** on UI, timing or I/O,
//! making it:
//!
//! - **Deterministic**: the same kind source produces identical games
//! - **Testable**: scenario boards can be built tile by tile
//! - **Identity-preserving**: tile ids survive compaction, so snapshots can be diffed
//!
//! # Module Structure
//!
//! - [`board`]: the single-row board, swap validation and cascade resolution
//! - [`rng`]: injectable kind sources (seeded LCG and scripted sequences)
//! - [`scoring`]: points per cascade round
//! - [`snapshot`]: immutable row copies for the transition planner
//!
//! # Game Rules
//!
//! - **Swap**: only adjacent tiles, and only if the swap creates a run of three or more
//! - **Cascade**: matched tiles vanish, survivors slide right, new tiles enter on the left,
//!   repeated until no run remains
//! - **Scoring**: 10 points per matched position per cascade round
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Board, ScriptedKinds};
//! use tui_match3_core::types::TileKind::{BlueRicky as B, ClevelandZ as C, OrangeRicky as O, RhodeIslandZ as R};
//!
//! let mut board = Board::from_kinds(&[O, B, B, C, B, R], ScriptedKinds::new([C, R, C]));
//! let before = board.tiles();
//!
//! assert!(board.attempt_swap(3, 4));
//! assert_eq!(board.score(), 30);
//! assert_eq!(board.tiles().len(), before.len());
//! ```

pub mod board;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::{find_matches, find_runs, has_match, Board};
pub use rng::{KindSource, RandomKinds, ScriptedKinds, SimpleRng};
pub use scoring::{calculate_cascade_score, calculate_round_score};
pub use snapshot::Snapshot;
