//! Scoring module - points for cascade rounds
//!
//! Every matched position is worth [`POINTS_PER_TILE`], regardless of run
//! length or cascade depth. A run of five is one match event of five positions.

use crate::types::POINTS_PER_TILE;

/// Points for one cascade round with `matched` positions.
pub fn calculate_round_score(matched: usize) -> u32 {
    (matched as u32).saturating_mul(POINTS_PER_TILE)
}

/// Points for a whole cascade, given the matched count of each round.
pub fn calculate_cascade_score(rounds: &[usize]) -> u32 {
    rounds
        .iter()
        .fold(0u32, |acc, &m| acc.saturating_add(calculate_round_score(m)))
}
