//! RNG module - injectable tile kind sources
//!
//! The board never draws kinds on its own; it asks a [`KindSource`]. Two sources
//! are provided:
//!
//! - [`RandomKinds`]: uniform draws over all kinds from a seeded LCG
//! - [`ScriptedKinds`]: a fixed kind sequence, for scenario tests and replays

use std::collections::VecDeque;

use crate::types::{TileKind, KIND_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits: the low bits of a power-of-two LCG cycle with a
    /// short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u32() >> 16) % max
    }

    /// Current internal state (restarting from it replays the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Source of tile kinds for initial fill, normalization and refill.
pub trait KindSource {
    /// Draw the next kind.
    fn next_kind(&mut self) -> TileKind;
}

impl<F: FnMut() -> TileKind> KindSource for F {
    fn next_kind(&mut self) -> TileKind {
        self()
    }
}

/// Uniform random kinds backed by [`SimpleRng`].
#[derive(Debug, Clone)]
pub struct RandomKinds {
    rng: SimpleRng,
}

impl RandomKinds {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl Default for RandomKinds {
    fn default() -> Self {
        Self::new(1)
    }
}

impl KindSource for RandomKinds {
    fn next_kind(&mut self) -> TileKind {
        let idx = self.rng.next_range(KIND_COUNT as u32) as usize;
        TileKind::ALL[idx]
    }
}

/// Replays a fixed sequence of kinds.
///
/// Once the script is exhausted it keeps cycling through [`TileKind::ALL`],
/// so a board refilled past the end of the script stays well-defined.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKinds {
    script: VecDeque<TileKind>,
    fallback: usize,
}

impl ScriptedKinds {
    pub fn new(kinds: impl IntoIterator<Item = TileKind>) -> Self {
        Self {
            script: kinds.into_iter().collect(),
            fallback: 0,
        }
    }

    /// Parse one-letter codes, e.g. `"obbcbr"`. Unknown letters are skipped.
    pub fn from_codes(codes: &str) -> Self {
        Self::new(
            codes
                .chars()
                .filter_map(|c| TileKind::from_str(&c.to_string())),
        )
    }

    /// Kinds still queued in the script.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl KindSource for ScriptedKinds {
    fn next_kind(&mut self) -> TileKind {
        if let Some(kind) = self.script.pop_front() {
            return kind;
        }
        let kind = TileKind::ALL[self.fallback % KIND_COUNT];
        self.fallback += 1;
        kind
    }
}
