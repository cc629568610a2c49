//! Session configuration and its validation.

use crate::engine::PlanTimings;
use crate::types::{GameMode, DEFAULT_COLUMNS, MAX_COLUMNS, MIN_COLUMNS};

/// Everything needed to build a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Board width.
    pub columns: usize,
    /// Seed of the first round's board; later rounds derive from it.
    pub seed: u32,
    pub mode: GameMode,
    pub timings: PlanTimings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            seed: 1,
            mode: GameMode::Free,
            timings: PlanTimings::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            return Err(ConfigError::ColumnsOutOfRange(self.columns));
        }
        validate_mode(self.mode)
    }
}

/// Mode parameters must be positive.
pub fn validate_mode(mode: GameMode) -> Result<(), ConfigError> {
    match mode {
        GameMode::ScoreAttack { duration_ms: 0 } => Err(ConfigError::ZeroDuration),
        GameMode::SpeedRun { target_score: 0 } => Err(ConfigError::ZeroTarget),
        _ => Ok(()),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Board width outside the supported range.
    #[error("columns must be between {min} and {max}, got {0}", min = MIN_COLUMNS, max = MAX_COLUMNS)]
    ColumnsOutOfRange(usize),

    #[error("score attack duration must be positive")]
    ZeroDuration,

    #[error("speed run target score must be positive")]
    ZeroTarget,
}
