//! Session controller - rounds, selection and locks around one board
//!
//! The session is the host-facing owner of a [`Board`], a [`Planner`] and an
//! [`AnimationScheduler`]. It turns taps into swaps, keeps round timing for the
//! timed modes, and tells subscribers when something changed.
//!
//! # Round lifecycle
//!
//! | Mode | After `configure` | Finishes when |
//! |------|-------------------|---------------|
//! | `Free` | running | never |
//! | `ScoreAttack` | idle until `start_round` | elapsed ≥ duration |
//! | `SpeedRun` | idle until `start_round` | score ≥ target |
//!
//! A finished round stops its timer, clears locks and selection, and rejects
//! further interaction until the next `start_round` or `configure`.
//!
//! # Subscriptions
//!
//! Subscribers are plain callbacks keyed by a [`SubscriptionToken`]. They stay
//! registered until [`Session::unsubscribe`] is called with their token.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{validate_mode, ConfigError, SessionConfig};
use crate::core::{Board, Snapshot};
use crate::engine::{AnimationScheduler, Clock, CueSink, NullSink, Planner};
use crate::types::{GameMode, RenderState};

/// Point-in-time view of the round for status lines and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub mode: GameMode,
    pub score: u32,
    pub elapsed_ms: u64,
    /// Score attack only.
    pub remaining_ms: Option<u64>,
    /// Speed run only.
    pub target_score: Option<u32>,
    pub running: bool,
    pub finished: bool,
}

/// What subscribers are told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Board, selection, locks or timing changed.
    Changed,
    /// The round just finished; carries the final status.
    Finished(SessionStatus),
}

/// Handle returned by [`Session::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionToken(u64);

type Subscriber = Box<dyn FnMut(&SessionEvent)>;

/// One player's game: board, animation and round state.
pub struct Session<C, S = NullSink> {
    config: SessionConfig,
    board: Board,
    planner: Planner,
    scheduler: AnimationScheduler<C, S>,
    mode: GameMode,
    /// Boards built so far; mixed into the seed of the next one.
    boards_built: u32,
    round_start_ms: u64,
    stopped_elapsed_ms: u64,
    running: bool,
    finished: bool,
    /// Whole second the round clock last showed; `Changed` fires when it moves.
    shown_second: Option<u64>,
    locked: BTreeSet<usize>,
    selected: Option<usize>,
    subscribers: BTreeMap<SubscriptionToken, Subscriber>,
    next_token: u64,
}

impl<C: Clock, S: CueSink> Session<C, S> {
    /// Build a session in the configured mode.
    pub fn new(config: SessionConfig, clock: C, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let now = clock.now_ms();
        Ok(Self {
            board: Board::new(config.columns, config.seed),
            planner: Planner::new(config.timings),
            scheduler: AnimationScheduler::new(clock, sink),
            mode: config.mode,
            boards_built: 1,
            round_start_ms: now,
            stopped_elapsed_ms: 0,
            running: config.mode.is_free(),
            finished: false,
            shown_second: None,
            locked: BTreeSet::new(),
            selected: None,
            subscribers: BTreeMap::new(),
            next_token: 0,
            config,
        })
    }

    /// Switch mode with a fresh board. Timed modes wait for [`start_round`](Self::start_round).
    pub fn configure(&mut self, mode: GameMode) -> Result<(), ConfigError> {
        validate_mode(mode)?;
        self.mode = mode;
        self.reset_board();
        self.stopped_elapsed_ms = 0;
        self.running = mode.is_free();
        self.finished = false;
        info!(mode = mode.as_str(), "session configured");
        self.notify(SessionEvent::Changed);
        Ok(())
    }

    /// Start a timed round on a fresh board. No-op in free mode.
    pub fn start_round(&mut self) {
        if self.mode.is_free() {
            return;
        }
        self.reset_board();
        self.stopped_elapsed_ms = 0;
        self.running = true;
        self.finished = false;
        info!(mode = self.mode.as_str(), "round started");
        self.notify(SessionEvent::Changed);
    }

    /// Tap-to-select: tapping the selection clears it, tapping a neighbour
    /// of the selection swaps, anything else becomes the selection.
    pub fn handle_tap(&mut self, index: usize) {
        if index >= self.board.columns() || !self.can_interact() {
            return;
        }

        if let Some(selected) = self.selected {
            if selected == index {
                self.selected = None;
                self.notify(SessionEvent::Changed);
                return;
            }
            if selected.abs_diff(index) == 1 {
                self.perform_swap(selected, index);
                return;
            }
        }

        self.selected = Some(index);
        self.notify(SessionEvent::Changed);
    }

    /// Swap two adjacent unlocked tiles and animate the result.
    ///
    /// Returns whether the board kept the swap. A rejected swap starts no
    /// animation but still clears the selection.
    pub fn perform_swap(&mut self, from: usize, to: usize) -> bool {
        let columns = self.board.columns();
        if from.abs_diff(to) != 1 || from.max(to) >= columns || !self.can_interact() {
            return false;
        }
        if self.locked.contains(&from) || self.locked.contains(&to) {
            debug!(from, to, "swap blocked by lock");
            return false;
        }

        self.locked.insert(from);
        self.locked.insert(to);
        let before = self.board.tiles();
        let accepted = self.board.attempt_swap(from, to);
        if accepted {
            let after = self.board.tiles();
            let plan = self.planner.plan(&before, &after, Some((from, to)));
            debug!(
                from,
                to,
                score = self.board.score(),
                rounds = self.board.last_cascade().len(),
                phases = plan.len(),
                "swap kept"
            );
            self.scheduler.start(plan);
        } else {
            debug!(from, to, "swap rejected");
        }
        self.locked.remove(&from);
        self.locked.remove(&to);
        self.selected = None;

        let now = self.now();
        self.refresh_finished(now);
        self.notify(SessionEvent::Changed);
        accepted
    }

    /// Hold an index so swaps cannot touch it.
    pub fn lock(&mut self, index: usize) -> bool {
        if index >= self.board.columns() || !self.can_interact() {
            return false;
        }
        if !self.locked.insert(index) {
            return false;
        }
        self.notify(SessionEvent::Changed);
        true
    }

    pub fn unlock(&mut self, index: usize) {
        if self.locked.remove(&index) {
            self.notify(SessionEvent::Changed);
        }
    }

    pub fn is_locked(&self, index: usize) -> bool {
        self.locked.contains(&index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn locked(&self) -> &BTreeSet<usize> {
        &self.locked
    }

    /// Advance round timing and the animation to `now_ms`.
    ///
    /// A running timed round notifies `Changed` only when the round finishes
    /// or the clock it shows ticks over to another whole second.
    pub fn tick(&mut self, now_ms: u64) -> &[RenderState] {
        if !self.mode.is_free() && self.running {
            self.refresh_finished(now_ms);
            let status = self.status(now_ms);
            let second = status.remaining_ms.unwrap_or(status.elapsed_ms).div_ceil(1_000);
            if self.finished || self.shown_second != Some(second) {
                self.shown_second = Some(second);
                self.notify(SessionEvent::Changed);
            }
        }
        self.scheduler.tick(now_ms)
    }

    /// Status at `now_ms`, as of the last finish check.
    pub fn status(&self, now_ms: u64) -> SessionStatus {
        let elapsed_ms = if self.running {
            now_ms.saturating_sub(self.round_start_ms)
        } else {
            self.stopped_elapsed_ms
        };

        let (remaining_ms, target_score) = match self.mode {
            GameMode::Free => (None, None),
            GameMode::ScoreAttack { duration_ms } => {
                let remaining = if self.running || self.finished {
                    duration_ms.saturating_sub(elapsed_ms)
                } else {
                    duration_ms
                };
                (Some(remaining), None)
            }
            GameMode::SpeedRun { target_score } => (None, Some(target_score)),
        };

        SessionStatus {
            mode: self.mode,
            score: self.board.score(),
            elapsed_ms,
            remaining_ms,
            target_score,
            running: self.running,
            finished: self.finished,
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&SessionEvent) + 'static) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.subscribers.insert(token, Box::new(callback));
        token
    }

    /// Remove a subscriber. Returns false for unknown or already removed tokens.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.subscribers.remove(&token).is_some()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current row.
    pub fn tiles(&self) -> Snapshot {
        self.board.tiles()
    }

    pub fn columns(&self) -> usize {
        self.board.columns()
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &AnimationScheduler<C, S> {
        &self.scheduler
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn now(&self) -> u64 {
        self.scheduler.clock().now_ms()
    }

    fn reset_board(&mut self) {
        let seed = self.config.seed.wrapping_add(self.boards_built);
        self.boards_built = self.boards_built.wrapping_add(1);
        self.board = Board::new(self.config.columns, seed);
        self.scheduler.start(Default::default());
        self.locked.clear();
        self.selected = None;
        self.shown_second = None;
        self.round_start_ms = self.now();
    }

    fn can_interact(&mut self) -> bool {
        let now = self.now();
        self.refresh_finished(now);
        if self.mode.is_free() {
            !self.finished
        } else {
            self.running && !self.finished
        }
    }

    /// Re-evaluate the finish condition; notifies `Finished` on the transition.
    fn refresh_finished(&mut self, now_ms: u64) {
        if self.mode.is_free() {
            self.finished = false;
            return;
        }
        if !self.running {
            return;
        }

        let elapsed = now_ms.saturating_sub(self.round_start_ms);
        self.finished = match self.mode {
            GameMode::Free => false,
            GameMode::ScoreAttack { duration_ms } => elapsed >= duration_ms,
            GameMode::SpeedRun { target_score } => self.board.score() >= target_score,
        };

        if self.finished {
            self.running = false;
            self.stopped_elapsed_ms = elapsed;
            self.locked.clear();
            self.selected = None;
            let status = self.status(now_ms);
            info!(
                mode = self.mode.as_str(),
                score = status.score,
                elapsed_ms = status.elapsed_ms,
                "round finished"
            );
            self.notify(SessionEvent::Finished(status));
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        for callback in self.subscribers.values_mut() {
            callback(&event);
        }
    }
}

impl<C, S> fmt::Debug for Session<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("score", &self.board.score())
            .field("running", &self.running)
            .field("finished", &self.finished)
            .field("locked", &self.locked)
            .field("selected", &self.selected)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
