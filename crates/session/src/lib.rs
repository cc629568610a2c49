//! Session layer - the game as a host sees it
//!
//! - [`controller`]: [`Session`], which wires a board, the planner and the
//!   animation scheduler together and adds modes, selection, locks and
//!   subscriptions
//! - [`config`]: [`SessionConfig`] and its validation
//! - [`records`]: the per-mode leaderboard ([`RecordStore`])
//!
//! Clock, cue sink and record store are all handed in by the host.

pub mod config;
pub mod controller;
pub mod records;

pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_types as types;

pub use config::{validate_mode, ConfigError, SessionConfig};
pub use controller::{Session, SessionEvent, SessionStatus, SubscriptionToken};
pub use records::{ModeRecord, RecordError, RecordScope, RecordStore, MAX_RECORDS_PER_SCOPE};
