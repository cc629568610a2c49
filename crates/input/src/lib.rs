//! Terminal input module (session-facing).
//!
//! Maps `crossterm` key events into board [`Command`]s and tracks the keyboard
//! [`Cursor`] that stands in for a pointer on the single board row. It knows
//! nothing about the session; the host decides what a command does.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::{Cursor, Direction};
pub use map::{map_key, should_quit, Command};
