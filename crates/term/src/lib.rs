//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the board row is drawn into a plain
//! framebuffer of styled cells, which the renderer then diffs and flushes to
//! the terminal. No widget toolkit is involved.
//!
//! - [`fb`]: cells, colours and the framebuffer itself
//! - [`board_view`]: render states and session status to cells (pure)
//! - [`renderer`]: crossterm output with changed-run diffing

pub mod board_view;
pub mod fb;
pub mod renderer;

pub use tui_match3_engine as engine;
pub use tui_match3_session as session;
pub use tui_match3_types as types;

pub use board_view::{
    kind_color, resting_states, AnchorY, BoardFrame, BoardView, Viewport, MAX_CELL_W,
};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, TerminalRenderer};
