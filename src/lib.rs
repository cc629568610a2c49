//! TUI Match-3 (workspace facade crate).
//!
//! Re-exports the implementation crates under `crates/` as
//! `tui_match3::{types,core,engine,session,input,term}`.

pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_input as input;
pub use tui_match3_session as session;
pub use tui_match3_term as term;
pub use tui_match3_types as types;
