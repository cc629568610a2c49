//! Transition engine - planning and playback of board mutations
//!
//! The board reports mutations as before/after [`Snapshot`](core::Snapshot)s.
//! This crate turns such a pair into something a viewer can watch:
//!
//! - [`planner`]: correlates snapshots by tile id and builds a [`Plan`] of up to
//!   three phases (swap, eliminate, refill) or a single flat phase
//! - [`scheduler`]: plays a plan against a [`Clock`], emitting eased
//!   [`RenderState`](types::RenderState)s per tick and one cue per phase
//! - [`easing`]: the cubic curves used per transition category
//! - [`clock`] and [`cue`]: the injectable time source and reaction-cue sink
//!
//! Nothing here performs I/O or reads the wall clock unless handed a
//! [`SystemClock`].
//!
//! # Example
//!
//! ```
//! use tui_match3_engine::{plan, AnimationScheduler, ManualClock};
//! use tui_match3_engine::core::{Board, ScriptedKinds};
//! use tui_match3_engine::types::{Cue, TileKind::{BlueRicky as B, ClevelandZ as C, OrangeRicky as O, RhodeIslandZ as R}};
//!
//! let mut board = Board::from_kinds(&[O, B, B, C, B, R], ScriptedKinds::new([C, R, C]));
//! let before = board.tiles();
//! assert!(board.attempt_swap(3, 4));
//! let after = board.tiles();
//!
//! let clock = ManualClock::new(0);
//! let mut scheduler = AnimationScheduler::new(clock.clone(), Vec::<Cue>::new());
//! scheduler.start(plan(&before, &after, Some((3, 4))));
//!
//! // A late tick ends the swap and shows the eliminate phase from its start.
//! scheduler.tick(10_000);
//! assert_eq!(scheduler.phase_index(), Some(1));
//!
//! // Two more late ticks: refill starts, then the final frame settles with the
//! // three survivors and the three new tiles.
//! scheduler.tick(20_000);
//! let settled = scheduler.tick(30_000).len();
//! assert_eq!(settled, 6);
//! assert!(!scheduler.is_active());
//! assert_eq!(scheduler.sink(), &vec![Cue::Move, Cue::Eliminate, Cue::Refill]);
//! ```

pub mod clock;
pub mod cue;
pub mod easing;
pub mod planner;
pub mod scheduler;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cue::{cue_for, CueSink, FnSink, NullSink};
pub use easing::{ease, ease_in_cubic, ease_in_out_cubic, ease_out_cubic, lerp, pop_scale};
pub use planner::{plan, IdentityDiff, Plan, PlanTimings, Planner};
pub use scheduler::{AnimationScheduler, SchedulerState};
