//! Reaction cues: which sound a phase triggers, and where it goes.

use crate::types::{Cue, Phase, TransitionCategory};

/// Receiver of reaction cues (the audio layer, a log, a test recorder).
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CueSink for NullSink {
    fn play(&mut self, _cue: Cue) {}
}

/// Records cues in order.
impl CueSink for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(Cue)> CueSink for FnSink<F> {
    fn play(&mut self, cue: Cue) {
        (self.0)(cue)
    }
}

impl<T: CueSink + ?Sized> CueSink for Box<T> {
    fn play(&mut self, cue: Cue) {
        (**self).play(cue)
    }
}

/// The single cue a phase fires at entry, by priority:
/// eliminate, then refill (any insert), then move (any displacing move), else none.
pub fn cue_for(phase: &Phase) -> Option<Cue> {
    if phase.has_category(TransitionCategory::Eliminate) {
        Some(Cue::Eliminate)
    } else if phase.has_category(TransitionCategory::Insert) {
        Some(Cue::Refill)
    } else if phase.records.iter().any(|r| r.is_displacing()) {
        Some(Cue::Move)
    } else {
        None
    }
}
