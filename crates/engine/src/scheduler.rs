//! Animation scheduler - turns a plan into per-tick render states
//!
//! The scheduler is a two-state machine driven by the host tick:
//!
//! ```text
//!   Idle ──start(plan)──▶ Running{0} ──phase done──▶ Running{1} ── … ──▶ Idle
//!    ▲                                                                    │
//!    └──────────────────── final phase settled ───────────────────────────┘
//! ```
//!
//! Every tick interpolates each record of the current phase with the easing
//! curve of its category. When a phase completes, the next one starts its own
//! clock at the tick that noticed the end and is drawn from its first frame, so
//! a slow host tick delays the story but never skips a phase. Each phase fires
//! at most one [`Cue`](crate::types::Cue) on entry.

use tracing::{debug, trace};

use crate::clock::Clock;
use crate::cue::{cue_for, CueSink, NullSink};
use crate::easing::{ease, lerp, pop_scale};
use crate::planner::Plan;
use crate::types::{Phase, RenderState, TransitionCategory};

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running {
        phase: usize,
    },
}

/// Drives one plan at a time against an injected clock and cue sink.
pub struct AnimationScheduler<C, S = NullSink> {
    clock: C,
    sink: S,
    plan: Plan,
    state: SchedulerState,
    phase_start_ms: u64,
    frame: Vec<RenderState>,
}

impl<C: Clock> AnimationScheduler<C, NullSink> {
    /// Scheduler whose cues go nowhere.
    pub fn with_clock(clock: C) -> Self {
        Self::new(clock, NullSink)
    }
}

impl<C: Clock, S: CueSink> AnimationScheduler<C, S> {
    pub fn new(clock: C, sink: S) -> Self {
        Self {
            clock,
            sink,
            plan: Plan::new(),
            state: SchedulerState::Idle,
            phase_start_ms: 0,
            frame: Vec::new(),
        }
    }

    /// Begin playing `plan`, replacing anything in flight.
    ///
    /// An empty plan leaves the scheduler idle and fires nothing.
    pub fn start(&mut self, plan: Plan) {
        if self.is_active() {
            debug!(phase = self.phase_index(), "replacing in-flight plan");
        }
        self.plan = plan;
        self.frame.clear();
        if self.plan.is_empty() {
            self.state = SchedulerState::Idle;
            return;
        }
        self.phase_start_ms = self.clock.now_ms();
        self.enter(0);
    }

    /// Render states for `now_ms`.
    ///
    /// Idle yields an empty slice. A tick that completes a phase enters the
    /// next one and renders it at zero progress (zero-length phases are passed
    /// straight through). The tick that completes the final phase yields the
    /// settled frame, after which the scheduler is idle.
    pub fn tick(&mut self, now_ms: u64) -> &[RenderState] {
        self.frame.clear();
        while let SchedulerState::Running { phase } = self.state {
            let current = &self.plan[phase];
            let duration = current.duration_ms;
            let raw = progress(now_ms.saturating_sub(self.phase_start_ms), duration);

            if raw < 1.0 {
                interpolate(current, raw, &mut self.frame);
                break;
            }

            if phase + 1 < self.plan.len() {
                self.phase_start_ms = now_ms;
                self.enter(phase + 1);
                continue;
            }

            interpolate(current, 1.0, &mut self.frame);
            self.plan.clear();
            self.state = SchedulerState::Idle;
            trace!("plan settled");
        }
        &self.frame
    }

    /// [`tick`](Self::tick) at the clock's current time.
    pub fn tick_now(&mut self) -> &[RenderState] {
        let now = self.clock.now_ms();
        self.tick(now)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Index of the running phase, if any.
    pub fn phase_index(&self) -> Option<usize> {
        match self.state {
            SchedulerState::Running { phase } => Some(phase),
            SchedulerState::Idle => None,
        }
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.phase_index().map(|i| &self.plan[i])
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn enter(&mut self, phase: usize) {
        self.state = SchedulerState::Running { phase };
        let current = &self.plan[phase];
        let cue = cue_for(current);
        trace!(phase, kind = current.kind.as_str(), records = current.records.len(), cue = ?cue, "phase entered");
        if let Some(cue) = cue {
            self.sink.play(cue);
        }
    }
}

/// Linear phase progress in `[0, 1]`; a zero-length phase is already complete.
fn progress(elapsed_ms: u64, duration_ms: u32) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f64 / f64::from(duration_ms)).min(1.0) as f32
}

fn interpolate(phase: &Phase, raw: f32, out: &mut Vec<RenderState>) {
    out.extend(phase.records.iter().map(|r| {
        let e = ease(r.category, raw);
        let scale = match r.category {
            TransitionCategory::Eliminate => pop_scale(r.from_scale, r.to_scale, raw),
            _ => lerp(r.from_scale, r.to_scale, e),
        };
        RenderState {
            id: r.id,
            kind: r.kind,
            position: lerp(r.from_index as f32, r.to_index as f32, e),
            alpha: lerp(r.from_alpha, r.to_alpha, e),
            scale,
        }
    }));
}
