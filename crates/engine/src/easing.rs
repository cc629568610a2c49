//! Easing curves, one per transition category.
//!
//! All curves map `[0, 1]` onto `[0, 1]` monotonically with `f(0) = 0` and `f(1) = 1`.

use crate::types::{TransitionCategory, ELIMINATE_POP_AT, ELIMINATE_POP_SCALE};

/// Slow start, fast middle, slow end. Used for moves.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Fast start, slow end. Used for inserts.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Slow start, fast end. Used for eliminations.
pub fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

/// Apply the curve of a category to linear progress `t` (clamped to `[0, 1]`).
pub fn ease(category: TransitionCategory, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match category {
        TransitionCategory::Move => ease_in_out_cubic(t),
        TransitionCategory::Insert => ease_out_cubic(t),
        TransitionCategory::Eliminate => ease_in_cubic(t),
    }
}

/// Scale of an eliminated tile at linear progress `t`.
///
/// Grows from `from` to [`ELIMINATE_POP_SCALE`] by [`ELIMINATE_POP_AT`]
/// (ease out), then shrinks to `to` for the rest of the phase (ease in).
pub fn pop_scale(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < ELIMINATE_POP_AT {
        lerp(from, ELIMINATE_POP_SCALE, ease_out_cubic(t / ELIMINATE_POP_AT))
    } else {
        let rest = (t - ELIMINATE_POP_AT) / (1.0 - ELIMINATE_POP_AT);
        lerp(ELIMINATE_POP_SCALE, to, ease_in_cubic(rest))
    }
}

/// `from + (to - from) * t`
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
