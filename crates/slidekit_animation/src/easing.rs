//! Easing curves
//!
//! Curves map normalized progress `t ∈ [0, 1]` to eased progress. The scroll
//! animator uses [`Easing::EaseInOutSine`], whose value form is
//! `v(t) = -Δ/2 · (cos(π·t/d) − 1) + from`.

use std::f32::consts::PI;

/// Easing function
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    EaseInSine,
    EaseOutSine,
    #[default]
    EaseInOutSine,
}

impl Easing {
    /// Apply to normalized progress (clamped to `[0, 1]`)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }

    /// Value at `elapsed` ms of a `duration` ms move from `from` by `delta`
    pub fn value_at(&self, elapsed: f32, from: f32, delta: f32, duration: f32) -> f32 {
        if duration <= 0.0 {
            return from + delta;
        }
        from + delta * self.apply(elapsed / duration)
    }
}

/// Sine ease-in-out in value form (unclamped in time)
pub fn ease_in_out_sine(elapsed: f32, from: f32, delta: f32, duration: f32) -> f32 {
    -delta / 2.0 * ((PI * elapsed / duration).cos() - 1.0) + from
}
