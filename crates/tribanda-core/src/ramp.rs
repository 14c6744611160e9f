//! Linear gain ramp for click-free gain staging.
//!
//! Gain changes applied as a step produce audible clicks. [`GainRamp`]
//! interpolates the linear gain over a fixed window instead: targets are set
//! in dB, the per-sample value advances at a constant rate, and the ramp
//! lands on the target exactly at the end of the window.

use crate::{db_to_linear, linear_to_db};

/// Smoothed scalar gain with dB targets and linear-domain interpolation.
///
/// The ramp window is fixed at construction. Re-targeting mid-ramp restarts
/// a full window from the current value; re-setting the same target is a
/// no-op, so per-block target refreshes do not perpetually restart the ramp.
///
/// # Example
///
/// ```rust
/// use tribanda_core::GainRamp;
///
/// let mut ramp = GainRamp::new(48000.0, 50.0);
/// ramp.set_target_db(-6.0);
/// for _ in 0..2400 {
///     ramp.advance();
/// }
/// assert!((ramp.current_db() - (-6.0)).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct GainRamp {
    /// Current linear gain.
    current: f32,
    /// Target linear gain.
    target: f32,
    /// Per-sample increment while ramping.
    increment: f32,
    /// Samples left until the target is reached.
    samples_remaining: u32,
    sample_rate: f32,
    ramp_ms: f32,
}

impl GainRamp {
    /// Create a ramp at unity gain with the given window in milliseconds.
    pub fn new(sample_rate: f32, ramp_ms: f32) -> Self {
        Self {
            current: 1.0,
            target: 1.0,
            increment: 0.0,
            samples_remaining: 0,
            sample_rate,
            ramp_ms,
        }
    }

    /// Set a new target in dB, ramping from the current value.
    pub fn set_target_db(&mut self, db: f32) {
        let target = db_to_linear(db);
        if (target - self.target).abs() < 1e-9 {
            return;
        }
        self.target = target;

        let samples = (self.ramp_ms / 1000.0 * self.sample_rate) as u32;
        if samples == 0 {
            self.current = target;
            self.increment = 0.0;
            self.samples_remaining = 0;
        } else {
            self.increment = (target - self.current) / samples as f32;
            self.samples_remaining = samples;
        }
    }

    /// Jump straight to a gain in dB, cancelling any ramp in progress.
    pub fn set_immediate_db(&mut self, db: f32) {
        let gain = db_to_linear(db);
        self.current = gain;
        self.target = gain;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }

    /// Advance one sample and return the gain to apply to that frame.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                // Land on the exact target, not within rounding of it.
                self.current = self.target;
            }
        }
        self.current
    }

    /// Current linear gain without advancing.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Current gain in dB without advancing.
    pub fn current_db(&self) -> f32 {
        linear_to_db(self.current)
    }

    /// Target gain in dB.
    pub fn target_db(&self) -> f32 {
        linear_to_db(self.target)
    }

    /// True once the ramp has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }
}
