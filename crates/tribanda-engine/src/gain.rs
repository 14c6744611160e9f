//! Smoothed gain stage for input and output trim.

use tribanda_core::GainRamp;

/// Gain control range in dB.
pub const GAIN_MIN_DB: f32 = -24.0;

/// Maximum gain in dB.
pub const GAIN_MAX_DB: f32 = 24.0;

/// Default ramp window in milliseconds.
pub const DEFAULT_RAMP_MS: f32 = 50.0;

/// A ramped scalar gain applied to a planar multi-channel block.
///
/// One ramp drives all channels: the gain advances once per sample frame and
/// every channel of that frame is scaled by the same value, so the stereo
/// image never tilts during a ramp. Used twice by the engine - before the
/// crossover and after the mix.
#[derive(Debug, Clone)]
pub struct GainStage {
    ramp: GainRamp,
}

impl GainStage {
    /// Create a gain stage at unity with the given ramp window.
    pub fn new(sample_rate: f32, ramp_ms: f32) -> Self {
        Self {
            ramp: GainRamp::new(sample_rate, ramp_ms),
        }
    }

    /// Set the gain target in dB, clamped to the control range.
    ///
    /// Non-finite targets are ignored; the stage keeps ramping toward its
    /// previous target.
    pub fn set_target_db(&mut self, db: f32) {
        if db.is_finite() {
            self.ramp.set_target_db(db.clamp(GAIN_MIN_DB, GAIN_MAX_DB));
        }
    }

    /// Current gain target in dB.
    pub fn target_db(&self) -> f32 {
        self.ramp.target_db()
    }

    /// Apply the (possibly still-ramping) gain to a planar block in place.
    ///
    /// `buffer` holds one slice per channel, all the same length. The ramp
    /// advances by the block's frame count regardless of channel count.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let frames = buffer.first().map_or(0, |ch| ch.len());
        for i in 0..frames {
            let gain = self.ramp.advance();
            for channel in buffer.iter_mut() {
                channel[i] *= gain;
            }
        }
    }

    /// Snap to the target, cancelling any ramp. Used at prepare time.
    pub fn snap_to_db(&mut self, db: f32) {
        self.ramp.set_immediate_db(db.clamp(GAIN_MIN_DB, GAIN_MAX_DB));
    }
}
