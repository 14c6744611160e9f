//! Feed-forward compressor for one band.
//!
//! Per sample: the envelope follower tracks the rectified band level, the
//! gain computer converts the overshoot above threshold into a dB gain
//! reduction of `overshoot * (1 - 1/ratio)`, and the reduction is applied
//! multiplicatively to the same sample. No look-ahead, no delay line.
//!
//! Channels compress independently: each channel has its own envelope
//! follower, so a hot left channel does not duck the right.

use crate::params::BandSettings;
use tribanda_core::{EnvelopeFollower, db_to_linear, linear_to_db};

/// Threshold clamp range in dB, matching the exposed control range.
const THRESHOLD_RANGE_DB: (f32, f32) = (-60.0, 12.0);

/// Attack/release clamp range in milliseconds.
const TIME_RANGE_MS: (f32, f32) = (0.1, 500.0);

/// Ratio clamp range.
const RATIO_RANGE: (f32, f32) = (1.0, 100.0);

/// Clamp a snapshot value, substituting the fallback for non-finite input.
fn sanitize(value: f32, range: (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(range.0, range.1)
    } else {
        fallback
    }
}

/// Hard-knee gain computer.
#[derive(Debug, Clone, Copy)]
struct GainComputer {
    threshold_db: f32,
    ratio: f32,
}

impl GainComputer {
    fn new() -> Self {
        Self {
            threshold_db: 0.0,
            ratio: 3.0,
        }
    }

    /// Gain to apply in dB, always <= 0.
    #[inline]
    fn compute_gain_db(&self, input_db: f32) -> f32 {
        let overshoot = input_db - self.threshold_db;
        if overshoot <= 0.0 {
            0.0
        } else {
            -(overshoot * (1.0 - 1.0 / self.ratio))
        }
    }
}

/// One band's dynamics processor.
///
/// Created at prepare time with the channel count fixed; settings are
/// re-applied from a [`BandSettings`] snapshot every block.
#[derive(Debug, Clone)]
pub struct BandCompressor {
    envelopes: Vec<EnvelopeFollower>,
    gain_computer: GainComputer,
    attack_ms: f32,
    release_ms: f32,
    /// Deepest reduction per channel in the most recent block.
    last_reduction_db: Vec<f32>,
}

impl BandCompressor {
    /// Create a compressor with default settings for `num_channels` channels.
    pub fn new(sample_rate: f32, num_channels: usize) -> Self {
        let defaults = BandSettings::default();
        let mut comp = Self {
            envelopes: vec![EnvelopeFollower::new(sample_rate); num_channels],
            gain_computer: GainComputer::new(),
            attack_ms: 0.0,
            release_ms: 0.0,
            last_reduction_db: vec![0.0; num_channels],
        };
        comp.apply_settings(&defaults);
        comp
    }

    /// Apply a per-block settings snapshot.
    ///
    /// Values are clamped to control range; envelope coefficients are only
    /// recomputed when the times actually changed.
    pub fn apply_settings(&mut self, settings: &BandSettings) {
        let defaults = BandSettings::default();

        let attack = sanitize(settings.attack_ms, TIME_RANGE_MS, defaults.attack_ms);
        if attack != self.attack_ms {
            self.attack_ms = attack;
            for env in &mut self.envelopes {
                env.set_attack_ms(attack);
            }
        }

        let release = sanitize(settings.release_ms, TIME_RANGE_MS, defaults.release_ms);
        if release != self.release_ms {
            self.release_ms = release;
            for env in &mut self.envelopes {
                env.set_release_ms(release);
            }
        }

        self.gain_computer.threshold_db = sanitize(
            settings.threshold_db,
            THRESHOLD_RANGE_DB,
            defaults.threshold_db,
        );
        self.gain_computer.ratio = sanitize(settings.ratio, RATIO_RANGE, defaults.ratio);
    }

    /// Compress one channel's band buffer in place.
    #[inline]
    pub fn process_channel(&mut self, channel: usize, buffer: &mut [f32]) {
        let computer = self.gain_computer;
        let env = &mut self.envelopes[channel];

        let mut deepest_db = 0.0f32;
        for sample in buffer.iter_mut() {
            let level_db = linear_to_db(env.process(*sample));
            let gain_db = computer.compute_gain_db(level_db);
            deepest_db = deepest_db.min(gain_db);
            *sample *= db_to_linear(gain_db);
        }
        self.last_reduction_db[channel] = deepest_db;
    }

    /// Deepest gain reduction in dB across all channels in the most recent
    /// block (always <= 0). For metering.
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_reduction_db.iter().fold(0.0f32, |a, &b| a.min(b))
    }

    /// Clear envelope and meter state on all channels.
    pub fn reset(&mut self) {
        for env in &mut self.envelopes {
            env.reset();
        }
        for reduction in &mut self.last_reduction_db {
            *reduction = 0.0;
        }
    }
}
