//! Three-band Linkwitz-Riley crossover network.
//!
//! Two cascaded 2-way splits partition the spectrum:
//!
//! ```text
//!          +-- LR4 lowpass (low-mid) --- allpass (mid-high) ---------> low
//! input ---+
//!          +-- LR4 highpass (low-mid) -+-- LR4 lowpass (mid-high) ---> mid
//!                                      +-- LR4 highpass (mid-high) --> high
//! ```
//!
//! Each LR4 branch is two cascaded Butterworth biquads, so a
//! lowpass/highpass pair at the same cutoff sums to a second-order allpass
//! response. Running the low path through that same allpass at the mid-high
//! cutoff phase-aligns it with the mid+high sum: adding all three bands back
//! together reproduces the input through two allpass rotations, with flat
//! magnitude.
//!
//! Five filter stages per channel, all retuned in one step by
//! [`Crossover::set_cutoffs`] at the start of a block. Filter history is
//! never reset on retune, so smooth cutoff automation stays click-free.

use crate::params::CrossoverSpec;
use tribanda_core::{BUTTERWORTH_Q, Biquad, BiquadCoefficients};

/// Lowest accepted cutoff in Hz.
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Highest accepted cutoff in Hz (further limited near Nyquist).
pub const MAX_CUTOFF_HZ: f32 = 20000.0;

/// Clamp a cutoff into the numerically safe range for this sample rate.
///
/// Non-finite input falls back to the low end of the range; anything else is
/// clamped to `[20, min(20000, 0.49 * sample_rate)]`. Inverted cutoff pairs
/// are deliberately not reordered - the spectrum split degrades gracefully
/// and that is the caller's problem to automate away.
fn clamp_cutoff(frequency: f32, sample_rate: f32) -> f32 {
    // At very low sample rates the Nyquist limit undercuts 20 Hz; the floor
    // gives way so the clamp range never inverts.
    let max = MAX_CUTOFF_HZ.min(sample_rate * 0.49);
    let min = MIN_CUTOFF_HZ.min(max);
    if frequency.is_finite() {
        frequency.clamp(min, max)
    } else {
        min
    }
}

/// 4th-order Linkwitz-Riley branch: two cascaded Butterworth sections.
#[derive(Debug, Clone)]
struct Lr4 {
    stages: [Biquad; 2],
}

impl Lr4 {
    fn new() -> Self {
        Self {
            stages: [Biquad::new(), Biquad::new()],
        }
    }

    fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        for stage in &mut self.stages {
            stage.set_coefficients(coeffs);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let first = self.stages[0].process(input);
        self.stages[1].process(first)
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

/// The five filter stages for one audio channel.
#[derive(Debug, Clone)]
struct ChannelSplitter {
    /// Stage 1 lowpass at the low-mid cutoff.
    low_lp: Lr4,
    /// Stage 1 highpass at the low-mid cutoff.
    low_hp: Lr4,
    /// Phase compensator on the low path, matched to the mid-high cutoff.
    phase_ap: Biquad,
    /// Stage 2 lowpass at the mid-high cutoff.
    high_lp: Lr4,
    /// Stage 2 highpass at the mid-high cutoff.
    high_hp: Lr4,
}

impl ChannelSplitter {
    fn new() -> Self {
        Self {
            low_lp: Lr4::new(),
            low_hp: Lr4::new(),
            phase_ap: Biquad::new(),
            high_lp: Lr4::new(),
            high_hp: Lr4::new(),
        }
    }

    #[inline]
    fn split(&mut self, input: f32) -> (f32, f32, f32) {
        let raw_low = self.low_lp.process(input);
        let raw_high = self.low_hp.process(input);

        let low = self.phase_ap.process(raw_low);
        let mid = self.high_lp.process(raw_high);
        let high = self.high_hp.process(raw_high);

        (low, mid, high)
    }

    fn reset(&mut self) {
        self.low_lp.reset();
        self.low_hp.reset();
        self.phase_ap.reset();
        self.high_lp.reset();
        self.high_hp.reset();
    }
}

/// Crossover network for all channels of one engine instance.
///
/// Coefficients are computed once per [`set_cutoffs`](Self::set_cutoffs)
/// call and shared across channels; filter state is per channel.
#[derive(Debug, Clone)]
pub struct Crossover {
    channels: Vec<ChannelSplitter>,
    sample_rate: f32,
}

impl Crossover {
    /// Create a crossover for `num_channels` channels at `sample_rate`.
    ///
    /// Starts with passthrough coefficients; call
    /// [`set_cutoffs`](Self::set_cutoffs) before splitting.
    pub fn new(sample_rate: f32, num_channels: usize) -> Self {
        Self {
            channels: vec![ChannelSplitter::new(); num_channels],
            sample_rate,
        }
    }

    /// Retune all five stages from the spec. One call per block.
    pub fn set_cutoffs(&mut self, spec: &CrossoverSpec) {
        let low_mid = clamp_cutoff(spec.low_mid_hz, self.sample_rate);
        let mid_high = clamp_cutoff(spec.mid_high_hz, self.sample_rate);

        let lp1 = BiquadCoefficients::lowpass(low_mid, BUTTERWORTH_Q, self.sample_rate);
        let hp1 = BiquadCoefficients::highpass(low_mid, BUTTERWORTH_Q, self.sample_rate);
        let ap2 = BiquadCoefficients::allpass(mid_high, BUTTERWORTH_Q, self.sample_rate);
        let lp2 = BiquadCoefficients::lowpass(mid_high, BUTTERWORTH_Q, self.sample_rate);
        let hp2 = BiquadCoefficients::highpass(mid_high, BUTTERWORTH_Q, self.sample_rate);

        for channel in &mut self.channels {
            channel.low_lp.set_coefficients(lp1);
            channel.low_hp.set_coefficients(hp1);
            channel.phase_ap.set_coefficients(ap2);
            channel.high_lp.set_coefficients(lp2);
            channel.high_hp.set_coefficients(hp2);
        }
    }

    /// Split one channel's block into the three band buffers.
    ///
    /// All four slices must have the same length. The band buffers are
    /// overwritten, never accumulated into.
    pub fn split_channel(
        &mut self,
        channel: usize,
        input: &[f32],
        low: &mut [f32],
        mid: &mut [f32],
        high: &mut [f32],
    ) {
        debug_assert_eq!(input.len(), low.len());
        debug_assert_eq!(input.len(), mid.len());
        debug_assert_eq!(input.len(), high.len());

        let splitter = &mut self.channels[channel];
        for i in 0..input.len() {
            let (l, m, h) = splitter.split(input[i]);
            low[i] = l;
            mid[i] = m;
            high[i] = h;
        }
    }

    /// Number of channels this crossover was built for.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Clear all filter history.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
    }
}
