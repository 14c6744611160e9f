//! Per-block parameter snapshot types.
//!
//! The engine never reads a host parameter store. The caller assembles one
//! [`BlockParams`] before each block - typically from lock-free reads of an
//! externally owned automation layer - and passes it by reference into
//! [`Engine::process`](crate::Engine::process). Values are not validated
//! here beyond what each consumer clamps for numeric safety; a degenerate
//! snapshot degrades the sound, never the process.

/// Number of frequency bands. Fixed by the crossover topology.
pub const NUM_BANDS: usize = 3;

/// Band identifier, usable as an index into per-band arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Below the low-mid crossover.
    Low = 0,
    /// Between the two crossovers.
    Mid = 1,
    /// Above the mid-high crossover.
    High = 2,
}

impl Band {
    /// All bands in processing (and summation) order.
    pub const ALL: [Band; NUM_BANDS] = [Band::Low, Band::Mid, Band::High];
}

/// The two crossover cutoff frequencies in Hz.
///
/// Expected ordering is `20 <= low_mid_hz < mid_high_hz <= 20000`. Out-of-order
/// values are accepted: band energy distribution becomes meaningless but the
/// filters stay finite (cutoffs are clamped inside the crossover).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverSpec {
    /// Split point between the low and mid bands.
    pub low_mid_hz: f32,
    /// Split point between the mid and high bands.
    pub mid_high_hz: f32,
}

impl Default for CrossoverSpec {
    fn default() -> Self {
        Self {
            low_mid_hz: 400.0,
            mid_high_hz: 2000.0,
        }
    }
}

/// One band's compressor settings, snapshotted for a single block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSettings {
    /// Envelope attack time in milliseconds.
    pub attack_ms: f32,
    /// Envelope release time in milliseconds.
    pub release_ms: f32,
    /// Compression threshold in dBFS.
    pub threshold_db: f32,
    /// Compression ratio, dimensionless, >= 1.
    pub ratio: f32,
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            attack_ms: 50.0,
            release_ms: 250.0,
            threshold_db: 0.0,
            ratio: 3.0,
        }
    }
}

/// One band's routing flags, snapshotted for a single block.
///
/// `bypassed` disables the compression math only. `muted` and `soloed` feed
/// the global routing decision in [`crate::mix`]; they never affect what the
/// band computes, only whether its output reaches the mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandRouting {
    /// Skip the compressor, leaving the band signal untouched.
    pub bypassed: bool,
    /// Exclude this band from the mix (unless any band is soloed).
    pub muted: bool,
    /// If any band is soloed, only soloed bands reach the mix.
    pub soloed: bool,
}

/// Immutable snapshot of every externally owned control, read once per block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockParams {
    /// Crossover cutoffs.
    pub crossover: CrossoverSpec,
    /// Per-band compressor settings, indexed by [`Band`].
    pub bands: [BandSettings; NUM_BANDS],
    /// Per-band routing flags, indexed by [`Band`].
    pub routing: [BandRouting; NUM_BANDS],
    /// Input gain target in dB, applied before the split.
    pub input_gain_db: f32,
    /// Output gain target in dB, applied after the mix.
    pub output_gain_db: f32,
}

/// The ratio values exposed by a typical host control.
///
/// Hosts that present ratio as a stepped control can snap to this table with
/// [`snap_ratio`]; the engine itself takes any `f32 >= 1`.
pub const RATIO_CHOICES: [f32; 14] = [
    1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 15.0, 20.0, 50.0, 100.0,
];

/// Snap an arbitrary ratio to the nearest entry of [`RATIO_CHOICES`].
pub fn snap_ratio(ratio: f32) -> f32 {
    let mut best = RATIO_CHOICES[0];
    let mut best_dist = (ratio - best).abs();
    for &choice in &RATIO_CHOICES[1..] {
        let dist = (ratio - choice).abs();
        if dist < best_dist {
            best = choice;
            best_dist = dist;
        }
    }
    best
}
