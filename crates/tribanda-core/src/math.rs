//! Level conversion and numeric-safety helpers.
//!
//! Everything here is allocation-free and `no_std`-suitable. The engine uses
//! these conversions on both sides of the gain computer: envelope levels go
//! linear → dB for the threshold comparison, and the resulting gain reduction
//! goes dB → linear before it multiplies the signal.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// 0 dB → 1.0, -6.02 dB → 0.5, +6.02 dB → 2.0.
///
/// # Example
/// ```rust
/// use tribanda_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// The input is floored at 1e-10 so silence maps to a large negative dB
/// value rather than -inf.
///
/// # Example
/// ```rust
/// use tribanda_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Flush denormal values to zero.
///
/// Denormals below ~1e-15 trigger slow microcode paths on most CPUs.
/// Recursive filters and envelope decays produce them when fed silence;
/// flushing in the feedback path keeps the audio thread at full speed.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}
