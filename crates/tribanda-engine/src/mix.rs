//! Band routing policy and summation.
//!
//! The routing decision is global: it looks at all three bands' flags before
//! any samples move. Solo is a focus operation - as soon as any band is
//! soloed, the mix is exactly the soloed set and mute flags are ignored for
//! the block. With no solo active, every unmuted band contributes. An empty
//! result is valid and yields silence.

use crate::params::{BandRouting, NUM_BANDS};

/// Decide which bands reach the mix for this block.
pub fn included_bands(routing: &[BandRouting; NUM_BANDS]) -> [bool; NUM_BANDS] {
    let any_solo = routing.iter().any(|r| r.soloed);

    let mut included = [false; NUM_BANDS];
    for (slot, r) in included.iter_mut().zip(routing.iter()) {
        *slot = if any_solo { r.soloed } else { !r.muted };
    }
    included
}

/// Add one band's channel buffer into the output channel buffer.
///
/// Accumulates, never overwrites: the caller clears the output once per
/// block and then sums every included band through here.
#[inline]
pub fn accumulate(output: &mut [f32], band: &[f32]) {
    debug_assert_eq!(output.len(), band.len());
    for (out, sample) in output.iter_mut().zip(band.iter()) {
        *out += sample;
    }
}
