//! Band controller: one compressor plus routing flags.

use crate::compressor::BandCompressor;
use crate::params::{BandRouting, BandSettings};

/// One band of the multiband pipeline.
///
/// Owns the band's [`BandCompressor`] and the routing flags the mixer
/// consults. `bypassed` short-circuits the compression math here; `muted`
/// and `soloed` are only stored, the routing decision itself lives in
/// [`crate::mix`] because it is global across bands.
#[derive(Debug, Clone)]
pub struct CompressorBand {
    compressor: BandCompressor,
    routing: BandRouting,
}

impl CompressorBand {
    /// Create a band for `num_channels` channels at `sample_rate`.
    pub fn new(sample_rate: f32, num_channels: usize) -> Self {
        Self {
            compressor: BandCompressor::new(sample_rate, num_channels),
            routing: BandRouting::default(),
        }
    }

    /// Apply this block's settings and routing snapshot.
    pub fn apply_params(&mut self, settings: &BandSettings, routing: BandRouting) {
        self.compressor.apply_settings(settings);
        self.routing = routing;
    }

    /// Process one channel's band buffer in place.
    ///
    /// When bypassed the buffer passes through untouched; the call still
    /// completes normally so block sequencing is identical either way.
    #[inline]
    pub fn process_channel(&mut self, channel: usize, buffer: &mut [f32]) {
        if self.routing.bypassed {
            return;
        }
        self.compressor.process_channel(channel, buffer);
    }

    /// Routing flags for the current block.
    pub fn routing(&self) -> BandRouting {
        self.routing
    }

    /// Deepest gain reduction across channels in the last block, in dB.
    pub fn gain_reduction_db(&self) -> f32 {
        self.compressor.gain_reduction_db()
    }

    /// Clear compressor state.
    pub fn reset(&mut self) {
        self.compressor.reset();
    }
}
