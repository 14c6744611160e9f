//! Engine orchestrator: lifecycle and per-block sequencing.
//!
//! The engine is a two-state machine. [`Engine::prepare`] allocates every
//! buffer and filter for a fixed sample rate, maximum block size, and
//! channel count; [`Engine::release`] throws it all away. While prepared,
//! [`Engine::process`] runs the fixed pipeline on the caller's buffer in
//! place:
//!
//! ```text
//! input gain -> crossover split -> band compressors (low, mid, high)
//!            -> routing/summation -> output gain
//! ```
//!
//! `process` performs no heap allocation and is meant to be called from a
//! single real-time thread. Parameter snapshots arrive by value in
//! [`BlockParams`]; the engine never reaches into external parameter state.

use crate::band::CompressorBand;
use crate::crossover::Crossover;
use crate::gain::{DEFAULT_RAMP_MS, GainStage};
use crate::mix;
use crate::params::{Band, BlockParams, NUM_BANDS};
use thiserror::Error;
use tracing::debug;

/// Fail-fast configuration errors.
///
/// These indicate a programming error at the call site, not a runtime
/// condition: the block is rejected before any sample is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// `process` was called while the engine is unprepared.
    #[error("process called before prepare")]
    NotPrepared,
    /// The sample rate handed to `prepare` is unusable.
    #[error("invalid sample rate")]
    InvalidSampleRate,
    /// The block carries more channels than `prepare` was given.
    #[error("buffer has {got} channels, prepared for at most {max}")]
    TooManyChannels {
        /// Channels in the rejected buffer.
        got: usize,
        /// Channel count given to `prepare`.
        max: usize,
    },
    /// The block is longer than the prepared maximum.
    #[error("block of {got} frames exceeds prepared maximum {max}")]
    BlockTooLarge {
        /// Frames in the rejected buffer.
        got: usize,
        /// Maximum block size given to `prepare`.
        max: usize,
    },
    /// Channel slices within one block have different lengths.
    #[error("channel lengths differ within one block")]
    ChannelLengthMismatch,
}

/// Everything that exists only while the engine is prepared.
#[derive(Debug)]
struct Prepared {
    max_block: usize,
    num_channels: usize,
    crossover: Crossover,
    bands: [CompressorBand; NUM_BANDS],
    input_gain: GainStage,
    output_gain: GainStage,
    /// Per-band planar scratch: `[band][channel][frame]`, sized at prepare.
    band_buffers: [Vec<Vec<f32>>; NUM_BANDS],
}

/// Three-band dynamics engine.
///
/// # Example
///
/// ```rust
/// use tribanda_engine::{BlockParams, Engine};
///
/// let mut engine = Engine::new();
/// engine.prepare(48000.0, 512, 2).unwrap();
///
/// let mut left = vec![0.0f32; 512];
/// let mut right = vec![0.0f32; 512];
/// let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
///
/// engine.process(&mut channels, &BlockParams::default()).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    state: Option<Prepared>,
}

impl Engine {
    /// Create an unprepared engine.
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Allocate filters, gain ramps, and band scratch buffers.
    ///
    /// Idempotent: calling again drops the previous state and reallocates,
    /// which also resets all filter history and gain ramps.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block: usize,
        num_channels: usize,
    ) -> Result<(), EngineError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate);
        }

        let scratch = || vec![vec![0.0f32; max_block]; num_channels];
        self.state = Some(Prepared {
            max_block,
            num_channels,
            crossover: Crossover::new(sample_rate, num_channels),
            bands: core::array::from_fn(|_| CompressorBand::new(sample_rate, num_channels)),
            input_gain: GainStage::new(sample_rate, DEFAULT_RAMP_MS),
            output_gain: GainStage::new(sample_rate, DEFAULT_RAMP_MS),
            band_buffers: core::array::from_fn(|_| scratch()),
        });

        debug!(sample_rate, max_block, num_channels, "engine prepared");
        Ok(())
    }

    /// Drop all processing state, returning to Unprepared.
    pub fn release(&mut self) {
        if self.state.take().is_some() {
            debug!("engine released");
        }
    }

    /// True while the engine can process.
    pub fn is_prepared(&self) -> bool {
        self.state.is_some()
    }

    /// Deepest gain reduction of one band over the last block, in dB.
    ///
    /// `None` while unprepared.
    pub fn gain_reduction_db(&self, band: Band) -> Option<f32> {
        self.state
            .as_ref()
            .map(|st| st.bands[band as usize].gain_reduction_db())
    }

    /// Process one block in place.
    ///
    /// `buffer` is planar: one slice per channel, all equally long, at most
    /// the channel count and block size given to [`prepare`](Self::prepare).
    /// `params` is this block's immutable snapshot of all external controls.
    pub fn process(
        &mut self,
        buffer: &mut [&mut [f32]],
        params: &BlockParams,
    ) -> Result<(), EngineError> {
        let st = self.state.as_mut().ok_or(EngineError::NotPrepared)?;

        let num_channels = buffer.len();
        if num_channels > st.num_channels {
            return Err(EngineError::TooManyChannels {
                got: num_channels,
                max: st.num_channels,
            });
        }
        let frames = buffer.first().map_or(0, |ch| ch.len());
        if buffer.iter().any(|ch| ch.len() != frames) {
            return Err(EngineError::ChannelLengthMismatch);
        }
        if frames > st.max_block {
            return Err(EngineError::BlockTooLarge {
                got: frames,
                max: st.max_block,
            });
        }

        // One explicit settings step per block, then the audio path.
        st.crossover.set_cutoffs(&params.crossover);
        for (band, controller) in st.bands.iter_mut().enumerate() {
            controller.apply_params(&params.bands[band], params.routing[band]);
        }
        st.input_gain.set_target_db(params.input_gain_db);
        st.output_gain.set_target_db(params.output_gain_db);

        st.input_gain.process(buffer);

        let [low, mid, high] = &mut st.band_buffers;
        for (channel, io) in buffer.iter().enumerate() {
            st.crossover.split_channel(
                channel,
                io,
                &mut low[channel][..frames],
                &mut mid[channel][..frames],
                &mut high[channel][..frames],
            );
        }

        // Bands run sequentially in low, mid, high order; summation order
        // below matches, keeping output deterministic.
        let band_buffers: [&mut Vec<Vec<f32>>; NUM_BANDS] = [low, mid, high];
        for (controller, buffers) in st.bands.iter_mut().zip(band_buffers) {
            for channel in 0..num_channels {
                controller.process_channel(channel, &mut buffers[channel][..frames]);
            }
        }

        let included = mix::included_bands(&params.routing);
        for io in buffer.iter_mut() {
            io.fill(0.0);
        }
        let [low, mid, high] = &st.band_buffers;
        for (band, source) in [low, mid, high].into_iter().enumerate() {
            if included[band] {
                for (channel, io) in buffer.iter_mut().enumerate() {
                    mix::accumulate(io, &source[channel][..frames]);
                }
            }
        }

        st.output_gain.process(buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process_block(engine: &mut Engine, frames: usize, channels: usize) -> Result<(), EngineError> {
        let mut data = vec![vec![0.1f32; frames]; channels];
        let mut refs: Vec<&mut [f32]> = data.iter_mut().map(Vec::as_mut_slice).collect();
        engine.process(&mut refs, &BlockParams::default())
    }

    #[test]
    fn process_before_prepare_is_rejected() {
        let mut engine = Engine::new();
        assert_eq!(process_block(&mut engine, 64, 2), Err(EngineError::NotPrepared));
    }

    #[test]
    fn process_after_release_is_rejected() {
        let mut engine = Engine::new();
        engine.prepare(48000.0, 256, 2).unwrap();
        assert!(process_block(&mut engine, 64, 2).is_ok());
        engine.release();
        assert!(!engine.is_prepared());
        assert_eq!(process_block(&mut engine, 64, 2), Err(EngineError::NotPrepared));
    }

    #[test]
    fn bad_sample_rate_is_rejected() {
        let mut engine = Engine::new();
        assert_eq!(engine.prepare(0.0, 256, 2), Err(EngineError::InvalidSampleRate));
        assert_eq!(engine.prepare(-48000.0, 256, 2), Err(EngineError::InvalidSampleRate));
        assert_eq!(engine.prepare(f32::NAN, 256, 2), Err(EngineError::InvalidSampleRate));
        assert!(!engine.is_prepared());
    }

    #[test]
    fn oversized_blocks_are_rejected() {
        let mut engine = Engine::new();
        engine.prepare(48000.0, 256, 2).unwrap();
        assert_eq!(
            process_block(&mut engine, 257, 2),
            Err(EngineError::BlockTooLarge { got: 257, max: 256 })
        );
        assert_eq!(
            process_block(&mut engine, 64, 3),
            Err(EngineError::TooManyChannels { got: 3, max: 2 })
        );
    }

    #[test]
    fn mismatched_channel_lengths_are_rejected() {
        let mut engine = Engine::new();
        engine.prepare(48000.0, 256, 2).unwrap();

        let mut left = vec![0.0f32; 64];
        let mut right = vec![0.0f32; 63];
        let mut refs: Vec<&mut [f32]> = vec![&mut left, &mut right];
        assert_eq!(
            engine.process(&mut refs, &BlockParams::default()),
            Err(EngineError::ChannelLengthMismatch)
        );
    }

    #[test]
    fn fewer_channels_and_shorter_blocks_are_fine() {
        let mut engine = Engine::new();
        engine.prepare(48000.0, 256, 2).unwrap();
        assert!(process_block(&mut engine, 17, 1).is_ok());
        assert!(process_block(&mut engine, 0, 2).is_ok());
        assert!(process_block(&mut engine, 64, 0).is_ok());
    }

    #[test]
    fn prepare_is_idempotent() {
        let mut engine = Engine::new();
        engine.prepare(48000.0, 256, 2).unwrap();
        assert!(process_block(&mut engine, 256, 2).is_ok());
        engine.prepare(44100.0, 128, 1).unwrap();
        assert_eq!(
            process_block(&mut engine, 256, 1),
            Err(EngineError::BlockTooLarge { got: 256, max: 128 })
        );
        assert!(process_block(&mut engine, 128, 1).is_ok());
    }

    #[test]
    fn gain_reduction_meter_follows_lifecycle() {
        let mut engine = Engine::new();
        assert_eq!(engine.gain_reduction_db(Band::Low), None);
        engine.prepare(48000.0, 256, 1).unwrap();
        assert_eq!(engine.gain_reduction_db(Band::Low), Some(0.0));
        engine.release();
        assert_eq!(engine.gain_reduction_db(Band::Low), None);
    }

    #[test]
    fn silent_input_stays_silent() {
        let mut engine = Engine::new();
        engine.prepare(48000.0, 128, 2).unwrap();

        let mut data = vec![vec![0.0f32; 128]; 2];
        let mut refs: Vec<&mut [f32]> = data.iter_mut().map(Vec::as_mut_slice).collect();
        engine.process(&mut refs, &BlockParams::default()).unwrap();
        for channel in &data {
            assert!(channel.iter().all(|&x| x == 0.0));
        }
    }
}
