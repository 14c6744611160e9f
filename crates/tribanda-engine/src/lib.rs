//! Tribanda Engine - real-time three-band dynamics processing
//!
//! Splits an audio stream into low/mid/high bands with a phase-compensated
//! Linkwitz-Riley crossover, compresses each band independently, and
//! recombines them with per-band mute/solo/bypass routing and ramped
//! input/output gain. Built to run inside a host audio callback: prepare
//! once, then process blocks with no allocation, no blocking, and no
//! cross-block state beyond filter history and ramp position.
//!
//! # Pipeline
//!
//! ```text
//! input gain -> crossover -> [low comp | mid comp | high comp]
//!            -> solo/mute routing + summation -> output gain
//! ```
//!
//! # Usage
//!
//! ```rust
//! use tribanda_engine::{Band, BlockParams, Engine};
//!
//! let mut engine = Engine::new();
//! engine.prepare(48000.0, 512, 2).unwrap();
//!
//! // Snapshot external controls once per block.
//! let mut params = BlockParams::default();
//! params.crossover.low_mid_hz = 250.0;
//! params.crossover.mid_high_hz = 3000.0;
//! params.bands[Band::Low as usize].threshold_db = -18.0;
//! params.bands[Band::Low as usize].ratio = 4.0;
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
//! engine.process(&mut channels, &params).unwrap();
//! ```
//!
//! The parameter layer (host automation, persistence, UI) is out of scope;
//! [`BlockParams`] is the entire interface to it.

pub mod band;
pub mod compressor;
pub mod crossover;
pub mod engine;
pub mod gain;
pub mod mix;
pub mod params;

pub use band::CompressorBand;
pub use compressor::BandCompressor;
pub use crossover::{Crossover, MAX_CUTOFF_HZ, MIN_CUTOFF_HZ};
pub use engine::{Engine, EngineError};
pub use gain::{DEFAULT_RAMP_MS, GAIN_MAX_DB, GAIN_MIN_DB, GainStage};
pub use mix::{accumulate, included_bands};
pub use params::{
    Band, BandRouting, BandSettings, BlockParams, CrossoverSpec, NUM_BANDS, RATIO_CHOICES,
    snap_ratio,
};
