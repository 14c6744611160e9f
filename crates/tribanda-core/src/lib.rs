//! Tribanda Core - DSP primitives for the multiband dynamics engine
//!
//! The building blocks the engine crate assembles into a three-band
//! compressor: filter sections for the crossover, an envelope follower for
//! the compressor sidechain, and a gain ramp for click-free gain staging.
//! Everything is allocation-free and safe to run inside a real-time audio
//! callback.
//!
//! # Contents
//!
//! - [`Biquad`] / [`BiquadCoefficients`] - Direct Form I second-order section
//!   with RBJ lowpass, highpass, and allpass coefficient constructors
//! - [`EnvelopeFollower`] - peak level tracking with attack/release
//! - [`GainRamp`] - linear gain interpolation with dB targets
//! - [`db_to_linear`] / [`linear_to_db`] / [`flush_denormal`] - level math
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets. Disable the
//! default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tribanda-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod envelope;
pub mod math;
pub mod ramp;

pub use biquad::{BUTTERWORTH_Q, Biquad, BiquadCoefficients};
pub use envelope::EnvelopeFollower;
pub use math::{db_to_linear, flush_denormal, linear_to_db};
pub use ramp::GainRamp;
