//! Splitting/routing correctness through the full engine.
//!
//! With every compressor bypassed and unity gain, the engine is just the
//! crossover plus routing, so its output is checkable against explicit
//! filter references: the all-band sum must equal the input passed through
//! the crossover's two allpass responses, and single-band routing must
//! equal a standalone crossover's band output exactly.

use tribanda_core::{BUTTERWORTH_Q, Biquad, BiquadCoefficients};
use tribanda_engine::{Band, BlockParams, Crossover, CrossoverSpec, Engine};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK: usize = 512;

/// Deterministic pseudo-random test signal in [-1, 1].
fn noise(len: usize, mut seed: u32) -> Vec<f32> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            (seed >> 8) as f32 / (1 << 23) as f32 - 1.0
        })
        .collect()
}

/// Params with all compressors bypassed and unity gain.
fn transparent_params() -> BlockParams {
    let mut params = BlockParams::default();
    for band in Band::ALL {
        params.routing[band as usize].bypassed = true;
    }
    params
}

/// Run `input` through a prepared engine in BLOCK-sized chunks, in place.
fn run_engine(engine: &mut Engine, input: &[f32], params: &BlockParams) -> Vec<f32> {
    let mut output = input.to_vec();
    for chunk in output.chunks_mut(BLOCK) {
        let mut channels: Vec<&mut [f32]> = vec![chunk];
        engine.process(&mut channels, params).unwrap();
    }
    output
}

/// The input through both crossover allpass responses - the phase-rotated
/// reference the all-band sum must reproduce.
fn allpass_reference(input: &[f32], spec: &CrossoverSpec) -> Vec<f32> {
    let mut ap_low_mid = Biquad::new();
    ap_low_mid.set_coefficients(BiquadCoefficients::allpass(
        spec.low_mid_hz,
        BUTTERWORTH_Q,
        SAMPLE_RATE,
    ));
    let mut ap_mid_high = Biquad::new();
    ap_mid_high.set_coefficients(BiquadCoefficients::allpass(
        spec.mid_high_hz,
        BUTTERWORTH_Q,
        SAMPLE_RATE,
    ));
    input
        .iter()
        .map(|&x| ap_mid_high.process(ap_low_mid.process(x)))
        .collect()
}

/// A standalone crossover's three band outputs for the same input.
fn band_reference(input: &[f32], spec: &CrossoverSpec) -> [Vec<f32>; 3] {
    let mut crossover = Crossover::new(SAMPLE_RATE, 1);
    crossover.set_cutoffs(spec);
    let mut low = vec![0.0; input.len()];
    let mut mid = vec![0.0; input.len()];
    let mut high = vec![0.0; input.len()];
    crossover.split_channel(0, input, &mut low, &mut mid, &mut high);
    [low, mid, high]
}

#[test]
fn bypassed_engine_reconstructs_input() {
    let mut engine = Engine::new();
    engine.prepare(SAMPLE_RATE, BLOCK, 1).unwrap();

    let params = transparent_params();
    let input = noise(8 * BLOCK, 0xfeed);
    let output = run_engine(&mut engine, &input, &params);
    let reference = allpass_reference(&input, &params.crossover);

    // -60 dB error budget relative to full scale.
    let max_err = output
        .iter()
        .zip(reference.iter())
        .map(|(o, r)| (o - r).abs())
        .fold(0.0f32, f32::max);
    assert!(
        max_err < 1e-3,
        "reconstruction error {max_err} exceeds -60 dB budget"
    );
}

#[test]
fn reconstruction_holds_for_moved_cutoffs() {
    let mut engine = Engine::new();
    engine.prepare(SAMPLE_RATE, BLOCK, 1).unwrap();

    let mut params = transparent_params();
    params.crossover = CrossoverSpec {
        low_mid_hz: 120.0,
        mid_high_hz: 8000.0,
    };
    let input = noise(8 * BLOCK, 0xabcd);
    let output = run_engine(&mut engine, &input, &params);
    let reference = allpass_reference(&input, &params.crossover);

    let max_err = output
        .iter()
        .zip(reference.iter())
        .map(|(o, r)| (o - r).abs())
        .fold(0.0f32, f32::max);
    assert!(max_err < 1e-3, "reconstruction error {max_err}");
}

#[test]
fn muting_all_but_one_band_isolates_it() {
    let input = noise(4 * BLOCK, 0x1234);
    let params_base = transparent_params();
    let references = band_reference(&input, &params_base.crossover);

    for keep in Band::ALL {
        let mut engine = Engine::new();
        engine.prepare(SAMPLE_RATE, BLOCK, 1).unwrap();

        let mut params = params_base;
        for band in Band::ALL {
            params.routing[band as usize].muted = band != keep;
        }
        let output = run_engine(&mut engine, &input, &params);

        assert_eq!(
            output,
            references[keep as usize],
            "band {keep:?} in isolation must equal the raw crossover output"
        );
    }
}

#[test]
fn solo_overrides_mute() {
    let input = noise(4 * BLOCK, 0x5555);
    let mut params = transparent_params();
    // Low is soloed AND muted; mid is muted; high is clean but unsoloed.
    params.routing[Band::Low as usize].soloed = true;
    params.routing[Band::Low as usize].muted = true;
    params.routing[Band::Mid as usize].muted = true;

    let mut engine = Engine::new();
    engine.prepare(SAMPLE_RATE, BLOCK, 1).unwrap();
    let output = run_engine(&mut engine, &input, &params);

    let references = band_reference(&input, &params.crossover);
    assert_eq!(
        output,
        references[Band::Low as usize],
        "soloed band must pass despite its own mute; unsoloed bands must not"
    );
}

#[test]
fn two_solos_sum_both_bands() {
    let input = noise(4 * BLOCK, 0x9999);
    let mut params = transparent_params();
    params.routing[Band::Low as usize].soloed = true;
    params.routing[Band::High as usize].soloed = true;
    params.routing[Band::Mid as usize].muted = false;

    let mut engine = Engine::new();
    engine.prepare(SAMPLE_RATE, BLOCK, 1).unwrap();
    let output = run_engine(&mut engine, &input, &params);

    let [low, _, high] = band_reference(&input, &params.crossover);
    let expected: Vec<f32> = low.iter().zip(high.iter()).map(|(l, h)| l + h).collect();
    assert_eq!(output, expected);
}

#[test]
fn all_muted_is_silence() {
    let input = noise(4 * BLOCK, 0x4242);
    let mut params = transparent_params();
    for band in Band::ALL {
        params.routing[band as usize].muted = true;
    }

    let mut engine = Engine::new();
    engine.prepare(SAMPLE_RATE, BLOCK, 1).unwrap();
    let output = run_engine(&mut engine, &input, &params);
    assert!(
        output.iter().all(|&x| x == 0.0),
        "all-muted output must be exactly silent"
    );
}

#[test]
fn stereo_channels_match_mono_processing() {
    let input = noise(4 * BLOCK, 0x7777);
    let params = transparent_params();

    let mut mono = Engine::new();
    mono.prepare(SAMPLE_RATE, BLOCK, 1).unwrap();
    let mono_out = run_engine(&mut mono, &input, &params);

    let mut stereo = Engine::new();
    stereo.prepare(SAMPLE_RATE, BLOCK, 2).unwrap();
    let mut left = input.clone();
    let mut right = input.clone();
    for (l, r) in left.chunks_mut(BLOCK).zip(right.chunks_mut(BLOCK)) {
        let mut channels: Vec<&mut [f32]> = vec![l, r];
        stereo.process(&mut channels, &params).unwrap();
    }

    assert_eq!(left, mono_out);
    assert_eq!(right, mono_out, "identical channels must process identically");
}
