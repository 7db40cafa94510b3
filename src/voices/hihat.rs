//! Hi-hat, closed and open.
//!
//! Broadband noise alone sounds like hiss; detuned square waves add the
//! inharmonic, metallic ring of two cymbals. A steep 7 kHz high-pass keeps
//! only the sizzle. The closed hat is choked after ~40 ms, the open hat
//! rings for ~300 ms.
//!
//! # How It Works
//!
//! 1. Gaussian noise
//! 2. Plus square partials at 300, 540 and 800 Hz (0.2 each)
//! 3. High-pass at 7 kHz
//! 4. Exponential decay (closed or open)
//! 5. Peak-normalized

use std::f32::consts::TAU;

use crate::dsp::{
    envelope::{apply_decay, sample_time},
    NoiseSource, SpectralFilter,
};

use super::buffer::{duration_to_samples, finish, SampleBuffer};

/// Square partials that give the hat its metallic body.
const METALLIC_PARTIALS_HZ: [f32; 3] = [300.0, 540.0, 800.0];

#[derive(Debug, Clone, Copy)]
pub struct HatParams {
    pub duration_secs: f32,
    pub decay_secs: f32,
    pub highpass_hz: f32,
    pub partial_level: f32,
}

impl HatParams {
    pub fn closed() -> Self {
        Self {
            duration_secs: 0.08,
            decay_secs: 0.04,
            highpass_hz: 7000.0,
            partial_level: 0.2,
        }
    }

    pub fn open() -> Self {
        Self {
            duration_secs: 0.4,
            decay_secs: 0.3,
            ..Self::closed()
        }
    }

    pub fn new(open: bool) -> Self {
        if open {
            Self::open()
        } else {
            Self::closed()
        }
    }
}

impl Default for HatParams {
    fn default() -> Self {
        Self::closed()
    }
}

/// Sign of a sine cycle: +1, -1, or 0 exactly on a zero crossing.
#[inline]
fn square(phase: f32) -> f32 {
    let s = phase.sin();
    if s > 0.0 {
        1.0
    } else if s < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Render a hi-hat.
pub fn hihat(params: &HatParams, sample_rate: u32, noise: &mut NoiseSource) -> SampleBuffer {
    let len = duration_to_samples(params.duration_secs, sample_rate);
    let sr = sample_rate as f32;

    let mut signal = noise.gaussian_vec(len);
    for (i, sample) in signal.iter_mut().enumerate() {
        let t = sample_time(i, sr);
        for &freq in &METALLIC_PARTIALS_HZ {
            *sample += square(TAU * freq * t) * params.partial_level;
        }
    }

    let mut signal = SpectralFilter::highpass(params.highpass_hz).apply(&signal, sr);
    apply_decay(&mut signal, sr, params.decay_secs);

    finish(signal, sample_rate)
}

/// Closed hi-hat with default parameters.
pub fn closed_hat(sample_rate: u32, noise: &mut NoiseSource) -> SampleBuffer {
    hihat(&HatParams::closed(), sample_rate, noise)
}

/// Open hi-hat with default parameters.
pub fn open_hat(sample_rate: u32, noise: &mut NoiseSource) -> SampleBuffer {
    hihat(&HatParams::open(), sample_rate, noise)
}
