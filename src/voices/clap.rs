//! Clap voice - layered hand clap.
//!
//! A real clap is several hands hitting within a few milliseconds of each
//! other. We fake that with four short noise bursts spaced ~12 ms apart,
//! then let the whole thing die away over ~200 ms like a small room.
//!
//! # How It Works
//!
//! 1. Gaussian noise, high-passed at 1.2 kHz (removes low thump)
//! 2. Burst envelope: four `e^(-t/5ms)` spikes started every 12 ms,
//!    summed and normalized to a peak of 1
//! 3. Overall `e^(-t/200ms)` decay
//! 4. Peak-normalized
//!
//! # Variations
//!
//! - More bursts or wider spacing = bigger "crowd" clap
//! - Longer overall decay = more reverberant room feel

use crate::dsp::{
    envelope::{apply_decay, exp_decay},
    mix, NoiseSource, SpectralFilter,
};

use super::buffer::{duration_to_samples, finish, SampleBuffer};

#[derive(Debug, Clone, Copy)]
pub struct ClapParams {
    pub duration_secs: f32,
    pub bursts: usize,
    pub burst_spacing_secs: f32,
    pub burst_decay_secs: f32,
    pub decay_secs: f32,
    pub highpass_hz: f32,
}

impl Default for ClapParams {
    fn default() -> Self {
        Self {
            duration_secs: 0.4,
            bursts: 4,
            burst_spacing_secs: 0.012,
            burst_decay_secs: 0.005,
            decay_secs: 0.2,
            highpass_hz: 1200.0,
        }
    }
}

/// Overlapping exponential bursts, normalized to peak 1.
fn burst_envelope(params: &ClapParams, len: usize, sample_rate: u32) -> Vec<f32> {
    let decay_samples = params.burst_decay_secs * sample_rate as f32;
    let mut env = vec![0.0f32; len];

    for burst in 0..params.bursts {
        let start = (burst as f32 * params.burst_spacing_secs * sample_rate as f32) as usize;
        if start >= len {
            break;
        }
        for (n, level) in env[start..].iter_mut().enumerate() {
            *level += exp_decay(n as f32, decay_samples);
        }
    }

    mix::normalize(&mut env);
    env
}

/// Render a hand clap.
pub fn clap(params: &ClapParams, sample_rate: u32, noise: &mut NoiseSource) -> SampleBuffer {
    let len = duration_to_samples(params.duration_secs, sample_rate);
    let sr = sample_rate as f32;

    let raw = noise.gaussian_vec(len);
    let mut signal = SpectralFilter::highpass(params.highpass_hz).apply(&raw, sr);

    let env = burst_envelope(params, len, sample_rate);
    for (sample, level) in signal.iter_mut().zip(env.iter()) {
        *sample *= level;
    }
    apply_decay(&mut signal, sr, params.decay_secs);

    finish(signal, sample_rate)
}
