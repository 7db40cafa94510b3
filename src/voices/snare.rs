//! Snare drum.
//!
//! A short tonal thump from the drum head plus a longer burst of high-passed
//! noise for the wires stretched under the bottom head.
//!
//! # How It Works
//!
//! 1. Body: 180 Hz sine with a fast ~50 ms decay
//! 2. Rattle: Gaussian noise with a ~120 ms decay
//! 3. Rattle is high-passed at 1 kHz to remove mud
//! 4. Mixed 40% body / 60% rattle, then peak-normalized
//!
//! # Variations
//!
//! - More rattle = trashy, lo-fi snare
//! - Less rattle = more "tom" like
//! - Higher high-pass cutoff = thinner, snappier

use std::f32::consts::TAU;

use crate::dsp::{
    envelope::{exp_decay, sample_time},
    NoiseSource, SpectralFilter,
};

use super::buffer::{duration_to_samples, finish, SampleBuffer};

#[derive(Debug, Clone, Copy)]
pub struct SnareParams {
    pub duration_secs: f32,
    pub tone_hz: f32,
    pub tone_decay_secs: f32,
    pub noise_decay_secs: f32,
    pub noise_highpass_hz: f32,
    pub tone_mix: f32,
}

impl Default for SnareParams {
    fn default() -> Self {
        Self {
            duration_secs: 0.25,
            tone_hz: 180.0,
            tone_decay_secs: 0.05,
            noise_decay_secs: 0.12,
            noise_highpass_hz: 1000.0,
            tone_mix: 0.4,
        }
    }
}

/// Render a snare drum.
pub fn snare(params: &SnareParams, sample_rate: u32, noise: &mut NoiseSource) -> SampleBuffer {
    let len = duration_to_samples(params.duration_secs, sample_rate);
    let sr = sample_rate as f32;

    let mut rattle = noise.gaussian_vec(len);
    for (i, sample) in rattle.iter_mut().enumerate() {
        *sample *= exp_decay(sample_time(i, sr), params.noise_decay_secs);
    }
    let rattle = SpectralFilter::highpass(params.noise_highpass_hz).apply(&rattle, sr);

    let tone_mix = params.tone_mix.clamp(0.0, 1.0);
    let samples = rattle
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let t = sample_time(i, sr);
            let body = (TAU * params.tone_hz * t).sin() * exp_decay(t, params.tone_decay_secs);
            tone_mix * body + (1.0 - tone_mix) * n
        })
        .collect();

    finish(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_peak() {
        let buf = snare(&SnareParams::default(), 44_100, &mut NoiseSource::seeded(2));
        assert_eq!(buf.len(), 11_025);
        assert!((buf.peak() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_seed_reproducible() {
        let a = snare(&SnareParams::default(), 44_100, &mut NoiseSource::seeded(9));
        let b = snare(&SnareParams::default(), 44_100, &mut NoiseSource::seeded(9));
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_zero_duration() {
        let params = SnareParams {
            duration_secs: 0.0,
            ..Default::default()
        };
        assert!(snare(&params, 44_100, &mut NoiseSource::seeded(2)).is_empty());
    }
}
