//! Kick drum.
//!
//! A sine wave whose pitch falls quickly from ~150 Hz to ~50 Hz gives the
//! "punch"; a slower amplitude decay gives the body, and a few milliseconds
//! of noise on top supply the beater click.
//!
//! # How It Works
//!
//! 1. Instantaneous frequency `end + (start - end) · e^(-t/pitch_decay)`
//! 2. Phase is accumulated sample by sample (so the sweep is continuous)
//! 3. Amplitude envelope `e^(-t/amp_decay)`
//! 4. Gaussian click added over the first `click_secs`
//! 5. Peak-normalized
//!
//! # Variations
//!
//! - Longer amp decay = boomy 808-style kick
//! - Higher start frequency = more "click" attack
//! - Louder click = more acoustic beater character

use std::f32::consts::TAU;

use crate::dsp::{
    envelope::{exp_decay, sample_time},
    NoiseSource,
};

use super::buffer::{duration_to_samples, finish, SampleBuffer};

#[derive(Debug, Clone, Copy)]
pub struct KickParams {
    pub duration_secs: f32,
    pub start_hz: f32,
    pub end_hz: f32,
    pub pitch_decay_secs: f32,
    pub amp_decay_secs: f32,
    pub click_secs: f32,
    pub click_level: f32,
}

impl Default for KickParams {
    fn default() -> Self {
        Self {
            duration_secs: 0.5,
            start_hz: 150.0,
            end_hz: 50.0,
            pitch_decay_secs: 0.07,
            amp_decay_secs: 0.3,
            click_secs: 0.005,
            click_level: 0.5,
        }
    }
}

/// Render a kick drum.
pub fn kick(params: &KickParams, sample_rate: u32, noise: &mut NoiseSource) -> SampleBuffer {
    let len = duration_to_samples(params.duration_secs, sample_rate);
    let sr = sample_rate as f32;
    let sweep = params.start_hz - params.end_hz;

    let mut phase = 0.0f32;
    let mut samples: Vec<f32> = (0..len)
        .map(|i| {
            let t = sample_time(i, sr);
            let freq = params.end_hz + sweep * exp_decay(t, params.pitch_decay_secs);
            phase = (phase + TAU * freq / sr) % TAU;
            phase.sin() * exp_decay(t, params.amp_decay_secs)
        })
        .collect();

    let click_len = duration_to_samples(params.click_secs, sample_rate).min(len);
    for sample in samples.iter_mut().take(click_len) {
        *sample += noise.gaussian() * params.click_level;
    }

    finish(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_peak() {
        let buf = kick(&KickParams::default(), 44_100, &mut NoiseSource::seeded(1));
        assert_eq!(buf.len(), 22_050);
        assert!((buf.peak() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tail_decays() {
        let buf = kick(&KickParams::default(), 44_100, &mut NoiseSource::seeded(1));
        let tail = &buf.samples()[buf.len() - 441..];
        assert!(tail.iter().all(|s| s.abs() < 0.3));
    }

    #[test]
    fn test_zero_duration() {
        let params = KickParams {
            duration_secs: 0.0,
            ..Default::default()
        };
        let buf = kick(&params, 44_100, &mut NoiseSource::seeded(1));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_shorter_than_click() {
        let params = KickParams {
            duration_secs: 0.001,
            ..Default::default()
        };
        let buf = kick(&params, 44_100, &mut NoiseSource::seeded(1));
        assert_eq!(buf.len(), 44);
    }
}
