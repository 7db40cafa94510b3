//! Low-level DSP primitives used by the synthesizers and the render engine.
//!
//! Everything in `mix` and `clip` is allocation-free and safe to call from
//! the audio callback. `spectral` and `noise` are load-time tools: they run
//! while the kit is being built, never per block.

/// Output clipping.
pub mod clip;
/// Exponential decay curves.
pub mod envelope;
/// Equal-power panning, gain-scaled summing, peak and normalization.
pub mod mix;
/// Seeded white and Gaussian noise.
pub mod noise;
/// FFT-based Butterworth-style low/high-pass shaping.
pub mod spectral;

pub use noise::NoiseSource;
pub use spectral::{FilterMode, SpectralFilter};
