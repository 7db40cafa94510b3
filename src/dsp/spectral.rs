use rustfft::{num_complex::Complex, FftPlanner};

/*
Spectral Shaping
================

Instead of running a recursive filter sample by sample, the whole buffer is
moved into the frequency domain, every bin is scaled by the magnitude of a
Butterworth response, and the result is transformed back.

    time ──FFT──→ bins ──× |H(f)|──→ bins ──IFFT──→ time

This is only sensible for finite, pre-rendered buffers (instrument one-shots).
It has zero phase shift and costs O(N log N) once per buffer, which is why it
is used while building the kit and never inside the audio callback.


Butterworth Magnitude
---------------------

  low-pass:   |H(f)| = 1 / sqrt(1 + (f / fc)^(2n))
  high-pass:  |H(f)| = 1 / sqrt(1 + (fc / f)^(2n))

  n is the filter order. At f = fc both responses are 1/sqrt(2) (-3 dB);
  higher orders give a steeper transition.

  Gain
    1.0 ───────╮                 ╭──────── 1.0
               │╲  low    high  ╱│
   0.707 ......│.╳.............╳.│
               │  ╲           ╱  │
    0.0        ╰───╲────────╱────╯
                   fc      fc

A tiny epsilon keeps the ratio finite at f = 0 and fc = 0. In high-pass mode
bin 0 (DC) is forced to zero outright.


Bin Frequencies
---------------

An N-point complex FFT of a real signal is conjugate-symmetric: bin k and bin
N-k describe the same frequency. Both get the gain of

    f(k) = min(k, N - k) * sample_rate / N

so the inverse transform stays real and the imaginary residue is discarded.
*/

const EPSILON: f64 = 1e-10;

/// Default Butterworth order used by the synthesizers.
pub const DEFAULT_ORDER: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    LowPass,
    HighPass,
}

/// Zero-phase Butterworth-style filter applied in the frequency domain.
#[derive(Debug, Clone, Copy)]
pub struct SpectralFilter {
    pub cutoff_hz: f32,
    pub order: u32,
    mode: FilterMode,
}

impl SpectralFilter {
    pub fn new(mode: FilterMode, cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            order: DEFAULT_ORDER,
            mode,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterMode::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterMode::HighPass, cutoff_hz)
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Magnitude response at `freq_hz`, ignoring the DC override.
    pub fn gain_at(&self, freq_hz: f32) -> f32 {
        let freq = freq_hz.max(0.0) as f64;
        let cutoff = self.cutoff_hz.max(0.0) as f64;
        let exponent = 2.0 * self.order as f64;

        let ratio = match self.mode {
            FilterMode::LowPass => freq / (cutoff + EPSILON),
            FilterMode::HighPass => cutoff / (freq + EPSILON),
        };

        // powf may overflow to +inf for steep orders; 1/sqrt(inf) is 0
        (1.0 / (1.0 + ratio.powf(exponent)).sqrt()) as f32
    }

    /// Filter a whole buffer. Returns a new buffer of the same length.
    pub fn apply(&self, input: &[f32], sample_rate: f32) -> Vec<f32> {
        let n = input.len();
        if n == 0 {
            return Vec::new();
        }

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);

        let mut spectrum: Vec<Complex<f32>> =
            input.iter().map(|&s| Complex::new(s, 0.0)).collect();
        forward.process(&mut spectrum);

        let bin_width = sample_rate / n as f32;
        for (k, bin) in spectrum.iter_mut().enumerate() {
            let mirrored = k.min(n - k);
            let gain = if mirrored == 0 && self.mode == FilterMode::HighPass {
                0.0
            } else {
                self.gain_at(mirrored as f32 * bin_width)
            };
            *bin *= gain;
        }

        inverse.process(&mut spectrum);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / n as f32;
        spectrum.iter().map(|c| c.re * scale).collect()
    }
}

/// Apply a Butterworth-style shaping filter to `input`.
pub fn butterworth(
    input: &[f32],
    cutoff_hz: f32,
    sample_rate: f32,
    order: u32,
    mode: FilterMode,
) -> Vec<f32> {
    SpectralFilter::new(mode, cutoff_hz)
        .with_order(order)
        .apply(input, sample_rate)
}
