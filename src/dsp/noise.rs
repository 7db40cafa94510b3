//! Seeded noise for the synthesizers.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::TAU;

/// Deterministic noise generator.
///
/// The same seed always yields the same sequence, so a kit built twice from
/// one seed is sample-identical.
pub struct NoiseSource {
    rng: StdRng,
}

impl NoiseSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in [-1, 1].
    pub fn white(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }

    /// Standard normal sample (mean 0, standard deviation 1).
    pub fn gaussian(&mut self) -> f32 {
        // Box-Muller; u1 in (0, 1] keeps ln() finite
        let u1: f32 = 1.0 - self.rng.gen::<f32>();
        let u2: f32 = self.rng.gen::<f32>();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Fill `out` with Gaussian noise scaled by `std_dev`.
    pub fn fill_gaussian(&mut self, out: &mut [f32], std_dev: f32) {
        for sample in out.iter_mut() {
            *sample = self.gaussian() * std_dev;
        }
    }

    /// Allocate `len` samples of standard Gaussian noise.
    pub fn gaussian_vec(&mut self, len: usize) -> Vec<f32> {
        let mut out = vec![0.0; len];
        self.fill_gaussian(&mut out, 1.0);
        out
    }
}
