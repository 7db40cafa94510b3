/*
Exponential Decay
=================

Percussion has no sustain: it is struck, then it dies away. Acoustic decays
are close to exponential, so every one-shot here is shaped by

    env(t) = e^(-t / τ)

  τ (tau)     Time constant in seconds. After τ the level is e^-1 ≈ 0.37,
              after 3τ ≈ 0.05, after 5τ < 0.01.

  Level
    1.0 ┐╲
        │ ╲
   0.37 │..╲___
        │      ‾‾‾‾‾────___
    0.0 └───┬──────────────‾‾‾──→ t
            τ

The same curve drives pitch sweeps: a kick's frequency is
`end + (start - end) · e^(-t/τ)`.
*/

/// Exponential decay `e^(-t/tau)`. A non-positive `tau` decays instantly.
#[inline]
pub fn exp_decay(t: f32, tau: f32) -> f32 {
    if tau > 0.0 {
        (-t / tau).exp()
    } else if t <= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Time in seconds of sample `index` at `sample_rate`.
#[inline]
pub fn sample_time(index: usize, sample_rate: f32) -> f32 {
    index as f32 / sample_rate
}

/// Multiply `buffer` by `e^(-t/tau)` sample by sample.
pub fn apply_decay(buffer: &mut [f32], sample_rate: f32, tau: f32) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        *sample *= exp_decay(sample_time(i, sample_rate), tau);
    }
}
