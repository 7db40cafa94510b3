//! Output clipping
//!
//! Every block leaving the engine, and every exported file, passes through
//! the clipper so samples stay inside full scale:
//!
//!   f(x) = clamp(x, -1, 1)
//!
//! Inside [-1, 1] the signal passes through bit-exact, so a single voice is
//! never coloured; only overshoot produced by summing is flattened. NaN is
//! treated as a fault and becomes silence.

/// Clip one sample to [-1, 1]. NaN maps to 0.0.
#[inline]
pub fn clip(sample: f32) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    }
}

/// Clip a buffer in place.
pub fn clip_buffer(buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = clip(*sample);
    }
}
