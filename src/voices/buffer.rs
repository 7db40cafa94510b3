//! Immutable sample buffers shared between channels, voices and export.

use std::{fmt, sync::Arc};

use crate::dsp::mix;

/// A rendered mono one-shot.
///
/// Cloning is cheap (reference count bump), so the render path can hand a
/// buffer to a new voice without allocating.
#[derive(Clone)]
pub struct SampleBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    /// A buffer of `len` zeros.
    pub fn silent(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate.max(1) as f64
    }

    pub fn peak(&self) -> f32 {
        mix::peak(&self.samples)
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &SampleBuffer) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }
}

impl fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("len", &self.samples.len())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

/// Number of samples in `duration_secs` at `sample_rate`, rounded to the
/// nearest frame.
///
/// Zero, negative and non-finite durations give 0.
pub fn duration_to_samples(duration_secs: f32, sample_rate: u32) -> usize {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        (duration_secs as f64 * sample_rate as f64).round() as usize
    } else {
        0
    }
}

/// Peak-normalize synthesized samples and wrap them in a buffer.
pub(crate) fn finish(mut samples: Vec<f32>, sample_rate: u32) -> SampleBuffer {
    mix::normalize(&mut samples);
    SampleBuffer::new(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_samples() {
        assert_eq!(duration_to_samples(0.5, 44_100), 22_050);
        assert_eq!(duration_to_samples(0.08, 44_100), 3528);
        assert_eq!(duration_to_samples(0.0, 44_100), 0);
        assert_eq!(duration_to_samples(-1.0, 44_100), 0);
        assert_eq!(duration_to_samples(f32::NAN, 44_100), 0);
    }

    #[test]
    fn test_clone_shares_allocation() {
        let a = SampleBuffer::new(vec![0.1, 0.2], 44_100);
        let b = a.clone();
        let c = SampleBuffer::new(vec![0.1, 0.2], 44_100);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_finish_normalizes() {
        let buf = finish(vec![0.0, 0.25, -0.5], 44_100);
        assert!((buf.peak() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_finish_leaves_silence() {
        let buf = finish(vec![0.0; 4], 44_100);
        assert_eq!(buf.samples(), &[0.0; 4]);
    }
}
