//! Benchmarks for the FFT magnitude filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepbox::dsp::{NoiseSource, SpectralFilter};

pub fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/spectral");

    // Closed hat, snare and open hat lengths at 44.1kHz
    for &size in &[3_528usize, 11_025, 17_640] {
        let input = NoiseSource::seeded(1).gaussian_vec(size);

        let highpass = SpectralFilter::highpass(7_000.0);
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| highpass.apply(black_box(&input), black_box(44_100.0)))
        });

        let lowpass = SpectralFilter::lowpass(1_000.0).with_order(8);
        group.bench_with_input(BenchmarkId::new("lowpass_order8", size), &size, |b, _| {
            b.iter(|| lowpass.apply(black_box(&input), black_box(44_100.0)))
        });
    }

    group.finish();
}
