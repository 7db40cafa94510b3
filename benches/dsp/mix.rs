//! Benchmarks for panning, summing and clipping.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepbox::dsp::{clip, mix};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Equal-power pan into a stereo pair
        group.bench_with_input(BenchmarkId::new("pan_into", size), &size, |b, _| {
            b.iter(|| {
                let (lg, rg) = mix::pan_gains(black_box(0.3));
                mix::mix_scaled_into(&mut left, black_box(&signal), 0.8 * lg);
                mix::mix_scaled_into(&mut right, black_box(&signal), 0.8 * rg);
            })
        });

        // Hard clip of an overdriven buffer
        let hot: Vec<f32> = signal.iter().map(|s| s * 3.0).collect();
        let mut buffer = hot.clone();
        group.bench_with_input(BenchmarkId::new("clip", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&hot);
                clip::clip_buffer(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
