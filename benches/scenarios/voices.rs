//! Benchmarks for instrument synthesis.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepbox::{dsp::NoiseSource, runtime::ChannelTable, voices::Instrument};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    group.sample_size(20);

    for instrument in Instrument::ALL {
        let mut noise = NoiseSource::seeded(9);
        group.bench_with_input(
            BenchmarkId::new("render", instrument.label()),
            &instrument,
            |b, &instrument| b.iter(|| instrument.render(black_box(44_100), &mut noise)),
        );
    }

    group.bench_function("standard_kit", |b| {
        b.iter(|| ChannelTable::standard_kit(black_box(44_100), 9))
    });

    group.finish();
}
