//! Benchmarks for complete render blocks.
//!
//! The standard kit at a fast tempo keeps several voices sounding at once,
//! which is the realistic worst case for one block.

use std::{collections::VecDeque, hint::black_box};

use criterion::{BenchmarkId, Criterion};
use stepbox::{
    runtime::{ChannelSpec, ChannelTable, RenderEngine},
    sequencing::StepPattern,
    synth::EngineCommand,
    voices::SampleBuffer,
    EngineConfig, STEPS_PER_BAR,
};

use crate::BLOCK_SIZES;

fn running(config: EngineConfig, table: ChannelTable) -> RenderEngine<VecDeque<EngineCommand>> {
    let mut engine = RenderEngine::new(config, table, VecDeque::new());
    engine.receiver_mut().push_back(EngineCommand::Start);
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let kit = ChannelTable::standard_kit(44_100, 3);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // === STANDARD KIT ===
        let mut engine = running(EngineConfig::default().bpm(174.0), kit.clone());
        group.bench_with_input(BenchmarkId::new("standard_kit", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut left), black_box(&mut right)))
        });

        // === SATURATED POOL ===
        // Every step on 16 channels with long tails: the voice cap is always hit
        let mut dense = ChannelTable::new();
        let tail = SampleBuffer::new(vec![0.01; 44_100], 44_100);
        let all: Vec<usize> = (0..STEPS_PER_BAR).collect();
        for i in 0..16 {
            dense.add(
                ChannelSpec::new(format!("ch{i}"), tail.clone()).steps(StepPattern::from_active(&all)),
            );
        }
        let mut engine = running(EngineConfig::default().bpm(400.0), dense);
        group.bench_with_input(BenchmarkId::new("saturated_pool", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut left), black_box(&mut right)))
        });

        // === INTERLEAVED DEVICE BUFFER ===
        let mut engine = running(EngineConfig::default().bpm(174.0), kit.clone());
        let mut data = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("interleaved_stereo", size), &size, |b, _| {
            b.iter(|| engine.render_interleaved(black_box(&mut data), 2))
        });
    }

    group.finish();
}
