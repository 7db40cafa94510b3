use std::collections::VecDeque;

use stepbox::{
    dsp::NoiseSource,
    runtime::{engine_pair, ChannelId, ChannelSpec, ChannelTable, RenderEngine},
    sequencing::StepPattern,
    synth::EngineCommand,
    voices::{Instrument, SampleBuffer},
    EngineConfig, STEPS_PER_BAR,
};

type TestEngine = RenderEngine<VecDeque<EngineCommand>>;

fn engine(config: EngineConfig, table: ChannelTable) -> TestEngine {
    RenderEngine::new(config, table, VecDeque::new())
}

fn hard_left(name: &str, buffer: SampleBuffer, steps: &[usize]) -> ChannelSpec {
    ChannelSpec::new(name, buffer)
        .steps(StepPattern::from_active(steps))
        .gain(1.0)
        .pan(0.0)
}

/// Render `frames` in blocks of `block`, returning the concatenated channels.
fn render_frames(engine: &mut TestEngine, frames: usize, block: usize) -> (Vec<f32>, Vec<f32>) {
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    let mut l = vec![0.0; block];
    let mut r = vec![0.0; block];

    let mut remaining = frames;
    while remaining > 0 {
        let n = remaining.min(block);
        engine.render(&mut l[..n], &mut r[..n]);
        left.extend_from_slice(&l[..n]);
        right.extend_from_slice(&r[..n]);
        remaining -= n;
    }
    (left, right)
}

#[test]
fn kick_on_step_zero_plays_once_per_bar() {
    let kick = Instrument::Kick.render(44_100, &mut NoiseSource::seeded(7));
    let mut table = ChannelTable::new();
    table.add(hard_left("Kick", kick.clone(), &[0]));

    let mut engine = engine(EngineConfig::default().bpm(120.0), table);
    engine.receiver_mut().push_back(EngineCommand::Start);

    // One bar at 120 bpm: 16 * 5512.5 frames
    let (left, right) = render_frames(&mut engine, 88_200, 512);

    let mut expected = kick.samples().to_vec();
    expected.resize(88_200, 0.0);
    assert_eq!(left, expected);
    assert!(right.iter().all(|s| s.abs() < 1e-6));
    assert_eq!(engine.monitor().evicted_voices(), 0);
}

#[test]
fn polyphony_cap_evicts_oldest_voices() {
    let mut table = ChannelTable::new();
    table.add(hard_left(
        "drone",
        SampleBuffer::new(vec![0.01; 200_000], 44_100),
        &(0..STEPS_PER_BAR).collect::<Vec<_>>(),
    ));

    let config = EngineConfig::default().bpm(400.0).max_voices(64);
    let mut engine = engine(config, table);
    engine.receiver_mut().push_back(EngineCommand::Start);

    // Step 69 fires at floor(69 * 1653.75) = 114108; step 70 is later
    render_frames(&mut engine, 114_109, 512);

    assert_eq!(engine.clock().next_step_index(), 70);
    assert_eq!(engine.voice_count(), 64);
    let monitor = engine.monitor();
    assert_eq!(monitor.active_voices(), 64);
    assert_eq!(monitor.evicted_voices(), 6);
}

#[test]
fn stop_then_start_plays_only_step_zero() {
    let buffer = SampleBuffer::new((0..4000).map(|i| (i % 100) as f32 / 100.0).collect(), 44_100);
    let mut table = ChannelTable::new();
    table.add(hard_left("a", buffer.clone(), &[0]));
    table.add(hard_left("b", buffer.clone(), &[3]));

    let mut engine = engine(EngineConfig::default().bpm(120.0), table);
    engine.receiver_mut().push_back(EngineCommand::Start);
    render_frames(&mut engine, 20_000, 512);
    assert!(engine.voice_count() > 0);

    engine
        .receiver_mut()
        .extend([EngineCommand::Stop, EngineCommand::Start]);
    let (left, _) = render_frames(&mut engine, 512, 512);

    assert_eq!(engine.clock().elapsed(), 512);
    assert_eq!(engine.voice_count(), 1);
    assert_eq!(left, buffer.samples()[..512].to_vec());
}

#[test]
fn voice_continues_across_block_boundaries() {
    let buffer = SampleBuffer::new((1..=1000).map(|i| i as f32 / 1000.0).collect(), 44_100);
    let mut table = ChannelTable::new();
    table.add(hard_left("ramp", buffer.clone(), &[0]));

    let mut engine = engine(EngineConfig::default().bpm(120.0), table);
    engine.receiver_mut().push_back(EngineCommand::Start);
    let (left, _) = render_frames(&mut engine, 1200, 300);

    assert_eq!(&left[..1000], buffer.samples());
    assert!(left[1000..].iter().all(|&s| s == 0.0));
    assert_eq!(engine.voice_count(), 0);
}

#[test]
fn tempo_change_applies_at_next_block() {
    let mut engine = engine(EngineConfig::default().bpm(120.0), ChannelTable::new());
    engine.receiver_mut().push_back(EngineCommand::Start);
    render_frames(&mut engine, 512, 512);

    engine
        .receiver_mut()
        .push_back(EngineCommand::SetTempo { bpm: 240.0 });
    assert_eq!(engine.clock().bpm(), 120.0);

    render_frames(&mut engine, 512, 512);
    assert_eq!(engine.clock().bpm(), 240.0);
    assert_eq!(engine.monitor().bpm(), 240.0);
}

#[test]
fn meters_follow_channel_not_buffer() {
    let shared = SampleBuffer::new(vec![0.5; 2048], 44_100);
    let mut table = ChannelTable::new();
    table.add(
        ChannelSpec::new("quiet", shared.clone())
            .steps(StepPattern::from_active(&[0]))
            .gain(0.2),
    );
    table.add(
        ChannelSpec::new("loud", shared.clone())
            .steps(StepPattern::from_active(&[0]))
            .gain(0.8),
    );
    table.add(ChannelSpec::new("idle", shared));

    let mut engine = engine(EngineConfig::default(), table);
    let monitor = engine.monitor();
    engine.receiver_mut().push_back(EngineCommand::Start);
    render_frames(&mut engine, 512, 512);

    let snapshot = monitor.snapshot();
    assert!((snapshot.channels[0] - 0.1).abs() < 1e-6);
    assert!((snapshot.channels[1] - 0.4).abs() < 1e-6);
    assert_eq!(snapshot.channels[2], 0.0);
    assert!(snapshot.master > 0.0 && snapshot.master <= 1.0);
}

#[test]
fn stopped_kit_renders_silence() {
    let mut engine = engine(EngineConfig::default(), ChannelTable::standard_kit(44_100, 1));
    let (left, right) = render_frames(&mut engine, 4096, 512);

    assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    assert_eq!(engine.monitor().master_level(), 0.0);
    assert!(!engine.monitor().is_running());
}

#[test]
fn standard_kit_output_stays_in_range() {
    let mut engine = engine(EngineConfig::default(), ChannelTable::standard_kit(44_100, 3));
    engine.receiver_mut().push_back(EngineCommand::Start);
    let (left, right) = render_frames(&mut engine, 44_100, 512);

    assert!(left.iter().chain(right.iter()).all(|s| s.abs() <= 1.0));
    assert!(left.iter().any(|s| s.abs() > 0.0));
}

#[test]
fn controller_edits_are_heard() {
    let buffer = SampleBuffer::new(vec![0.5; 64], 44_100);
    let mut table = ChannelTable::new();
    table.add(hard_left("a", buffer, &[]));

    let (mut controller, mut engine) = engine_pair(EngineConfig::default(), table);
    let mut l = vec![0.0; 256];
    let mut r = vec![0.0; 256];

    controller.start();
    engine.render(&mut l, &mut r);
    assert!(l.iter().all(|&s| s == 0.0));

    // Re-arm step 0 and restart from the top of the bar
    assert_eq!(controller.toggle_step(ChannelId(0), 0), Some(true));
    controller.stop();
    controller.start();
    engine.render(&mut l, &mut r);
    assert_eq!(l[0], 0.5);
    assert!(controller.meters().channels[0] > 0.0);
}
