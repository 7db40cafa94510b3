//! Render engine - the audio-thread side of the sequencer
//!
//! One `render` call produces one block:
//!
//! ```text
//!   commands ──► snapshot/clock ──► triggers ──► voice pool ──► clip ──► out
//!                                                   │              │
//!                                             channel peaks   master peak
//!                                                   └──► PeakMeter ◄┘
//!                                                           │
//!                                                     EngineMonitor
//! ```
//!
//! Everything here is allocated in `new`; the block path only indexes
//! pre-sized buffers and never logs.

use std::sync::Arc;

use crate::{
    config::EngineConfig,
    dsp::{clip::clip_buffer, mix},
    sequencing::SequencerClock,
    synth::{CommandReceiver, EngineCommand, VoicePool},
    MAX_BLOCK_SIZE,
};

use super::{channels::ChannelTable, meter::PeakMeter, monitor::EngineMonitor};

pub struct RenderEngine<R: CommandReceiver> {
    config: EngineConfig,
    channels: ChannelTable,
    clock: SequencerClock,
    voices: VoicePool,
    meter: PeakMeter,
    monitor: Arc<EngineMonitor>,
    receiver: R,
    /// Per-channel block peaks, one slot per table row
    channel_peaks: Vec<f32>,
    /// Deinterleaved scratch for `render_interleaved`
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
}

impl<R: CommandReceiver> RenderEngine<R> {
    pub fn new(config: EngineConfig, channels: ChannelTable, receiver: R) -> Self {
        let config = config.validated();
        let count = channels.len();

        Self {
            clock: SequencerClock::new(config.bpm, config.sample_rate),
            voices: VoicePool::new(config.max_voices),
            meter: PeakMeter::new(count, config.meter_decay),
            monitor: Arc::new(EngineMonitor::new(count, config.bpm)),
            channel_peaks: vec![0.0; count],
            scratch_left: vec![0.0; MAX_BLOCK_SIZE],
            scratch_right: vec![0.0; MAX_BLOCK_SIZE],
            config,
            channels,
            receiver,
        }
    }

    /// Handle for reading meters and transport from another thread.
    pub fn monitor(&self) -> Arc<EngineMonitor> {
        Arc::clone(&self.monitor)
    }

    /// Render one block into `left`/`right`.
    ///
    /// Both slices must have the same length, at most [`MAX_BLOCK_SIZE`];
    /// otherwise the block is left silent.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        left.fill(0.0);
        right.fill(0.0);
        if left.len() != right.len() || left.len() > MAX_BLOCK_SIZE {
            return;
        }

        self.apply_commands();

        let frames = left.len();
        let Self {
            channels,
            clock,
            voices,
            ..
        } = &mut *self;

        clock.advance(frames, |trigger| {
            for id in channels.ids() {
                if !channels.is_step_active(id, trigger.step) {
                    continue;
                }
                if let (Some(buffer), Some(gain), Some(pan)) =
                    (channels.buffer(id), channels.gain(id), channels.pan(id))
                {
                    voices.trigger(buffer, id, gain, pan, trigger.offset);
                }
            }
        });

        self.channel_peaks.fill(0.0);
        self.voices.render(left, right, &mut self.channel_peaks);

        clip_buffer(left);
        clip_buffer(right);

        let master = mix::peak(left).max(mix::peak(right));
        self.meter.update(&self.channel_peaks, master);
        self.meter.publish(&self.monitor);

        self.monitor.store_transport(
            self.clock.is_running(),
            self.clock.current_step(),
            self.clock.elapsed(),
            self.clock.bpm(),
        );
        self.monitor
            .store_voices(self.voices.len(), self.voices.evicted());
    }

    /// Fill an interleaved device buffer, rendering in blocks of the
    /// configured size.
    ///
    /// Mono devices get `(L + R) / 2`; channels past the second are silent.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            data.fill(0.0);
            return;
        }

        // Taken out of self for the duration so render() can borrow mutably
        let mut left = std::mem::take(&mut self.scratch_left);
        let mut right = std::mem::take(&mut self.scratch_right);
        let block = self.config.block_size.min(left.len()).max(1);

        for chunk in data.chunks_mut(block * channels) {
            let frames = chunk.len() / channels;
            let (l, r) = (&mut left[..frames], &mut right[..frames]);
            self.render(l, r);

            for (i, frame) in chunk.chunks_mut(channels).enumerate() {
                let (ls, rs) = match (l.get(i), r.get(i)) {
                    (Some(&ls), Some(&rs)) => (ls, rs),
                    _ => (0.0, 0.0),
                };
                match frame {
                    [mono] => *mono = (ls + rs) * 0.5,
                    [first, second, rest @ ..] => {
                        *first = ls;
                        *second = rs;
                        rest.fill(0.0);
                    }
                    [] => {}
                }
            }
        }

        self.scratch_left = left;
        self.scratch_right = right;
    }

    fn apply_commands(&mut self) {
        while let Some(command) = self.receiver.pop() {
            match command {
                EngineCommand::Start => {
                    if self.clock.start() {
                        self.voices.clear();
                    }
                }
                EngineCommand::Stop => {
                    self.clock.stop();
                    self.voices.clear();
                }
                EngineCommand::SetTempo { bpm } => {
                    self.clock.set_bpm(bpm);
                }
                EngineCommand::SetStep {
                    channel,
                    step,
                    active,
                } => {
                    self.channels.set_step(channel, step, active);
                }
                EngineCommand::SetGain { channel, gain } => {
                    self.channels.set_gain(channel, gain);
                }
                EngineCommand::SetPan { channel, pan } => {
                    self.channels.set_pan(channel, pan);
                }
            }
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn clock(&self) -> &SequencerClock {
        &self.clock
    }

    /// The engine's private copy of the channel table.
    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{
        runtime::channels::{ChannelId, ChannelSpec},
        sequencing::StepPattern,
        voices::SampleBuffer,
    };

    fn one_channel(buffer: SampleBuffer, steps: &[usize]) -> ChannelTable {
        let mut table = ChannelTable::new();
        table.add(
            ChannelSpec::new("test", buffer)
                .steps(StepPattern::from_active(steps))
                .gain(1.0)
                .pan(0.0),
        );
        table
    }

    fn engine(table: ChannelTable) -> RenderEngine<VecDeque<EngineCommand>> {
        let config = EngineConfig::default().bpm(120.0);
        RenderEngine::new(config, table, VecDeque::new())
    }

    fn block(engine: &mut RenderEngine<VecDeque<EngineCommand>>, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut l = vec![0.0; frames];
        let mut r = vec![0.0; frames];
        engine.render(&mut l, &mut r);
        (l, r)
    }

    #[test]
    fn test_stopped_engine_is_silent() {
        let mut engine = engine(one_channel(SampleBuffer::new(vec![1.0; 64], 44_100), &[0]));
        let (l, r) = block(&mut engine, 256);
        assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
        assert_eq!(engine.voice_count(), 0);
    }

    #[test]
    fn test_step_zero_fires_at_offset_zero() {
        let mut engine = engine(one_channel(SampleBuffer::new(vec![0.5; 4], 44_100), &[0]));
        engine.receiver_mut().push_back(EngineCommand::Start);
        let (l, r) = block(&mut engine, 8);
        assert_eq!(&l[..5], &[0.5, 0.5, 0.5, 0.5, 0.0]);
        assert!(r.iter().all(|s| s.abs() < 1e-6)); // hard left
    }

    #[test]
    fn test_mismatched_slices_give_silence() {
        let mut engine = engine(one_channel(SampleBuffer::new(vec![1.0; 64], 44_100), &[0]));
        engine.receiver_mut().push_back(EngineCommand::Start);
        let mut l = vec![1.0; 16];
        let mut r = vec![1.0; 8];
        engine.render(&mut l, &mut r);
        assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
        // Commands stay queued for the next valid block
        assert!(!engine.clock().is_running());
    }

    #[test]
    fn test_oversized_block_gives_silence() {
        let mut engine = engine(ChannelTable::new());
        let mut l = vec![1.0; MAX_BLOCK_SIZE + 1];
        let mut r = vec![1.0; MAX_BLOCK_SIZE + 1];
        engine.render(&mut l, &mut r);
        assert!(l.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_output_is_clipped() {
        let mut table = ChannelTable::new();
        let loud = SampleBuffer::new(vec![1.0; 32], 44_100);
        for _ in 0..4 {
            table.add(
                ChannelSpec::new("loud", loud.clone())
                    .steps(StepPattern::from_active(&[0]))
                    .gain(1.0)
                    .pan(0.5),
            );
        }
        let mut engine = engine(table);
        engine.receiver_mut().push_back(EngineCommand::Start);
        let (l, r) = block(&mut engine, 32);
        assert!(l.iter().chain(r.iter()).all(|s| s.abs() <= 1.0));
        assert_eq!(l[0], 1.0);
        assert_eq!(engine.monitor().master_level(), 1.0);
    }

    #[test]
    fn test_stop_clears_voices() {
        let mut engine = engine(one_channel(SampleBuffer::new(vec![0.5; 10_000], 44_100), &[0]));
        engine.receiver_mut().push_back(EngineCommand::Start);
        block(&mut engine, 128);
        assert_eq!(engine.voice_count(), 1);

        engine.receiver_mut().push_back(EngineCommand::Stop);
        let (l, _) = block(&mut engine, 128);
        assert_eq!(engine.voice_count(), 0);
        assert!(l.iter().all(|&s| s == 0.0));
        assert_eq!(engine.clock().elapsed(), 0);
    }

    #[test]
    fn test_start_while_running_keeps_voices() {
        let mut engine = engine(one_channel(SampleBuffer::new(vec![0.5; 10_000], 44_100), &[0]));
        engine.receiver_mut().push_back(EngineCommand::Start);
        block(&mut engine, 128);
        engine.receiver_mut().push_back(EngineCommand::Start);
        block(&mut engine, 128);
        assert_eq!(engine.voice_count(), 1);
        assert_eq!(engine.clock().elapsed(), 256);
    }

    #[test]
    fn test_edit_commands_update_snapshot() {
        let mut engine = engine(one_channel(SampleBuffer::silent(4, 44_100), &[]));
        let id = ChannelId(0);
        engine.receiver_mut().extend([
            EngineCommand::SetStep { channel: id, step: 3, active: true },
            EngineCommand::SetGain { channel: id, gain: 2.0 },
            EngineCommand::SetPan { channel: id, pan: f32::NAN },
            EngineCommand::SetTempo { bpm: 1000.0 },
        ]);
        block(&mut engine, 16);

        assert!(engine.channels().is_step_active(id, 3));
        assert_eq!(engine.channels().gain(id), Some(1.0));
        assert_eq!(engine.channels().pan(id), Some(0.0));
        assert_eq!(engine.clock().bpm(), 400.0);
    }

    #[test]
    fn test_interleaved_stereo_layout() {
        let mut engine = engine(one_channel(SampleBuffer::new(vec![0.5; 4], 44_100), &[0]));
        engine.receiver_mut().push_back(EngineCommand::Start);
        let mut data = vec![9.0; 8 * 2];
        engine.render_interleaved(&mut data, 2);
        assert_eq!(&data[..4], &[0.5, 0.0, 0.5, 0.0]);
        assert_eq!(&data[8..], &[0.0; 8]);
    }

    #[test]
    fn test_interleaved_mono_and_extra_channels() {
        let table = one_channel(SampleBuffer::new(vec![0.5; 4], 44_100), &[0]);
        let mut mono = engine(table.clone());
        mono.receiver_mut().push_back(EngineCommand::Start);
        let mut data = vec![0.0; 4];
        mono.render_interleaved(&mut data, 1);
        assert_eq!(data, vec![0.25; 4]);

        let mut quad = engine(table);
        quad.receiver_mut().push_back(EngineCommand::Start);
        let mut data = vec![9.0; 4 * 4];
        quad.render_interleaved(&mut data, 4);
        assert_eq!(&data[..4], &[0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_interleaved_splits_into_blocks() {
        let config = EngineConfig::default().block_size(64);
        let mut engine = RenderEngine::new(config, ChannelTable::new(), VecDeque::new());
        engine.receiver_mut().push_back(EngineCommand::Start);
        let mut data = vec![0.0; 1000 * 2];
        engine.render_interleaved(&mut data, 2);
        assert_eq!(engine.clock().elapsed(), 1000);
    }

    #[test]
    fn test_monitor_reports_transport() {
        let mut engine = engine(one_channel(SampleBuffer::new(vec![0.5; 10_000], 44_100), &[0]));
        let monitor = engine.monitor();
        engine.receiver_mut().push_back(EngineCommand::Start);
        block(&mut engine, 512);

        assert!(monitor.is_running());
        assert_eq!(monitor.elapsed_samples(), 512);
        assert_eq!(monitor.active_voices(), 1);
        assert!((monitor.channel_level(0) - 0.5).abs() < 1e-6);
    }
}
