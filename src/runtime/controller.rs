//! UI-side handle to a render engine.
//!
//! The controller owns the authoritative channel table. Every edit is made
//! here first and then sent to the engine as an absolute command; if the
//! queue is full the local edit is rolled back so both copies stay equal.

use std::{path::Path, sync::Arc};

use rtrb::{PushError, Producer, RingBuffer};

use crate::{
    config::EngineConfig,
    io::wav::{ExportSummary, Exporter},
    sequencing::clock,
    synth::EngineCommand,
    Result,
};

use super::{
    channels::{ChannelId, ChannelTable, Rgb},
    engine::RenderEngine,
    monitor::{EngineMonitor, MeterSnapshot},
};

/// Commands that can be queued between two engine blocks.
pub const COMMAND_QUEUE_SIZE: usize = 256;

/// Build a connected controller and render engine from one table.
///
/// The engine gets a clone of `channels`; move it to the audio thread.
pub fn engine_pair(
    config: EngineConfig,
    channels: ChannelTable,
) -> (EngineController, RenderEngine<rtrb::Consumer<EngineCommand>>) {
    let config = config.validated();
    let (tx, rx) = RingBuffer::<EngineCommand>::new(COMMAND_QUEUE_SIZE);
    let engine = RenderEngine::new(config, channels.clone(), rx);

    let controller = EngineController {
        config,
        channels,
        running: false,
        bpm: config.bpm,
        tx,
        monitor: engine.monitor(),
        dropped: 0,
    };
    (controller, engine)
}

pub struct EngineController {
    config: EngineConfig,
    channels: ChannelTable,
    running: bool,
    bpm: f64,
    tx: Producer<EngineCommand>,
    monitor: Arc<EngineMonitor>,
    /// Commands refused because the queue was full
    dropped: u64,
}

impl EngineController {
    fn send(&mut self, command: EngineCommand) -> bool {
        match self.tx.push(command) {
            Ok(()) => true,
            Err(PushError::Full(command)) => {
                self.dropped += 1;
                tracing::warn!(?command, dropped = self.dropped, "engine command queue full");
                false
            }
        }
    }

    pub fn start(&mut self) {
        if self.send(EngineCommand::Start) {
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        if self.send(EngineCommand::Stop) {
            self.running = false;
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Change tempo. Returns the tempo now in effect (clamped to 20-400).
    pub fn set_tempo(&mut self, bpm: f64) -> f64 {
        let Some(bpm) = clock::clamp_bpm(bpm) else {
            return self.bpm;
        };
        if bpm != self.bpm && self.send(EngineCommand::SetTempo { bpm }) {
            self.bpm = bpm;
        }
        self.bpm
    }

    /// Flip one step. Returns its new state, or `None` if nothing changed.
    pub fn toggle_step(&mut self, channel: ChannelId, step: usize) -> Option<bool> {
        let active = self.channels.toggle_step(channel, step)?;
        if self.send(EngineCommand::SetStep {
            channel,
            step,
            active,
        }) {
            Some(active)
        } else {
            self.channels.set_step(channel, step, !active);
            None
        }
    }

    /// Set gain (clamped to [0, 1]). Returns the value applied.
    pub fn set_gain(&mut self, channel: ChannelId, gain: f32) -> Option<f32> {
        let previous = self.channels.gain(channel)?;
        let gain = self.channels.set_gain(channel, gain)?;
        if self.send(EngineCommand::SetGain { channel, gain }) {
            Some(gain)
        } else {
            self.channels.set_gain(channel, previous);
            None
        }
    }

    /// Set pan (clamped to [0, 1], 0 = left). Returns the value applied.
    pub fn set_pan(&mut self, channel: ChannelId, pan: f32) -> Option<f32> {
        let previous = self.channels.pan(channel)?;
        let pan = self.channels.set_pan(channel, pan)?;
        if self.send(EngineCommand::SetPan { channel, pan }) {
            Some(pan)
        } else {
            self.channels.set_pan(channel, previous);
            None
        }
    }

    /// UI metadata only; the engine is not told.
    pub fn rename(&mut self, channel: ChannelId, name: impl Into<String>) -> bool {
        self.channels.rename(channel, name)
    }

    /// UI metadata only; the engine is not told.
    pub fn recolor(&mut self, channel: ChannelId, color: Rgb) -> bool {
        self.channels.recolor(channel, color)
    }

    pub fn meters(&self) -> MeterSnapshot {
        self.monitor.snapshot()
    }

    /// Step most recently played by the engine.
    pub fn current_step(&self) -> usize {
        self.monitor.current_step()
    }

    /// Transport state as last requested from this controller.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn monitor(&self) -> &Arc<EngineMonitor> {
        &self.monitor
    }

    pub fn dropped_commands(&self) -> u64 {
        self.dropped
    }

    /// Bounce `repeats` bars of the current pattern to a WAV file.
    pub fn export(&self, path: impl AsRef<Path>, repeats: usize) -> Result<ExportSummary> {
        let path = path.as_ref();
        let exporter = Exporter::new(self.bpm)
            .repeats(repeats)
            .sample_rate(self.config.sample_rate);

        match exporter.write(&self.channels, path) {
            Ok(summary) => {
                tracing::info!(
                    path = %summary.path.display(),
                    frames = summary.frames,
                    bytes = summary.bytes,
                    "export finished"
                );
                Ok(summary)
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "export failed");
                Err(err)
            }
        }
    }
}
