//! Audio output: a cpal stream, or a silent null sink when there is none.
//!
//! Either way the render engine keeps running at block rate, so meters and
//! the transport behave the same with or without hardware.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::{runtime::RenderEngine, synth::CommandReceiver, Error, Result};

/// Where rendered audio goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Device {
        name: String,
        sample_rate: u32,
        channels: u16,
    },
    /// Rendering continues, output is discarded
    Null { reason: String },
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Device {
                name,
                sample_rate,
                channels,
            } => write!(f, "{name} ({sample_rate} Hz, {channels} ch)"),
            OutputMode::Null { reason } => write!(f, "no output: {reason}"),
        }
    }
}

/// Engine handed to the audio callback exactly once.
type EngineSlot<R> = Arc<Mutex<Option<RenderEngine<R>>>>;

/// A running output. Dropping it stops audio.
pub struct AudioOutput {
    mode: OutputMode,
    _stream: Option<cpal::Stream>,
    _null: Option<NullWorker>,
}

impl AudioOutput {
    /// Open the default output device and start rendering `engine` into it.
    ///
    /// Never fails: without a usable device the engine is driven by a
    /// background thread and its output discarded.
    pub fn open<R>(engine: RenderEngine<R>) -> Self
    where
        R: CommandReceiver + Send + 'static,
    {
        let sample_rate = engine.config().sample_rate;
        let block_size = engine.config().block_size;
        let slot: EngineSlot<R> = Arc::new(Mutex::new(Some(engine)));

        match open_stream(Arc::clone(&slot), sample_rate) {
            Ok((stream, mode)) => {
                tracing::info!(%mode, "audio output started");
                Self {
                    mode,
                    _stream: Some(stream),
                    _null: None,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "audio output unavailable, rendering to null sink");
                let engine = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
                let null = match engine {
                    Some(engine) => NullWorker::spawn(engine, block_size, sample_rate),
                    None => {
                        tracing::error!("render engine was lost with the failed stream");
                        None
                    }
                };
                Self {
                    mode: OutputMode::Null {
                        reason: err.to_string(),
                    },
                    _stream: None,
                    _null: null,
                }
            }
        }
    }

    /// Drive `engine` with the null sink only, without touching any device.
    pub fn null<R>(engine: RenderEngine<R>, reason: impl Into<String>) -> Self
    where
        R: CommandReceiver + Send + 'static,
    {
        let sample_rate = engine.config().sample_rate;
        let block_size = engine.config().block_size;
        Self {
            mode: OutputMode::Null {
                reason: reason.into(),
            },
            _stream: None,
            _null: NullWorker::spawn(engine, block_size, sample_rate),
        }
    }

    pub fn mode(&self) -> &OutputMode {
        &self.mode
    }

    pub fn is_silent(&self) -> bool {
        matches!(self.mode, OutputMode::Null { .. })
    }
}

fn open_stream<R>(slot: EngineSlot<R>, sample_rate: u32) -> Result<(cpal::Stream, OutputMode)>
where
    R: CommandReceiver + Send + 'static,
{
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(Error::NoDevice)?;
    let name = device.name().unwrap_or_else(|_| "unknown device".to_string());

    // f32 configs whose rate range covers the engine rate; prefer stereo
    let candidates: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| Error::UnsupportedConfig(e.to_string()))?
        .filter(|range| range.sample_format() == cpal::SampleFormat::F32)
        .filter(|range| {
            range.min_sample_rate().0 <= sample_rate && sample_rate <= range.max_sample_rate().0
        })
        .collect();
    let range = candidates
        .iter()
        .find(|range| range.channels() == 2)
        .or_else(|| candidates.first())
        .cloned()
        .ok_or_else(|| {
            Error::UnsupportedConfig(format!("{name} has no f32 output at {sample_rate} Hz"))
        })?;

    let channels = range.channels();
    let config = cpal::StreamConfig {
        channels,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let frame_channels = channels as usize;
    let mut engine: Option<RenderEngine<R>> = None;
    let reported = AtomicBool::new(false);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                // Never block the audio thread: keep trying until the engine is ours
                if engine.is_none() {
                    if let Ok(mut guard) = slot.try_lock() {
                        engine = guard.take();
                    }
                }
                match engine.as_mut() {
                    Some(engine) => engine.render_interleaved(data, frame_channels),
                    None => data.fill(0.0),
                }
            },
            move |err| {
                if !reported.swap(true, Ordering::Relaxed) {
                    tracing::error!(error = %err, "audio stream error");
                }
            },
            None,
        )
        .map_err(|e| Error::Stream(e.to_string()))?;

    stream.play().map_err(|e| Error::Stream(e.to_string()))?;

    Ok((
        stream,
        OutputMode::Device {
            name,
            sample_rate,
            channels,
        },
    ))
}

/// Renders on a plain thread at roughly real-time pace and drops the audio.
struct NullWorker {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl NullWorker {
    fn spawn<R>(mut engine: RenderEngine<R>, block_size: usize, sample_rate: u32) -> Option<Self>
    where
        R: CommandReceiver + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let period = Duration::from_secs_f64(block_size as f64 / sample_rate.max(1) as f64);

        let spawned = thread::Builder::new()
            .name("stepbox-null-sink".into())
            .spawn(move || {
                let mut left = vec![0.0f32; block_size];
                let mut right = vec![0.0f32; block_size];
                while !flag.load(Ordering::Relaxed) {
                    engine.render(&mut left, &mut right);
                    thread::sleep(period);
                }
            });

        match spawned {
            Ok(handle) => Some(Self {
                shutdown,
                handle: Some(handle),
            }),
            Err(err) => {
                tracing::error!(error = %err, "failed to start null sink thread");
                None
            }
        }
    }
}

impl Drop for NullWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{config::EngineConfig, runtime::ChannelTable, synth::EngineCommand};

    #[test]
    fn test_null_sink_keeps_rendering() {
        let mut queue = VecDeque::new();
        queue.push_back(EngineCommand::Start);
        let config = EngineConfig::default().block_size(64);
        let engine = RenderEngine::new(config, ChannelTable::new(), queue);
        let monitor = engine.monitor();

        let output = AudioOutput::null(engine, "test");
        assert!(output.is_silent());

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while monitor.elapsed_samples() == 0 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(monitor.is_running());
        assert!(monitor.elapsed_samples() > 0);
    }

    #[test]
    fn test_mode_display() {
        let mode = OutputMode::Null {
            reason: "no device".into(),
        };
        assert_eq!(mode.to_string(), "no output: no device");
    }
}
