//! Offline export to 16-bit stereo WAV.
//!
//! The exporter does its own mixdown from a [`ChannelTable`] on a grid
//! anchored at sample 0, independent of any running render engine:
//!
//! ```text
//!   frames  = floor(repeats * 16 * samples_per_step)
//!   hit k   @ floor(k * samples_per_step),  k = repeat * 16 + step
//! ```
//!
//! The mix is normalized to a peak of 1.0, clipped, and encoded with
//! `round(s * 32767)`.

use std::{
    fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::{
    dsp::{clip::clip_buffer, mix},
    runtime::channels::ChannelTable,
    sequencing::clock::{self, samples_per_step},
    Error, Result, SAMPLE_RATE, STEPS_PER_BAR,
};

/// Deinterleaved stereo audio.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StereoBuffer {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl StereoBuffer {
    pub fn silent(frames: usize) -> Self {
        Self {
            left: vec![0.0; frames],
            right: vec![0.0; frames],
        }
    }

    pub fn frames(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn peak(&self) -> f32 {
        mix::peak(&self.left).max(mix::peak(&self.right))
    }

    /// Scale both channels by the same factor so the joint peak is 1.0.
    ///
    /// Returns the peak before scaling; a silent buffer is unchanged.
    pub fn normalize(&mut self) -> f32 {
        let max = self.peak();
        if max > 0.0 && max.is_finite() {
            let scale = 1.0 / max;
            for s in self.left.iter_mut().chain(self.right.iter_mut()) {
                *s *= scale;
            }
        }
        max
    }

    pub fn clip(&mut self) {
        clip_buffer(&mut self.left);
        clip_buffer(&mut self.right);
    }
}

/// Result of a successful [`Exporter::write`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    /// Stereo frames written
    pub frames: usize,
    /// File size in bytes, header included
    pub bytes: usize,
    /// Mixdown peak before normalization (can exceed 1.0)
    pub peak_before_normalize: f32,
}

/// Stereo PCM format used for every export.
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

#[inline]
fn to_i16(sample: f32) -> i16 {
    (sample * 32767.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Encode a stereo buffer as a complete WAV file in memory.
pub fn encode_wav(buffer: &StereoBuffer, sample_rate: u32) -> Result<Vec<u8>> {
    let frames = buffer.frames();
    let mut cursor = Cursor::new(Vec::with_capacity(44 + frames * 4));
    {
        let mut writer = WavWriter::new(&mut cursor, wav_spec(sample_rate))?;
        for (&l, &r) in buffer.left[..frames].iter().zip(&buffer.right[..frames]) {
            writer.write_sample(to_i16(l))?;
            writer.write_sample(to_i16(r))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Sibling path the export is staged in before the final rename.
fn partial_path(path: &Path) -> io::Result<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("export path has no file name: {}", path.display()),
            )
        })?
        .to_os_string();
    name.push(".partial");
    Ok(path.with_file_name(name))
}

/// Write `bytes` so that `path` either holds all of them or does not exist.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let partial = partial_path(path)?;
    let result = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, path));
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

/// Offline bounce of a channel table.
///
/// ```ignore
/// let summary = Exporter::new(140.0).repeats(4).write(&table, "loop.wav")?;
/// ```
#[derive(Debug, Clone)]
pub struct Exporter {
    bpm: f64,
    repeats: usize,
    sample_rate: u32,
    cancel: Option<Arc<AtomicBool>>,
}

impl Exporter {
    /// Tempo is clamped like the live clock; NaN falls back to the default.
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: clock::clamp_bpm(bpm).unwrap_or(clock::DEFAULT_BPM),
            repeats: 1,
            sample_rate: SAMPLE_RATE,
            cancel: None,
        }
    }

    /// Number of bars to render (at least 1).
    pub fn repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats.max(1);
        self
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate.max(1);
        self
    }

    /// Abort with [`Error::Cancelled`] once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Frames in the rendered file.
    pub fn frame_count(&self) -> usize {
        let sps = samples_per_step(self.bpm, self.sample_rate as f64);
        (self.repeats as f64 * STEPS_PER_BAR as f64 * sps).floor() as usize
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Raw mixdown: every active step of every channel, gain and pan applied.
    fn mixdown(&self, table: &ChannelTable) -> Result<StereoBuffer> {
        let sps = samples_per_step(self.bpm, self.sample_rate as f64);
        let frames = self.frame_count();
        let mut out = StereoBuffer::silent(frames);

        for repeat in 0..self.repeats {
            if self.is_cancelled() {
                return Err(Error::Cancelled);
            }

            for step in 0..STEPS_PER_BAR {
                let k = repeat * STEPS_PER_BAR + step;
                let start = (k as f64 * sps).floor() as usize;
                if start >= frames {
                    continue;
                }

                for id in table.ids() {
                    if !table.is_step_active(id, step) {
                        continue;
                    }
                    let (Some(buffer), Some(gain), Some(pan)) =
                        (table.buffer(id), table.gain(id), table.pan(id))
                    else {
                        continue;
                    };

                    // Hits running past the end are truncated
                    let len = buffer.len().min(frames - start);
                    let src = &buffer.samples()[..len];
                    let (lg, rg) = mix::pan_gains(pan);
                    mix::mix_scaled_into(&mut out.left[start..start + len], src, gain * lg);
                    mix::mix_scaled_into(&mut out.right[start..start + len], src, gain * rg);
                }
            }
        }

        Ok(out)
    }

    /// Normalized, clipped mixdown.
    pub fn render(&self, table: &ChannelTable) -> Result<StereoBuffer> {
        let mut buffer = self.mixdown(table)?;
        buffer.normalize();
        buffer.clip();
        Ok(buffer)
    }

    /// Render and encode to WAV bytes.
    pub fn encode(&self, table: &ChannelTable) -> Result<Vec<u8>> {
        encode_wav(&self.render(table)?, self.sample_rate)
    }

    /// Render, encode and write to `path`.
    ///
    /// The file is staged as `<path>.partial` and renamed into place, so on
    /// any error no file is left at either location.
    pub fn write(&self, table: &ChannelTable, path: impl AsRef<Path>) -> Result<ExportSummary> {
        let path = path.as_ref();

        let mut buffer = self.mixdown(table)?;
        let peak_before_normalize = buffer.normalize();
        buffer.clip();
        let bytes = encode_wav(&buffer, self.sample_rate)?;

        write_atomic(path, &bytes)?;

        Ok(ExportSummary {
            path: path.to_path_buf(),
            frames: buffer.frames(),
            bytes: bytes.len(),
            peak_before_normalize,
        })
    }
}
