//! Sequencer clock - sample-accurate step boundaries
//!
//! The clock runs inside the render engine and converts tempo into the exact
//! sample positions at which sixteenth-note steps fire. It only moves when
//! the engine advances it by a whole block, so tempo changes and transport
//! commands always land on block boundaries.

use crate::STEPS_PER_BAR;

/// Slowest accepted tempo.
pub const MIN_BPM: f64 = 20.0;
/// Fastest accepted tempo.
pub const MAX_BPM: f64 = 400.0;
/// Tempo used when none (or NaN) is given.
pub const DEFAULT_BPM: f64 = 140.0;

/// Clamp a tempo into `[MIN_BPM, MAX_BPM]`. NaN is rejected.
pub fn clamp_bpm(bpm: f64) -> Option<f64> {
    if bpm.is_nan() {
        None
    } else {
        Some(bpm.clamp(MIN_BPM, MAX_BPM))
    }
}

/// Samples in one sixteenth note: `(60 / bpm / 4) * sample_rate`.
#[inline]
pub fn samples_per_step(bpm: f64, sample_rate: f64) -> f64 {
    (60.0 / bpm / 4.0) * sample_rate
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
}

/// A step boundary that fell inside the block just advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTrigger {
    /// Position in the bar (0-15)
    pub step: usize,
    /// Absolute step count since start
    pub index: u64,
    /// Frame offset inside the block
    pub offset: usize,
}

/// Tempo-driven step clock.
///
/// Step `k` fires at `floor(anchor_sample + (k - anchor_step) * samples_per_step)`.
/// The anchor is (0, 0) from a cold start, so without tempo changes step `k`
/// is simply `floor(k * samples_per_step)`. A tempo change moves the anchor
/// to the current position, keeping the phase inside the current step.
#[derive(Debug, Clone)]
pub struct SequencerClock {
    /// Tempo in beats per minute
    bpm: f64,
    /// Audio sample rate
    sample_rate: f64,
    /// Samples per sixteenth (computed from bpm and sample_rate)
    samples_per_step: f64,
    state: TransportState,
    /// Samples advanced since start
    elapsed: u64,
    /// Grid anchor: sample position of `anchor_step`
    anchor_sample: f64,
    anchor_step: u64,
    /// Next step that has not fired yet
    next_step: u64,
    /// Bar position of the most recently fired step
    current_step: usize,
}

impl SequencerClock {
    pub fn new(bpm: f64, sample_rate: u32) -> Self {
        let bpm = clamp_bpm(bpm).unwrap_or(DEFAULT_BPM);
        let sample_rate = sample_rate.max(1) as f64;

        Self {
            bpm,
            sample_rate,
            samples_per_step: samples_per_step(bpm, sample_rate),
            state: TransportState::Stopped,
            elapsed: 0,
            anchor_sample: 0.0,
            anchor_step: 0,
            next_step: 0,
            current_step: 0,
        }
    }

    fn reset(&mut self) {
        self.elapsed = 0;
        self.anchor_sample = 0.0;
        self.anchor_step = 0;
        self.next_step = 0;
        self.current_step = 0;
    }

    /// STOPPED → RUNNING from the top of the bar.
    ///
    /// Returns `false` (and changes nothing) if already running.
    pub fn start(&mut self) -> bool {
        if self.state == TransportState::Running {
            return false;
        }
        self.reset();
        self.state = TransportState::Running;
        true
    }

    /// Stop and rewind. Returns whether the clock was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.state == TransportState::Running;
        self.reset();
        self.state = TransportState::Stopped;
        was_running
    }

    /// Change tempo, returning the tempo now in effect.
    ///
    /// The value is clamped to `[MIN_BPM, MAX_BPM]`; NaN leaves the tempo
    /// unchanged.
    pub fn set_bpm(&mut self, bpm: f64) -> f64 {
        let Some(bpm) = clamp_bpm(bpm) else {
            return self.bpm;
        };
        if bpm == self.bpm {
            return bpm;
        }

        let position = self.step_position();
        let whole = position.floor();
        let phase = position - whole;

        self.bpm = bpm;
        self.samples_per_step = samples_per_step(bpm, self.sample_rate);
        self.anchor_step = whole as u64;
        self.anchor_sample = self.elapsed as f64 - phase * self.samples_per_step;
        bpm
    }

    /// Fractional step position at the current elapsed sample.
    pub fn step_position(&self) -> f64 {
        self.anchor_step as f64 + (self.elapsed as f64 - self.anchor_sample) / self.samples_per_step
    }

    /// Sample at which step `index` fires under the current anchor.
    #[inline]
    pub fn step_sample(&self, index: u64) -> u64 {
        let pos = self.anchor_sample + (index as f64 - self.anchor_step as f64) * self.samples_per_step;
        pos.max(0.0).floor() as u64
    }

    /// Advance by one block of `frames`, reporting every step boundary in
    /// `[elapsed, elapsed + frames)` in order.
    ///
    /// Does nothing while stopped.
    pub fn advance(&mut self, frames: usize, mut on_trigger: impl FnMut(StepTrigger)) {
        if self.state != TransportState::Running {
            return;
        }

        let start = self.elapsed;
        let end = start + frames as u64;

        loop {
            let at = self.step_sample(self.next_step);
            if at >= end {
                break;
            }

            let step = (self.next_step % STEPS_PER_BAR as u64) as usize;
            on_trigger(StepTrigger {
                step,
                index: self.next_step,
                offset: at.saturating_sub(start) as usize,
            });

            self.current_step = step;
            self.next_step += 1;
        }

        self.elapsed = end;
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn samples_per_step(&self) -> f64 {
        self.samples_per_step
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TransportState::Running
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn next_step_index(&self) -> u64 {
        self.next_step
    }
}
