//! Lock-free state published by the render engine for the UI to poll.
//!
//! The audio thread stores, the UI thread loads; every field is a plain
//! atomic so neither side ever waits. f32/f64 values travel as their raw
//! bits.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};

/// Meter levels at one point in time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeterSnapshot {
    /// Smoothed peak per channel, in table order (0.0-1.0)
    pub channels: Vec<f32>,
    /// Smoothed peak of the stereo master output (0.0-1.0)
    pub master: f32,
}

/// Shared between one render engine and any number of readers.
#[derive(Debug)]
pub struct EngineMonitor {
    /// `channels` entries followed by the master level
    levels: Box<[AtomicU32]>,
    running: AtomicBool,
    current_step: AtomicUsize,
    elapsed: AtomicU64,
    bpm_bits: AtomicU64,
    active_voices: AtomicUsize,
    evicted_voices: AtomicU64,
}

impl EngineMonitor {
    pub fn new(channels: usize, bpm: f64) -> Self {
        Self {
            levels: (0..=channels).map(|_| AtomicU32::new(0)).collect(),
            running: AtomicBool::new(false),
            current_step: AtomicUsize::new(0),
            elapsed: AtomicU64::new(0),
            bpm_bits: AtomicU64::new(bpm.to_bits()),
            active_voices: AtomicUsize::new(0),
            evicted_voices: AtomicU64::new(0),
        }
    }

    /// Number of channel meters (master excluded).
    pub fn channel_count(&self) -> usize {
        self.levels.len() - 1
    }

    pub(crate) fn store_level(&self, index: usize, level: f32) {
        if let Some(slot) = self.levels.get(index) {
            slot.store(level.to_bits(), Ordering::Relaxed);
        }
    }

    pub(crate) fn store_master(&self, level: f32) {
        self.store_level(self.channel_count(), level);
    }

    pub(crate) fn store_transport(&self, running: bool, step: usize, elapsed: u64, bpm: f64) {
        self.running.store(running, Ordering::Relaxed);
        self.current_step.store(step, Ordering::Relaxed);
        self.elapsed.store(elapsed, Ordering::Relaxed);
        self.bpm_bits.store(bpm.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn store_voices(&self, active: usize, evicted: u64) {
        self.active_voices.store(active, Ordering::Relaxed);
        self.evicted_voices.store(evicted, Ordering::Relaxed);
    }

    /// Smoothed level for one channel, 0.0 for an unknown index.
    pub fn channel_level(&self, index: usize) -> f32 {
        if index >= self.channel_count() {
            return 0.0;
        }
        f32::from_bits(self.levels[index].load(Ordering::Relaxed))
    }

    pub fn master_level(&self) -> f32 {
        f32::from_bits(self.levels[self.channel_count()].load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        MeterSnapshot {
            channels: (0..self.channel_count())
                .map(|i| self.channel_level(i))
                .collect(),
            master: self.master_level(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn current_step(&self) -> usize {
        self.current_step.load(Ordering::Relaxed)
    }

    pub fn elapsed_samples(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    pub fn bpm(&self) -> f64 {
        f64::from_bits(self.bpm_bits.load(Ordering::Relaxed))
    }

    pub fn active_voices(&self) -> usize {
        self.active_voices.load(Ordering::Relaxed)
    }

    pub fn evicted_voices(&self) -> u64 {
        self.evicted_voices.load(Ordering::Relaxed)
    }
}
