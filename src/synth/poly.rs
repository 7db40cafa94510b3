use crate::{runtime::channels::ChannelId, voices::SampleBuffer};

use super::voice::Voice;

/// What happened to a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A free slot was used
    Started,
    /// The pool was full; the oldest voice was dropped to make room
    StoleOldest,
    /// Nothing to play (empty buffer)
    Skipped,
}

/// Fixed-capacity set of playing voices.
///
/// Storage is allocated once for `capacity` voices and never grows, so
/// triggering and mixing are allocation-free. Voices are kept in trigger
/// order; when the pool is full the oldest voice (lowest serial, front of
/// the list) is evicted.
pub struct VoicePool {
    voices: Vec<Voice>,
    capacity: usize,
    next_serial: u64,
    evicted: u64,
}

impl VoicePool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            voices: Vec::with_capacity(capacity),
            capacity,
            next_serial: 0,
            evicted: 0,
        }
    }

    /// Start a voice `offset` frames into the next rendered block.
    pub fn trigger(
        &mut self,
        buffer: &SampleBuffer,
        channel: ChannelId,
        gain: f32,
        pan: f32,
        offset: usize,
    ) -> TriggerOutcome {
        if buffer.is_empty() {
            return TriggerOutcome::Skipped;
        }

        let outcome = if self.voices.len() >= self.capacity {
            // Front is always the oldest: voices are pushed in serial order
            self.voices.remove(0);
            self.evicted += 1;
            TriggerOutcome::StoleOldest
        } else {
            TriggerOutcome::Started
        };

        let serial = self.next_serial;
        self.next_serial += 1;
        self.voices
            .push(Voice::new(buffer.clone(), channel, gain, pan, offset, serial));
        outcome
    }

    /// Mix every voice into `left`/`right` and drop the ones that finished.
    ///
    /// `channel_peaks[id]` is raised to each voice's block peak; ids outside
    /// the slice are ignored.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], channel_peaks: &mut [f32]) {
        for voice in self.voices.iter_mut() {
            let peak = voice.render(left, right);
            if let Some(slot) = channel_peaks.get_mut(voice.channel().0) {
                *slot = slot.max(peak);
            }
        }
        self.voices.retain(|v| !v.is_finished());
    }

    pub fn clear(&mut self) {
        self.voices.clear();
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total voices evicted since the pool was created.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(len: usize) -> SampleBuffer {
        SampleBuffer::new(vec![0.5; len], 44_100)
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut pool = VoicePool::new(64);
        let buf = buffer(1000);
        for i in 0..70 {
            pool.trigger(&buf, ChannelId(i % 5), 1.0, 0.5, 0);
        }
        assert_eq!(pool.len(), 64);
        assert_eq!(pool.evicted(), 6);

        let serials: Vec<u64> = pool.iter().map(|v| v.serial()).collect();
        assert_eq!(serials, (6..70).collect::<Vec<_>>());
    }

    #[test]
    fn test_trigger_outcomes() {
        let mut pool = VoicePool::new(1);
        let buf = buffer(10);
        assert_eq!(pool.trigger(&buf, ChannelId(0), 1.0, 0.5, 0), TriggerOutcome::Started);
        assert_eq!(pool.trigger(&buf, ChannelId(0), 1.0, 0.5, 0), TriggerOutcome::StoleOldest);
        assert_eq!(
            pool.trigger(&buffer(0), ChannelId(0), 1.0, 0.5, 0),
            TriggerOutcome::Skipped
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_finished_voices_are_dropped() {
        let mut pool = VoicePool::new(8);
        pool.trigger(&buffer(3), ChannelId(0), 1.0, 0.5, 0);
        pool.trigger(&buffer(100), ChannelId(1), 1.0, 0.5, 0);

        let mut l = [0.0; 16];
        let mut r = [0.0; 16];
        let mut peaks = [0.0; 2];
        pool.render(&mut l, &mut r, &mut peaks);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.iter().next().map(|v| v.channel()), Some(ChannelId(1)));
    }

    #[test]
    fn test_peaks_follow_recorded_channel() {
        let shared = buffer(32);
        let mut pool = VoicePool::new(8);
        pool.trigger(&shared, ChannelId(0), 0.2, 0.5, 0);
        pool.trigger(&shared, ChannelId(1), 0.8, 0.5, 0);

        let mut l = [0.0; 8];
        let mut r = [0.0; 8];
        let mut peaks = [0.0; 3];
        pool.render(&mut l, &mut r, &mut peaks);

        assert!((peaks[0] - 0.1).abs() < 1e-6);
        assert!((peaks[1] - 0.4).abs() < 1e-6);
        assert_eq!(peaks[2], 0.0);
    }

    #[test]
    fn test_capacity_never_grows() {
        let mut pool = VoicePool::new(4);
        let buf = buffer(10);
        for _ in 0..100 {
            pool.trigger(&buf, ChannelId(0), 1.0, 0.5, 0);
        }
        assert_eq!(pool.len(), 4);
        assert!(pool.voices.capacity() >= 4);
    }
}
