use crate::{dsp::mix::pan_gains, runtime::channels::ChannelId, voices::SampleBuffer};

/// One playing instance of a channel's buffer.
///
/// The voice records the channel that triggered it, so meters are attributed
/// by id even when several channels share the same buffer.
#[derive(Debug, Clone)]
pub struct Voice {
    buffer: SampleBuffer,
    channel: ChannelId,
    /// Next sample to read from `buffer`
    cursor: usize,
    /// Frames to skip in the next rendered block (intra-block trigger offset)
    delay: usize,
    gain: f32,
    left_gain: f32,
    right_gain: f32,
    /// Monotonic trigger order; lower is older
    serial: u64,
}

impl Voice {
    pub fn new(
        buffer: SampleBuffer,
        channel: ChannelId,
        gain: f32,
        pan: f32,
        offset: usize,
        serial: u64,
    ) -> Self {
        let (left_gain, right_gain) = pan_gains(pan);
        Self {
            buffer,
            channel,
            cursor: 0,
            delay: offset,
            gain,
            left_gain,
            right_gain,
            serial,
        }
    }

    /// Add this voice's next block into `left`/`right`.
    ///
    /// Returns the peak of the gain-scaled (pre-pan) signal written.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) -> f32 {
        let frames = left.len().min(right.len());
        if self.delay >= frames {
            self.delay -= frames;
            return 0.0;
        }

        let start = self.delay;
        let count = self.remaining().min(frames - start);
        let src = &self.buffer.samples()[self.cursor..self.cursor + count];

        let mut peak = 0.0f32;
        for ((&s, l), r) in src
            .iter()
            .zip(left[start..start + count].iter_mut())
            .zip(right[start..start + count].iter_mut())
        {
            let v = s * self.gain;
            *l += v * self.left_gain;
            *r += v * self.right_gain;
            peak = peak.max(v.abs());
        }

        self.cursor += count;
        self.delay = 0;
        peak
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }
}
