use std::fmt;

use crate::STEPS_PER_BAR;

/// One bar of on/off steps for a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepPattern {
    steps: [bool; STEPS_PER_BAR],
}

impl StepPattern {
    /// An empty bar.
    pub const fn new() -> Self {
        Self {
            steps: [false; STEPS_PER_BAR],
        }
    }

    /// Every step on.
    pub const fn full() -> Self {
        Self {
            steps: [true; STEPS_PER_BAR],
        }
    }

    /// Build from 0/1 values, e.g. `[1,0,0,0, 1,0,0,0, ...]`.
    ///
    /// Missing trailing values are off; extra values are ignored.
    pub fn from_slice(values: &[u8]) -> Self {
        let mut pattern = Self::new();
        for (step, &value) in values.iter().take(STEPS_PER_BAR).enumerate() {
            pattern.steps[step] = value != 0;
        }
        pattern
    }

    /// Build from zero-based indices of active steps. Out-of-range indices
    /// are ignored.
    pub fn from_active(indices: &[usize]) -> Self {
        let mut pattern = Self::new();
        for &step in indices {
            pattern.set(step, true);
        }
        pattern
    }

    /// Whether `step` is on. Out-of-range steps are off.
    #[inline]
    pub fn is_active(&self, step: usize) -> bool {
        self.steps.get(step).copied().unwrap_or(false)
    }

    /// Set a step. Returns `false` if `step` is out of range.
    pub fn set(&mut self, step: usize, active: bool) -> bool {
        match self.steps.get_mut(step) {
            Some(slot) => {
                *slot = active;
                true
            }
            None => false,
        }
    }

    /// Flip a step, returning its new value.
    pub fn toggle(&mut self, step: usize) -> Option<bool> {
        let slot = self.steps.get_mut(step)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn clear(&mut self) {
        self.steps = [false; STEPS_PER_BAR];
    }

    /// Zero-based indices of active steps, in order.
    pub fn active_steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter(|&(_, &on)| on)
            .map(|(step, _)| step)
    }

    pub fn count(&self) -> usize {
        self.steps.iter().filter(|&&on| on).count()
    }

    pub fn as_array(&self) -> &[bool; STEPS_PER_BAR] {
        &self.steps
    }
}

impl fmt::Display for StepPattern {
    /// `x` for an active step, `.` for a rest, grouped by beat.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (step, &on) in self.steps.iter().enumerate() {
            if step > 0 && step % 4 == 0 {
                f.write_str(" ")?;
            }
            f.write_str(if on { "x" } else { "." })?;
        }
        Ok(())
    }
}
