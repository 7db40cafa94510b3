//! Panning, summing and level helpers.

/*
Equal-Power Panning
===================

A mono voice is placed in the stereo field by splitting it into a left and a
right copy with complementary gains.

Vocabulary
----------

  pan           Position control from 0.0 to 1.0.
                  pan = 0.0  →  hard left
                  pan = 0.5  →  centre
                  pan = 1.0  →  hard right

  pan law       The curve that maps pan to the two channel gains.


Linear vs Equal-Power
---------------------

LINEAR:

    left  = 1.0 - pan
    right = pan

    At pan = 0.5 each side is at 50% amplitude. Two uncorrelated copies at
    50% carry only half the power of one copy at 100%, so a centred sound
    is perceived quieter than a hard-panned one.

EQUAL-POWER (what we implement):

    left  = cos(pan × π/2)
    right = sin(pan × π/2)

    left² + right² = 1 everywhere, so total power is constant.

    Gain
      1.0 ──╮                 ╭── 1.0
             ╲ left    right ╱
    0.707 ....╲.............╱....   ← both sides at √½ in the centre
               ╲_         _╱
      0.0        ─────────
          0.0      0.5      1.0
                   pan


Summing
-------

Voices are ADDED into the output block. Many voices at full scale can sum
well past ±1.0, which is why the engine clips after mixing and the exporter
normalizes.
*/

use std::f32::consts::FRAC_PI_2;

/// Equal-power left/right gains for `pan` in [0, 1].
///
/// Values outside the range are clamped.
#[inline]
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let angle = pan.clamp(0.0, 1.0) * FRAC_PI_2;
    (angle.cos(), angle.sin())
}

/// Add `input × gain` into `out`.
#[inline]
pub fn mix_scaled_into(out: &mut [f32], input: &[f32], gain: f32) {
    debug_assert_eq!(out.len(), input.len());

    for (o, &s) in out.iter_mut().zip(input.iter()) {
        *o += s * gain;
    }
}

/// Largest absolute sample value, 0.0 for an empty buffer.
#[inline]
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Scale a buffer so its peak absolute value is 1.0.
///
/// A silent buffer is left untouched. Returns the peak measured before
/// scaling.
pub fn normalize(buffer: &mut [f32]) -> f32 {
    let max = peak(buffer);
    if max > 0.0 && max.is_finite() {
        let scale = 1.0 / max;
        for sample in buffer.iter_mut() {
            *sample *= scale;
        }
    }
    max
}
