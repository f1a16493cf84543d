//! Command ramping
//!
//! A ramp rate-limits how fast a commanded value may move toward its target, turning step
//! demands into `_/--\_` profiles instead of `_|--|_`. One ramp instance serves one axis (power
//! or turn) and persists across calls within a control sequence.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A per-axis ramp accumulator.
///
/// The accumulator holds the fractional command value between ticks, so sub-unit rates (e.g.
/// 0.1 per tick) still make integer progress over several ticks. If the accumulator is found to
/// disagree with the actual current command - because some other call site commanded the axis
/// directly - it is resynchronised to the current value before stepping, which prevents a stale
/// accumulator from producing a runaway jump.
#[derive(Debug, Default, Clone)]
pub struct Ramp {
    accum: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Ramp {
    /// Advance from `current` toward `target` by at most `rate`, returning the new integer
    /// command.
    ///
    /// Ascending values are floored and descending values are ceiled, so the returned command
    /// never runs ahead of the accumulator. Once `current == target` the target is returned
    /// unchanged.
    pub fn advance(&mut self, current: i16, target: i16, rate: f64) -> i16 {
        if current < target {
            // Resynchronise if the accumulator has diverged from the actual command
            if self.accum.floor() as i16 != current {
                self.accum = current as f64;
            }

            self.accum += rate;

            let next = self.accum.floor() as i16;
            if next >= target {
                self.accum = target as f64;
                return target;
            }
            next
        } else if current > target {
            if self.accum.ceil() as i16 != current {
                self.accum = current as f64;
            }

            self.accum -= rate;

            let next = self.accum.ceil() as i16;
            if next <= target {
                self.accum = target as f64;
                return target;
            }
            next
        } else {
            current
        }
    }

    /// Zero the accumulator (segment entry).
    pub fn reset(&mut self) {
        self.accum = 0.0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
