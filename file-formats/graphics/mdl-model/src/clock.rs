//! The looping animation clock.
//!
//! The clock accumulates simulation time into a normalized blend phase in
//! `[0, 1)` representing the position within one animation loop. It is
//! advanced only from the fixed-timestep driver, never from a variable-rate
//! render callback, so blend motion is independent of rendering frame rate.

/// Default animation rate of the reference player, in loops per second.
///
/// One loop therefore takes `1.0 / DEFAULT_LOOP_RATE` ≈ 1.333 seconds.
pub const DEFAULT_LOOP_RATE: f32 = 0.75;

/// A stateful accumulator deriving the wrapping blend phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    cycle_duration: f32,
    phase: f32,
}

impl AnimationClock {
    /// Create a clock whose loop completes in `cycle_duration` seconds.
    ///
    /// `cycle_duration` must be positive; non-positive values are clamped
    /// to the smallest positive increment rather than producing NaN phases.
    pub fn new(cycle_duration: f32) -> Self {
        Self {
            cycle_duration: cycle_duration.max(f32::EPSILON),
            phase: 0.0,
        }
    }

    /// Create a clock running at `loops_per_second` loops per second.
    pub fn from_rate(loops_per_second: f32) -> Self {
        Self::new(1.0 / loops_per_second)
    }

    /// Advance the clock by `delta_time` seconds and wrap the phase back
    /// into `[0, 1)`.
    ///
    /// Negative deltas are treated as zero, so the phase invariant holds
    /// for every input. Always succeeds.
    pub fn advance(&mut self, delta_time: f32) {
        self.phase += delta_time.max(0.0) / self.cycle_duration;
        self.phase -= self.phase.floor();
        // Rounding in the subtraction above can land exactly on 1.0 when
        // the phase sits just below a whole number of loops.
        if self.phase >= 1.0 {
            self.phase = 0.0;
        }
    }

    /// Current blend phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Loop duration in seconds.
    pub fn cycle_duration(&self) -> f32 {
        self.cycle_duration
    }

    /// Rewind the clock to the start of the loop.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl Default for AnimationClock {
    /// A clock running at [`DEFAULT_LOOP_RATE`].
    fn default() -> Self {
        Self::new(1.0 / DEFAULT_LOOP_RATE)
    }
}
