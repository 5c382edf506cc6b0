//! Fixed-timestep accumulator.

use gametime::TimeSpan;

/// Splits wall-clock frame times into whole update steps.
///
/// Time that does not fill a step is carried over to the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStep {
    interval: TimeSpan,
    accumulated: TimeSpan,
}

impl FixedStep {
    /// Creates an accumulator with nothing carried over.
    #[must_use]
    pub const fn new(interval: TimeSpan) -> Self {
        Self {
            interval,
            accumulated: TimeSpan::ZERO,
        }
    }

    /// Length of one step.
    #[must_use]
    pub const fn interval(&self) -> TimeSpan {
        self.interval
    }

    /// Time carried over, always shorter than one step.
    #[must_use]
    pub const fn carried(&self) -> TimeSpan {
        self.accumulated
    }

    /// Drops the carried time.
    pub const fn reset(&mut self) {
        self.accumulated = TimeSpan::ZERO;
    }

    /// Adds `elapsed` and returns how many whole steps are now due.
    ///
    /// A non-positive interval never yields a step.
    pub fn accumulate(&mut self, elapsed: TimeSpan) -> u32 {
        if self.interval <= TimeSpan::ZERO {
            return 0;
        }
        if elapsed > TimeSpan::ZERO {
            self.accumulated += elapsed;
        }
        let mut steps = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            steps += 1;
        }
        steps
    }
}
