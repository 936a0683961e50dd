//! Time sources for driving the control loop.

use std::time::Instant;

/// Monotonic time in seconds since the start of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub f64);

impl Time {
    pub fn as_secs(self) -> f64 {
        self.0
    }
}

/// Source of monotonic time for the controller.
pub trait Clock {
    /// Advance past a step of `dt` seconds and return the current time.
    fn tick(&mut self, dt: f64) -> Time;

    /// Current time without advancing.
    fn now(&self) -> Time;

    /// Restart from zero.
    fn reset(&mut self);
}

/// Clock that advances by exactly the requested step.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedClock {
    time: Time,
}

impl Clock for SimulatedClock {
    fn tick(&mut self, dt: f64) -> Time {
        self.time.0 += dt;
        self.time
    }

    fn now(&self) -> Time {
        self.time
    }

    fn reset(&mut self) {
        self.time = Time::default();
    }
}

/// Wall clock measured from its creation or last reset.
///
/// The requested step is ignored, so a slow or irregular driver shows up as
/// irregular sampling in the controller.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn tick(&mut self, _dt: f64) -> Time {
        self.now()
    }

    fn now(&self) -> Time {
        Time(self.start.elapsed().as_secs_f64())
    }

    fn reset(&mut self) {
        self.start = Instant::now();
    }
}
