//! Numeric helpers shared by the plant and the controller.

use core::f64::consts::{PI, TAU};

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics, so it can be used with bounds
/// computed at runtime. `NaN` passes through unchanged.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Wrap an angle into `(-π, π]`.
///
/// Angles already in range are returned unchanged. Non-finite angles pass
/// through.
///
/// ```
/// use cartpole::math::wrap_angle;
/// use std::f64::consts::PI;
///
/// assert_eq!(wrap_angle(-PI), PI);
/// assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
/// ```
pub fn wrap_angle(mut angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }

    if angle > PI || angle <= -PI {
        angle = (angle + PI).rem_euclid(TAU) - PI;
        if angle <= -PI {
            angle = PI;
        }
    }
    angle
}

/// Returns `true` if both values are non-zero and share a sign.
pub fn same_sign(a: f64, b: f64) -> bool {
    a * b > 0.
}

/// Continuous angle reconstructed from a stream of wrapped samples.
///
/// The plant keeps its angle in `(-π, π]`, which discards the winding number.
/// Feed every wrapped sample through [`UnwrappedAngle::push`] to keep counting
/// full rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnwrappedAngle {
    last: Option<f64>,
    value: f64,
}

impl UnwrappedAngle {
    /// Start tracking from an initial wrapped sample.
    pub fn new(initial: f64) -> Self {
        Self {
            last: Some(initial),
            value: initial,
        }
    }

    /// Accumulate the next wrapped sample and return the continuous angle.
    ///
    /// Consecutive samples are assumed to differ by less than `π`.
    pub fn push(&mut self, wrapped: f64) -> f64 {
        match self.last {
            Some(last) => self.value += wrap_angle(wrapped - last),
            None => self.value = wrapped,
        }
        self.last = Some(wrapped);
        self.value
    }

    /// Shift the continuous angle without treating it as a sample step.
    pub fn offset(&mut self, delta: f64) {
        self.value += delta;
        if let Some(last) = self.last.as_mut() {
            *last = wrap_angle(*last + delta);
        }
    }

    /// The continuous angle in radians.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of complete turns away from the starting orientation.
    pub fn rotations(&self) -> i64 {
        (self.value / TAU).trunc() as i64
    }
}
