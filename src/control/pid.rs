use super::Gains;
use crate::math::{clamp, same_sign, wrap_angle};

/// Step assumed for the first sample, when there is no previous time.
const DEFAULT_DT: f64 = 0.016;

const MIN_DT: f64 = 0.001;
const MAX_DT: f64 = 0.1;

const INTEGRAL_LIMIT: f64 = 100.;
const OUTPUT_LIMIT: f64 = 50.;

/// Weight of the newest sample in the derivative low-pass filter.
const DERIVATIVE_FILTER_ALPHA: f64 = 0.1;

/// Share of the last integral increment removed while saturated.
const BACK_CALCULATION_FACTOR: f64 = 0.5;

/// PID controller with a filtered derivative and anti-windup.
///
/// Time is supplied by the caller on every [`PidController::calculate`], in
/// seconds from any monotonic origin.
///
/// ```
/// use cartpole::control::PidController;
///
/// let mut pid = PidController::new(1000., 0., 0.);
/// assert_eq!(pid.calculate(0., 0.5, 0.), -50.);
/// ```
#[derive(Clone, Debug)]
pub struct PidController {
    gains: Gains,
    use_angle_wrapping: bool,
    derivative_filtering: bool,
    back_calculation: bool,
    integral: f64,
    previous_error: f64,
    previous_time: Option<f64>,
    filtered_derivative: f64,
}

impl Default for PidController {
    fn default() -> Self {
        Self::new(100., 1., 50.)
    }
}

impl PidController {
    /// Create a controller with derivative filtering, back-calculation and
    /// angle wrapping enabled.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            gains: Gains::new(kp, ki, kd),
            use_angle_wrapping: true,
            derivative_filtering: true,
            back_calculation: true,
            integral: 0.,
            previous_error: 0.,
            previous_time: None,
            filtered_derivative: 0.,
        }
    }

    /// Compute the control output for `process_variable` at `current_time`.
    ///
    /// The output is saturated to `[-50, 50]` and the integral is kept within
    /// `[-100, 100]`.
    pub fn calculate(&mut self, setpoint: f64, process_variable: f64, current_time: f64) -> f64 {
        let mut error = setpoint - process_variable;
        if self.use_angle_wrapping {
            error = wrap_angle(error);
        }

        let dt = match self.previous_time {
            Some(previous_time) => current_time - previous_time,
            None => DEFAULT_DT,
        };
        let dt = clamp(dt, MIN_DT, MAX_DT);

        let p = self.gains.kp * error;

        self.integral = clamp(self.integral + error * dt, -INTEGRAL_LIMIT, INTEGRAL_LIMIT);
        let i = self.gains.ki * self.integral;

        let raw_derivative = (error - self.previous_error) / dt;
        self.filtered_derivative = if self.derivative_filtering {
            DERIVATIVE_FILTER_ALPHA * raw_derivative
                + (1. - DERIVATIVE_FILTER_ALPHA) * self.filtered_derivative
        } else {
            raw_derivative
        };
        let d = self.gains.kd * self.filtered_derivative;

        let output = p + i + d;
        let saturated = clamp(output, -OUTPUT_LIMIT, OUTPUT_LIMIT);

        if saturated != output {
            #[cfg(feature = "tracing")]
            tracing::trace!(output, saturated, "Controller output saturated");

            if self.back_calculation && same_sign(error, self.integral) {
                self.integral = clamp(
                    self.integral - error * dt * BACK_CALCULATION_FACTOR,
                    -INTEGRAL_LIMIT,
                    INTEGRAL_LIMIT,
                );
            }
        }

        self.previous_error = error;
        self.previous_time = Some(current_time);
        saturated
    }

    /// Clear the integral, derivative and timing state.
    ///
    /// The next [`PidController::calculate`] is treated as the first sample.
    pub fn reset(&mut self) {
        self.integral = 0.;
        self.previous_error = 0.;
        self.previous_time = None;
        self.filtered_derivative = 0.;

        #[cfg(feature = "tracing")]
        tracing::debug!("Reset controller");
    }

    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) {
        self.gains = Gains::new(kp, ki, kd);

        #[cfg(feature = "tracing")]
        tracing::trace!(kp, ki, kd, "Set gains");
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    /// Wrap the error into `(-π, π]` before use.
    ///
    /// Enable this when the process variable is an angle, so that a target
    /// of `0` and a measurement near `±π` produce a small error.
    pub fn set_angle_wrapping(&mut self, enabled: bool) {
        self.use_angle_wrapping = enabled;
    }

    pub fn angle_wrapping(&self) -> bool {
        self.use_angle_wrapping
    }

    /// Low-pass filter the derivative term. When disabled the raw
    /// backward difference is used.
    pub fn set_derivative_filtering(&mut self, enabled: bool) {
        self.derivative_filtering = enabled;
    }

    /// Bleed off the integral while the output is saturated. When disabled
    /// the integral is only bounded by its hard clamp.
    pub fn set_back_calculation(&mut self, enabled: bool) {
        self.back_calculation = enabled;
    }

    /// Accumulated error·time.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Returns `true` once a sample has been taken since creation or the last reset.
    pub fn is_running(&self) -> bool {
        self.previous_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn it_computes_proportional_term() {
        let mut pid = PidController::new(2., 0., 0.);
        assert_close(pid.calculate(1., 0.25, 1.), 1.5);
    }

    #[test]
    fn first_sample_uses_default_dt() {
        let mut pid = PidController::new(0., 1., 0.);
        pid.calculate(1., 0., 42.);
        assert_close(pid.integral(), DEFAULT_DT);
        assert!(pid.is_running());
    }

    #[test]
    fn it_clamps_dt() {
        let mut pid = PidController::new(0., 1., 0.);
        pid.calculate(1., 0., 1.);
        pid.calculate(1., 0., 5.);
        assert_close(pid.integral(), DEFAULT_DT + MAX_DT);

        pid.calculate(1., 0., 5.);
        assert_close(pid.integral(), DEFAULT_DT + MAX_DT + MIN_DT);
    }

    #[test]
    fn it_filters_derivative() {
        let mut pid = PidController::new(0., 0., 1.);
        pid.set_angle_wrapping(false);

        // Raw derivative of the first sample: 1 / 0.016.
        let out = pid.calculate(1., 0., 0.);
        assert_close(out, DERIVATIVE_FILTER_ALPHA / DEFAULT_DT);

        let out = pid.calculate(1., 0., 0.01);
        assert_close(out, (1. - DERIVATIVE_FILTER_ALPHA) * DERIVATIVE_FILTER_ALPHA / DEFAULT_DT);
    }

    #[test]
    fn it_uses_raw_derivative_when_filtering_is_disabled() {
        let mut pid = PidController::new(0., 0., 0.01);
        pid.set_derivative_filtering(false);
        pid.calculate(0., 0., 0.);
        assert_close(pid.calculate(0., -0.1, 0.01), 0.1);
    }

    #[test]
    fn it_saturates_output() {
        let mut pid = PidController::new(1000., 0., 0.);
        assert_eq!(pid.calculate(0., 0.3, 0.), -50.);
        assert_eq!(pid.calculate(0., -0.3, 0.01), 50.);
    }

    #[test]
    fn integral_stays_bounded() {
        let mut pid = PidController::new(0., 1., 0.);
        pid.set_angle_wrapping(false);
        pid.set_back_calculation(false);
        let mut time = 0.;
        for _ in 0..1_000 {
            time += 0.1;
            pid.calculate(1_000., 0., time);
            assert!(pid.integral() <= INTEGRAL_LIMIT);
        }
        assert_eq!(pid.integral(), INTEGRAL_LIMIT);

        for _ in 0..1_000 {
            time += 0.1;
            pid.calculate(-1_000., 0., time);
            assert!(pid.integral() >= -INTEGRAL_LIMIT);
        }
        assert_eq!(pid.integral(), -INTEGRAL_LIMIT);
    }

    #[test]
    fn integral_stays_bounded_with_back_calculation() {
        let mut pid = PidController::new(1., 1., 1.);
        pid.set_angle_wrapping(false);
        let mut time = 0.;
        for i in 0..1_000 {
            time += 0.05 * (i % 4) as f64;
            let setpoint = if i % 7 < 4 { 1e4 } else { -1e4 };
            pid.calculate(setpoint, 0., time);
            assert!(pid.integral().abs() <= INTEGRAL_LIMIT, "{}", pid.integral());
        }
    }

    #[test]
    fn back_calculation_bleeds_integral_while_saturated() {
        let mut pid = PidController::new(100., 0., 0.);
        pid.set_angle_wrapping(false);

        // error = 1, dt = 0.016: integral += 0.016, then -= 0.008.
        pid.calculate(1., 0., 0.);
        assert_close(pid.integral(), DEFAULT_DT * (1. - BACK_CALCULATION_FACTOR));

        pid.set_back_calculation(false);
        pid.reset();
        pid.calculate(1., 0., 0.);
        assert_close(pid.integral(), DEFAULT_DT);
    }

    #[test]
    fn back_calculation_skips_unsaturated_output() {
        let mut pid = PidController::new(1., 0., 0.);
        pid.calculate(1., 0., 0.);
        assert_close(pid.integral(), DEFAULT_DT);
    }

    #[test]
    fn it_wraps_angle_error() {
        let mut pid = PidController::new(1., 0., 0.);
        let out = pid.calculate(0., PI - 0.1, 0.);
        assert_close(out, -(PI - 0.1));

        pid.reset();
        let out = pid.calculate(0., PI + 0.1, 0.);
        assert_close(out, PI - 0.1);

        pid.reset();
        pid.set_angle_wrapping(false);
        let out = pid.calculate(0., 3. * PI / 2., 0.);
        assert_close(out, -3. * PI / 2.);
    }

    #[test]
    fn it_wraps_huge_measurements() {
        let mut pid = PidController::new(100., 1., 50.);
        let out = pid.calculate(0., 1e17, 0.);
        assert!(out.abs() <= OUTPUT_LIMIT);
        assert!(pid.integral().abs() <= INTEGRAL_LIMIT);
    }

    #[test]
    fn reset_restores_first_sample_behavior() {
        let mut pid = PidController::new(10., 2., 5.);
        let mut fresh = pid.clone();

        for i in 0..20 {
            pid.calculate(0., 0.1 * i as f64, i as f64 * 0.01);
        }
        pid.reset();
        assert!(!pid.is_running());
        assert_eq!(pid.integral(), 0.);

        assert_eq!(pid.calculate(0., 0.2, 7.), fresh.calculate(0., 0.2, 7.));
    }

    #[test]
    fn it_sets_gains() {
        let mut pid = PidController::default();
        pid.set_gains(1., 2., 3.);
        assert_eq!(pid.gains(), Gains::new(1., 2., 3.));
    }
}
