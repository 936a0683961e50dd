use crate::{control::Gains, plant::Parameters, Error, Result};

/// Settings for a [`Simulation`](crate::Simulation) run.
///
/// ```
/// use cartpole::SimulationConfig;
///
/// let config = SimulationConfig::default()
///     .with_initial_angle(0.2)
///     .with_gains(120., 1., 40.);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Physical parameters of the plant.
    pub parameters: Parameters,
    /// Controller gains.
    pub gains: Gains,
    /// Pendulum angle (rad) after a reset.
    pub initial_angle: f64,
    /// Step used by [`Simulation::run_for`](crate::Simulation::run_for) (s).
    pub time_step: f64,
    /// Wrap the controller error into `(-π, π]`.
    pub angle_wrapping: bool,
    /// Stop a run as soon as the pendulum falls.
    pub stop_on_failure: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            parameters: Parameters::default(),
            gains: Gains::new(100., 1., 50.),
            initial_angle: 0.1,
            time_step: 0.01,
            angle_wrapping: true,
            stop_on_failure: false,
        }
    }
}

impl SimulationConfig {
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_gains(mut self, kp: f64, ki: f64, kd: f64) -> Self {
        self.gains = Gains::new(kp, ki, kd);
        self
    }

    pub fn with_initial_angle(mut self, initial_angle: f64) -> Self {
        self.initial_angle = initial_angle;
        self
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_angle_wrapping(mut self, enabled: bool) -> Self {
        self.angle_wrapping = enabled;
        self
    }

    pub fn with_stop_on_failure(mut self, enabled: bool) -> Self {
        self.stop_on_failure = enabled;
        self
    }

    /// Check that every value is usable.
    ///
    /// Masses and air resistance below their floors are accepted, since the
    /// plant raises them to the floor. Gravity is not checked: the plant
    /// always uses [`Parameters::GRAVITY`].
    pub fn validate(&self) -> Result<()> {
        let Parameters {
            mass_cart,
            mass_pendulum,
            length,
            friction,
            air_resistance,
            ..
        } = self.parameters;

        for (name, value) in [
            ("mass_cart", mass_cart),
            ("mass_pendulum", mass_pendulum),
            ("air_resistance", air_resistance),
            ("kp", self.gains.kp),
            ("ki", self.gains.ki),
            ("kd", self.gains.kd),
            ("initial_angle", self.initial_angle),
        ] {
            finite(name, value)?;
        }

        if !(length.is_finite() && length > 0.) {
            return Err(Error::invalid("length", length, "must be positive"));
        }
        if !(friction.is_finite() && friction >= 0.) {
            return Err(Error::invalid("friction", friction, "must not be negative"));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.) {
            return Err(Error::invalid("time_step", self.time_step, "must be positive"));
        }

        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(name, value, "must be finite"))
    }
}
