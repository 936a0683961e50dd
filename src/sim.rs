//! Closed-loop step driver.

use crate::{
    control::PidController,
    math::UnwrappedAngle,
    plant::{CartPole, State},
    time::{Clock, SimulatedClock, Time},
    Error, Result, SimulationConfig,
};

/// Target pendulum angle: upright.
pub const SETPOINT: f64 = 0.;

/// Most steps a single [`Simulation::run_for`] call will take.
pub const MAX_RUN_STEPS: u64 = u32::MAX as u64;

/// Snapshot emitted after every step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telemetry {
    /// Controller time of the step.
    pub time: Time,
    /// Plant state after the force was applied.
    pub state: State,
    /// Force applied during the step (N), before the plant's own clamp.
    pub force: f64,
    /// Pendulum angle without wrapping (rad).
    pub unwrapped_angle: f64,
    /// Full turns of the pendulum since the last reset.
    pub rotations: i64,
}

/// Inverted pendulum on a cart balanced by a PID controller.
///
/// Each [`Simulation::step`] reads the plant state, computes a force from the
/// pendulum angle and applies it to the plant, in that order.
///
/// ```
/// use cartpole::{Simulation, SimulationConfig};
///
/// let mut sim = Simulation::new(SimulationConfig::default())?;
/// let telemetry = sim.run_for(5., |_| {})?;
///
/// assert!(telemetry.state.pendulum_angle.abs() < 0.05);
/// assert!(!telemetry.state.has_failed);
/// # Ok::<(), cartpole::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Simulation<C = SimulatedClock> {
    plant: CartPole,
    controller: PidController,
    clock: C,
    config: SimulationConfig,
    controller_enabled: bool,
    angle: UnwrappedAngle,
    force: f64,
}

impl Simulation {
    /// Create a simulation driven by a [`SimulatedClock`].
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_clock(config, SimulatedClock::default())
    }
}

impl<C: Clock> Simulation<C> {
    /// Create a simulation that samples time from `clock`.
    pub fn with_clock(config: SimulationConfig, mut clock: C) -> Result<Self> {
        config.validate()?;

        let mut plant = CartPole::from_parameters(config.parameters);
        plant.reset(config.initial_angle);

        let mut controller =
            PidController::new(config.gains.kp, config.gains.ki, config.gains.kd);
        controller.set_angle_wrapping(config.angle_wrapping);

        clock.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(?config, "Create simulation");

        Ok(Self {
            plant,
            controller,
            clock,
            config,
            controller_enabled: true,
            angle: UnwrappedAngle::new(config.initial_angle),
            force: 0.,
        })
    }

    /// Advance the closed loop by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> Telemetry {
        let angle = self.plant.state().pendulum_angle;
        let time = self.clock.tick(dt);

        self.force = if self.controller_enabled {
            self.controller.calculate(SETPOINT, angle, time.as_secs())
        } else {
            0.
        };
        self.plant.update(self.force, dt);

        self.angle.push(self.plant.state().pendulum_angle);
        self.telemetry()
    }

    /// Step with the configured time step for `duration` seconds.
    ///
    /// `on_tick` receives every snapshot. The run ends early if the pendulum
    /// falls and the config asks to stop on failure. Returns the last snapshot.
    ///
    /// Fails if `duration` is negative or needs more than [`MAX_RUN_STEPS`]
    /// steps.
    pub fn run_for(
        &mut self,
        duration: f64,
        mut on_tick: impl FnMut(&Telemetry),
    ) -> Result<Telemetry> {
        if !(duration.is_finite() && duration >= 0.) {
            return Err(Error::invalid("duration", duration, "must not be negative"));
        }

        let dt = self.config.time_step;
        let steps = (duration / dt).round();
        if steps > MAX_RUN_STEPS as f64 {
            return Err(Error::invalid("duration", duration, "too many steps"));
        }
        let steps = steps as u64;

        let mut telemetry = self.telemetry();
        for _ in 0..steps {
            telemetry = self.step(dt);
            on_tick(&telemetry);

            if self.config.stop_on_failure && telemetry.state.has_failed {
                #[cfg(feature = "tracing")]
                tracing::info!(time = telemetry.time.as_secs(), "Stopped after failure");

                break;
            }
        }

        Ok(telemetry)
    }

    /// Restart from the configured initial angle, keeping all parameters.
    pub fn reset(&mut self) {
        self.plant.reset(self.config.initial_angle);
        self.controller.reset();
        self.clock.reset();
        self.angle = UnwrappedAngle::new(self.config.initial_angle);
        self.force = 0.;
    }

    /// Push the pendulum by `offset` radians before the next step.
    pub fn disturb(&mut self, offset: f64) {
        self.plant.disturb(offset);
        self.angle.offset(offset);
    }

    /// Run open loop (zero force) when disabled.
    pub fn set_controller_enabled(&mut self, enabled: bool) {
        self.controller_enabled = enabled;
    }

    pub fn is_controller_enabled(&self) -> bool {
        self.controller_enabled
    }

    /// Current snapshot without stepping.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            time: self.clock.now(),
            state: self.plant.state(),
            force: self.force,
            unwrapped_angle: self.angle.value(),
            rotations: self.angle.rotations(),
        }
    }

    pub fn plant(&self) -> &CartPole {
        &self.plant
    }

    /// Mutable access to the plant, e.g. to change masses between steps.
    pub fn plant_mut(&mut self) -> &mut CartPole {
        &mut self.plant
    }

    pub fn controller(&self) -> &PidController {
        &self.controller
    }

    /// Mutable access to the controller, e.g. to retune gains between steps.
    pub fn controller_mut(&mut self) -> &mut PidController {
        &mut self.controller
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
