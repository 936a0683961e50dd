//! Cart-pendulum plant.

use crate::math::{clamp, wrap_angle};

mod dynamics;

mod state;
pub use self::state::{Constraints, Parameters, State};

/// Velocity retained after a soft limit kicks in.
const SOFT_LIMIT_FACTOR: f64 = 0.95;

/// Velocity retained (and reversed) after the cart hits the end of the track.
const BOUNCE_FACTOR: f64 = -0.5;

/// Inverted pendulum on a motorized cart.
///
/// The state is advanced with [`CartPole::update`], one fixed step at a time.
/// Out-of-range inputs are clamped rather than rejected, so every call
/// succeeds.
///
/// ```
/// use cartpole::plant::CartPole;
///
/// let mut plant = CartPole::new(1.0, 0.1, 1.0, 0.1);
/// plant.reset(0.05);
/// plant.update(0.0, 0.01);
///
/// assert!(plant.state().pendulum_angle > 0.05);
/// ```
#[derive(Clone, Debug)]
pub struct CartPole {
    parameters: Parameters,
    constraints: Constraints,
    cart_position: f64,
    cart_velocity: f64,
    pendulum_angle: f64,
    pendulum_angular_velocity: f64,
    has_failed: bool,
}

impl Default for CartPole {
    fn default() -> Self {
        Self::from_parameters(Parameters::default())
    }
}

impl CartPole {
    /// Create a plant at rest, upright, with the default air resistance.
    pub fn new(mass_cart: f64, mass_pendulum: f64, length: f64, friction: f64) -> Self {
        Self::from_parameters(Parameters {
            mass_cart,
            mass_pendulum,
            length,
            friction,
            ..Parameters::default()
        })
    }

    /// Create a plant at rest, upright, from a full parameter set.
    ///
    /// Mass, length, friction and air resistance floors are applied. Gravity
    /// is always [`Parameters::GRAVITY`].
    pub fn from_parameters(parameters: Parameters) -> Self {
        let mut me = Self {
            parameters: Parameters {
                length: parameters.length.max(Parameters::MIN_LENGTH),
                gravity: Parameters::GRAVITY,
                ..parameters
            },
            constraints: Constraints::DEFAULT,
            cart_position: 0.,
            cart_velocity: 0.,
            pendulum_angle: 0.,
            pendulum_angular_velocity: 0.,
            has_failed: false,
        };
        me.set_masses(parameters.mass_cart, parameters.mass_pendulum);
        me.set_air_resistance(parameters.air_resistance);
        me.set_friction(parameters.friction);
        me
    }

    /// Advance the state by `dt` seconds under a horizontal `force` (N).
    ///
    /// The force is clamped to the actuator limit and `dt` to the largest
    /// stable step. A non-finite force counts as zero and a non-finite or
    /// non-positive `dt` leaves the state untouched. After integration the velocities are soft-limited, the
    /// cart bounces off the ends of the track and the angle is wrapped into
    /// `(-π, π]`.
    pub fn update(&mut self, force: f64, dt: f64) {
        let Constraints {
            max_cart_position,
            max_cart_velocity,
            max_angular_velocity,
            max_force,
            max_dt,
            failure_angle_threshold,
        } = self.constraints;

        if !(dt.is_finite() && dt > 0.) {
            return;
        }
        let dt = dt.min(max_dt);
        let force = if force.is_finite() {
            clamp(force, -max_force, max_force)
        } else {
            0.
        };

        if !self.has_failed && self.pendulum_angle.abs() > failure_angle_threshold {
            self.has_failed = true;

            #[cfg(feature = "tracing")]
            tracing::warn!(angle = self.pendulum_angle, "Pendulum fell past failure threshold");
        }

        let [x, v, theta, omega] = dynamics::rk4_step(
            &self.parameters,
            [
                self.cart_position,
                self.cart_velocity,
                self.pendulum_angle,
                self.pendulum_angular_velocity,
            ],
            force,
            dt,
        );

        self.cart_position = x;
        self.cart_velocity = soft_limit(v, max_cart_velocity);
        self.pendulum_angle = theta;
        self.pendulum_angular_velocity = soft_limit(omega, max_angular_velocity);

        if self.cart_position.abs() > max_cart_position {
            self.cart_position = max_cart_position.copysign(self.cart_position);
            self.cart_velocity *= BOUNCE_FACTOR;

            #[cfg(feature = "tracing")]
            tracing::trace!(position = self.cart_position, "Cart hit end of track");
        }

        self.pendulum_angle = wrap_angle(self.pendulum_angle);
    }

    /// Return the cart to the center at rest with the pendulum at `initial_angle`.
    ///
    /// Parameters are kept and the failure flag is cleared.
    pub fn reset(&mut self, initial_angle: f64) {
        self.cart_position = 0.;
        self.cart_velocity = 0.;
        self.pendulum_angle = initial_angle;
        self.pendulum_angular_velocity = 0.;
        self.has_failed = false;

        #[cfg(feature = "tracing")]
        tracing::debug!(initial_angle, "Reset plant");
    }

    /// Nudge the pendulum by `offset` radians between steps.
    ///
    /// The angle is wrapped on the next [`CartPole::update`]. Non-finite
    /// offsets are ignored.
    pub fn disturb(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.pendulum_angle += offset;

        #[cfg(feature = "tracing")]
        tracing::debug!(offset, angle = self.pendulum_angle, "Disturb pendulum");
    }

    /// Set the cart and pendulum masses (kg), floored at 0.1 and 0.01.
    pub fn set_masses(&mut self, mass_cart: f64, mass_pendulum: f64) {
        self.parameters.mass_cart = mass_cart.max(Parameters::MIN_MASS_CART);
        self.parameters.mass_pendulum = mass_pendulum.max(Parameters::MIN_MASS_PENDULUM);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            mass_cart = self.parameters.mass_cart,
            mass_pendulum = self.parameters.mass_pendulum,
            "Set masses"
        );
    }

    /// Set the angular damping coefficient, floored at 0.
    pub fn set_air_resistance(&mut self, air_resistance: f64) {
        self.parameters.air_resistance = air_resistance.max(0.);

        #[cfg(feature = "tracing")]
        tracing::trace!(air_resistance = self.parameters.air_resistance, "Set air resistance");
    }

    /// Set the cart friction coefficient, floored at 0.
    pub fn set_friction(&mut self, friction: f64) {
        self.parameters.friction = friction.max(0.);
    }

    pub fn state(&self) -> State {
        State {
            cart_position: self.cart_position,
            cart_velocity: self.cart_velocity,
            pendulum_angle: self.pendulum_angle,
            pendulum_angular_velocity: self.pendulum_angular_velocity,
            has_failed: self.has_failed,
        }
    }

    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    pub fn has_failed(&self) -> bool {
        self.has_failed
    }
}

fn soft_limit(value: f64, max: f64) -> f64 {
    if value.abs() > max {
        (max * SOFT_LIMIT_FACTOR).copysign(value)
    } else {
        value
    }
}
