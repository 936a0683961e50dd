use core::f64::consts::FRAC_PI_3;

/// Snapshot of the cart-pendulum state.
///
/// The pendulum angle is measured from the upright position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    /// Cart position (m).
    pub cart_position: f64,
    /// Cart velocity (m/s).
    pub cart_velocity: f64,
    /// Pendulum angle from vertical (rad), in `(-π, π]`.
    pub pendulum_angle: f64,
    /// Pendulum angular velocity (rad/s).
    pub pendulum_angular_velocity: f64,
    /// Whether the pendulum has tipped past the failure threshold since the last reset.
    pub has_failed: bool,
}

impl State {
    /// Total mechanical energy (J) of this state for the given parameters.
    ///
    /// Potential energy is zero at the pivot height, so the upright pendulum
    /// carries `m g l` and the hanging one `-m g l`.
    pub fn energy(&self, parameters: &Parameters) -> f64 {
        let Parameters {
            mass_cart,
            mass_pendulum,
            length,
            gravity,
            ..
        } = *parameters;
        let v = self.cart_velocity;
        let omega = self.pendulum_angular_velocity;
        let cos = self.pendulum_angle.cos();

        let kinetic = 0.5 * (mass_cart + mass_pendulum) * v * v
            + mass_pendulum * length * v * omega * cos
            + 0.5 * mass_pendulum * length * length * omega * omega;
        let potential = mass_pendulum * gravity * length * cos;
        kinetic + potential
    }
}

/// Physical parameters of the cart-pendulum.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// Cart mass (kg).
    pub mass_cart: f64,
    /// Pendulum mass (kg).
    pub mass_pendulum: f64,
    /// Pendulum length (m).
    pub length: f64,
    /// Gravitational acceleration (m/s²). A [`CartPole`](super::CartPole)
    /// always uses [`Parameters::GRAVITY`].
    pub gravity: f64,
    /// Viscous friction coefficient of the cart.
    pub friction: f64,
    /// Angular damping coefficient of the pendulum.
    pub air_resistance: f64,
}

impl Parameters {
    pub const GRAVITY: f64 = 9.81;
    pub const MIN_MASS_CART: f64 = 0.1;
    pub const MIN_MASS_PENDULUM: f64 = 0.01;
    pub const MIN_LENGTH: f64 = 0.01;
    pub const DEFAULT_AIR_RESISTANCE: f64 = 0.01;
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            mass_cart: 1.,
            mass_pendulum: 0.1,
            length: 1.,
            gravity: Self::GRAVITY,
            friction: 0.1,
            air_resistance: Self::DEFAULT_AIR_RESISTANCE,
        }
    }
}

/// Fixed safety limits applied on every step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraints {
    pub max_cart_position: f64,
    pub max_cart_velocity: f64,
    pub max_angular_velocity: f64,
    pub max_force: f64,
    pub max_dt: f64,
    pub failure_angle_threshold: f64,
}

impl Constraints {
    /// Limits used by [`CartPole`](super::CartPole).
    pub const DEFAULT: Self = Self {
        max_cart_position: 5.,
        max_cart_velocity: 10.,
        max_angular_velocity: 20.,
        max_force: 50.,
        max_dt: 0.02,
        failure_angle_threshold: FRAC_PI_3,
    };
}

impl Default for Constraints {
    fn default() -> Self {
        Self::DEFAULT
    }
}
