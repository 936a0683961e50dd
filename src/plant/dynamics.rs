use super::Parameters;

/// `(x, v, θ, ω)` packed for integration.
pub(crate) type Vector = [f64; 4];

/// Below this the mass matrix is treated as singular.
const SINGULAR_DENOMINATOR: f64 = 0.001;

/// Quadratic drag on the cart, per (m/s)².
const CART_QUADRATIC_DRAG: f64 = 0.01;

/// Quadratic angular damping, per (rad/s)².
const ANGULAR_QUADRATIC_DAMPING: f64 = 0.001;

/// Nonlinear equations of motion of the cart-pendulum under a horizontal force.
pub(crate) fn derivative(
    parameters: &Parameters,
    [_x, v, theta, omega]: Vector,
    force: f64,
) -> Vector {
    let Parameters {
        mass_cart,
        mass_pendulum,
        length,
        gravity,
        friction,
        air_resistance,
    } = *parameters;

    let (sin, cos) = theta.sin_cos();
    let total_mass = mass_cart + mass_pendulum;
    let denominator = total_mass - mass_pendulum * cos * cos;
    if denominator.abs() < SINGULAR_DENOMINATOR {
        return [v, 0., omega, 0.];
    }

    let friction_force = friction * v + CART_QUADRATIC_DRAG * v * v.abs();
    let centripetal = mass_pendulum * length * omega * omega * sin;

    let cart_accel =
        (force - friction_force + centripetal - mass_pendulum * gravity * sin * cos) / denominator;

    let angular_damping = air_resistance * omega + ANGULAR_QUADRATIC_DAMPING * omega * omega.abs();
    let angular_accel = (force * cos - friction_force * cos
        + total_mass * gravity * sin
        + centripetal * cos
        - angular_damping * length)
        / (length * denominator);

    [v, cart_accel, omega, angular_accel]
}

/// Advance `y` by `dt` with the classical fourth-order Runge-Kutta method.
pub(crate) fn rk4_step(parameters: &Parameters, y: Vector, force: f64, dt: f64) -> Vector {
    let k1 = derivative(parameters, y, force);
    let k2 = derivative(parameters, offset(y, k1, dt / 2.), force);
    let k3 = derivative(parameters, offset(y, k2, dt / 2.), force);
    let k4 = derivative(parameters, offset(y, k3, dt), force);

    let mut next = y;
    for (i, value) in next.iter_mut().enumerate() {
        *value += dt / 6. * (k1[i] + 2. * k2[i] + 2. * k3[i] + k4[i]);
    }
    next
}

fn offset(y: Vector, k: Vector, h: f64) -> Vector {
    [y[0] + k[0] * h, y[1] + k[1] * h, y[2] + k[2] * h, y[3] + k[3] * h]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters() -> Parameters {
        Parameters {
            friction: 0.,
            air_resistance: 0.,
            ..Parameters::default()
        }
    }

    #[test]
    fn it_rests_upright_without_force() {
        let d = derivative(&parameters(), [0.; 4], 0.);
        assert_eq!(d, [0.; 4]);
    }

    #[test]
    fn force_pushes_cart_and_tips_pendulum() {
        let p = parameters();
        let [_, cart_accel, _, angular_accel] = derivative(&p, [0.; 4], 10.);

        // Upright: denominator reduces to the cart mass.
        assert!((cart_accel - 10. / p.mass_cart).abs() < 1e-12);
        assert!((angular_accel - 10. / (p.length * p.mass_cart)).abs() < 1e-12);
    }

    #[test]
    fn gravity_tips_pendulum_away_from_upright() {
        let [_, _, _, angular_accel] = derivative(&parameters(), [0., 0., 0.1, 0.], 0.);
        assert!(angular_accel > 0.);

        let [_, _, _, angular_accel] = derivative(&parameters(), [0., 0., -0.1, 0.], 0.);
        assert!(angular_accel < 0.);
    }

    #[test]
    fn friction_opposes_cart_motion() {
        let p = Parameters {
            friction: 0.5,
            ..parameters()
        };
        let [_, cart_accel, _, _] = derivative(&p, [0., 2., 0., 0.], 0.);
        assert!(cart_accel < 0.);
    }

    #[test]
    fn singular_configuration_falls_back_to_zero_acceleration() {
        let p = Parameters {
            mass_cart: 0.,
            mass_pendulum: 1.,
            ..parameters()
        };
        let d = derivative(&p, [1., 2., 0., 3.], 25.);
        assert_eq!(d, [2., 0., 3., 0.]);
    }

    #[test]
    fn rk4_matches_scalar_step_for_pure_translation() {
        // Massless pendulum: the cart alone, under quadratic drag.
        let p = Parameters {
            mass_pendulum: 0.,
            ..parameters()
        };
        let (force, h) = (5., 0.1);
        let accel = |v: f64| (force - CART_QUADRATIC_DRAG * v * v.abs()) / p.mass_cart;

        let k1 = [0., accel(0.)];
        let k2 = [k1[1] * h / 2., accel(k1[1] * h / 2.)];
        let k3 = [k2[1] * h / 2., accel(k2[1] * h / 2.)];
        let k4 = [k3[1] * h, accel(k3[1] * h)];
        let x = h / 6. * (k1[0] + 2. * k2[0] + 2. * k3[0] + k4[0]);
        let v = h / 6. * (k1[1] + 2. * k2[1] + 2. * k3[1] + k4[1]);

        let y = rk4_step(&p, [0.; 4], force, h);
        assert!((y[0] - x).abs() < 1e-12, "{} != {x}", y[0]);
        assert!((y[1] - v).abs() < 1e-12, "{} != {v}", y[1]);

        // Drag keeps the cart just below the drag-free velocity.
        assert!(y[1] < force / p.mass_cart * h);
        assert!(y[1] > 0.99 * force / p.mass_cart * h);
    }
}
