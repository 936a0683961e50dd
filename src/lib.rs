//! # cartpole
//! Simulation of an inverted pendulum on a motorized cart, balanced by a PID controller.
//!
//! The crate is split into a [`plant`], the nonlinear cart-pendulum integrated with
//! fourth-order Runge-Kutta, and a [`control`] loop that turns the pendulum angle into
//! a horizontal force. [`Simulation`] wires the two together as a discrete-time loop:
//! read the state, compute the force, apply it.
//!
//! ```
//! use cartpole::prelude::*;
//!
//! let mut plant = CartPole::new(1.0, 0.1, 1.0, 0.1);
//! let mut pid = PidController::new(100.0, 1.0, 50.0);
//! plant.reset(0.1);
//!
//! let dt = 0.01;
//! for i in 1..=500 {
//!     let angle = plant.state().pendulum_angle;
//!     let force = pid.calculate(0.0, angle, i as f64 * dt);
//!     plant.update(force, dt);
//! }
//!
//! assert!(plant.state().pendulum_angle.abs() < 0.05);
//! ```
//!
//! ## Features
//! - `tracing`: log failures, resets and saturation with [`tracing`](https://docs.rs/tracing).
//! - `serde`: serialize snapshots, telemetry and configuration.
//! - `rt`: real-time driver on the tokio timer.

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Prelude of commonly-used types.
/// `use cartpole::prelude::*;`
pub mod prelude {
    pub use crate::{
        control::{Gains, PidController},
        plant::{CartPole, Constraints, Parameters, State},
        sim::{Simulation, Telemetry},
        time::{Clock, MonotonicClock, SimulatedClock, Time},
        SimulationConfig,
    };

    #[cfg(feature = "rt")]
    pub use crate::rt::Realtime;
}

mod config;
pub use self::config::SimulationConfig;

pub mod control;

mod error;
pub use self::error::{Error, Result};

pub mod math;

pub mod plant;

#[cfg(feature = "rt")]
#[cfg_attr(docsrs, doc(cfg(feature = "rt")))]
pub mod rt;

pub mod sim;
pub use self::sim::Simulation;

pub mod time;
