//! Feedback control.

mod gain;
pub use self::gain::Gains;

mod pid;
pub use self::pid::PidController;
