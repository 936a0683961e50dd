use thiserror::Error;

/// Error raised while configuring a simulation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// A configuration value is outside its valid range.
    #[error("invalid {name} ({value}): {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
