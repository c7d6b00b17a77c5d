//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or driving a vehicle simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Scenario error: {message}")]
    Scenario { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<dl_components::ComponentError> for SimError {
    fn from(e: dl_components::ComponentError) -> Self {
        match e {
            dl_components::ComponentError::NonPhysical { what } => SimError::NonPhysical { what },
            dl_components::ComponentError::InvalidArg { what } => SimError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_error_converts() {
        let e = dl_components::ComponentError::InvalidArg { what: "radius" };
        let s: SimError = e.into();
        assert!(matches!(s, SimError::InvalidArg { what: "radius" }));
    }
}
