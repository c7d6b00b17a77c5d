//! Error types for component operations.

use dl_core::error::DlError;
use thiserror::Error;

/// Errors that can occur while constructing or updating components.
///
/// Runtime command operations (refuel, shift, throttle, ...) report
/// failure through their `bool` return instead; these errors cover
/// parameter validation and non-physical inputs.
#[derive(Error, Debug, Clone)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for DlError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => DlError::InvalidArg { what },
            ComponentError::InvalidArg { what } => DlError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::NonPhysical { what: "wheel radius" };
        assert!(err.to_string().contains("wheel radius"));
    }

    #[test]
    fn error_conversion() {
        let comp_err = ComponentError::InvalidArg { what: "test" };
        let dl_err: DlError = comp_err.into();
        assert!(matches!(dl_err, DlError::InvalidArg { .. }));
    }
}
