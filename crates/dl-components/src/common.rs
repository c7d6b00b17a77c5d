//! Shared validation helpers for the component models.

use crate::error::{ComponentError, ComponentResult};
use dl_core::numeric::ensure_finite;

/// Gate for externally supplied inputs to per-tick operations: NaN or
/// infinite values must not enter the integrated state.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Clamp a value between min and max.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// True when `value` lies in the closed unit interval.
pub fn in_unit_range(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}
