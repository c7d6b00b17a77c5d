use crate::DlError;

/// Floating point type used throughout the simulation.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, DlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DlError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_passes_values_through() {
        assert_eq!(ensure_finite(42.5, "test").unwrap(), 42.5);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }
}
