use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Boundary-layer saturation: `z` clamped to `[-1, 1]`.
#[inline]
pub fn sat(z: Real) -> Real {
    z.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn sat_clamps_outside_boundary_layer() {
        assert_eq!(sat(3.0), 1.0);
        assert_eq!(sat(-7.5), -1.0);
        assert_eq!(sat(0.25), 0.25);
    }
}
