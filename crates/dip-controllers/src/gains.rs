//! Search bounds and pre-checks for controller gain vectors.

use crate::error::{ControlError, ControlResult};
use crate::kind::ControllerKind;

/// Per-dimension `(lower, upper)` search bounds for the tuner.
///
/// Lower bounds are strictly positive since every gain must be. The
/// super-twisting bounds keep `K1` above the `K2` range floor so that
/// `K1 > K2` is reachable over most of the box.
pub fn get_gain_bounds(kind: ControllerKind) -> (Vec<f64>, Vec<f64>) {
    match kind {
        ControllerKind::Classical => (
            vec![1.0, 1.0, 1.0, 1.0, 0.1, 0.1],
            vec![100.0, 100.0, 30.0, 30.0, 50.0, 10.0],
        ),
        ControllerKind::Adaptive => (
            vec![1.0, 1.0, 1.0, 1.0, 0.1],
            vec![100.0, 100.0, 30.0, 30.0, 10.0],
        ),
        ControllerKind::SuperTwisting => (
            vec![2.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            vec![100.0, 99.0, 100.0, 100.0, 30.0, 30.0],
        ),
        ControllerKind::Hybrid => (vec![1.0, 1.0, 1.0, 1.0], vec![100.0, 30.0, 100.0, 30.0]),
    }
}

/// Cheap pre-check run before any simulation.
///
/// Valid when the length matches, every entry is finite and strictly
/// positive, and (super-twisting only) `K1 > K2`.
pub fn validate_gains(kind: ControllerKind, gains: &[f64]) -> bool {
    check_gains(kind, gains).is_ok()
}

/// [`validate_gains`] with the reason for rejection.
pub fn check_gains(kind: ControllerKind, gains: &[f64]) -> ControlResult<()> {
    let invalid = |reason: String| ControlError::InvalidGains { kind, reason };

    if gains.len() != kind.gain_count() {
        return Err(invalid(format!(
            "expected {} gains, got {}",
            kind.gain_count(),
            gains.len()
        )));
    }
    for (name, &g) in kind.gain_names().iter().zip(gains) {
        if !g.is_finite() {
            return Err(invalid(format!("{name} is not finite ({g})")));
        }
        if g <= 0.0 {
            return Err(invalid(format!("{name} must be positive ({g})")));
        }
    }
    if kind == ControllerKind::SuperTwisting && gains[0] <= gains[1] {
        return Err(invalid(format!(
            "K1 ({}) must exceed K2 ({})",
            gains[0], gains[1]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_have_gain_count_dimensions() {
        for kind in ControllerKind::ALL {
            let (lo, hi) = get_gain_bounds(kind);
            assert_eq!(lo.len(), kind.gain_count());
            assert_eq!(hi.len(), kind.gain_count());
            assert!(lo.iter().zip(&hi).all(|(l, h)| 0.0 < *l && l < h));
        }
    }

    #[test]
    fn rejects_non_positive_and_non_finite() {
        let kind = ControllerKind::Classical;
        assert!(validate_gains(kind, &[10.0, 10.0, 5.0, 5.0, 2.0, 1.0]));
        assert!(!validate_gains(kind, &[10.0, 0.0, 5.0, 5.0, 2.0, 1.0]));
        assert!(!validate_gains(kind, &[10.0, 10.0, f64::NAN, 5.0, 2.0, 1.0]));
        assert!(!validate_gains(kind, &[10.0, 10.0, 5.0]));
    }

    #[test]
    fn super_twisting_requires_k1_above_k2() {
        let kind = ControllerKind::SuperTwisting;
        assert!(validate_gains(kind, &[20.0, 10.0, 5.0, 5.0, 3.0, 3.0]));
        assert!(!validate_gains(kind, &[10.0, 10.0, 5.0, 5.0, 3.0, 3.0]));
        assert!(!validate_gains(kind, &[5.0, 10.0, 5.0, 5.0, 3.0, 3.0]));
    }

    #[test]
    fn error_names_the_gain() {
        let err = check_gains(ControllerKind::Hybrid, &[1.0, -2.0, 1.0, 1.0]).unwrap_err();
        assert!(err.to_string().contains("lambda1"));
    }
}
