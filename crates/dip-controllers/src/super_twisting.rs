//! Super-twisting (second-order) sliding-mode control.

use crate::gains::check_gains;
use crate::kind::ControllerKind;
use crate::surface::SlidingSurface;
use crate::{ControlResult, Controller};
use dip_core::{SystemState, sat};

/// ```text
/// u  = K1·√|s|·sat(s/ε) + z
/// z' = K2·sat(s/ε),   |z| ≤ force_limit
/// ```
///
/// Gains: `[K1, K2, k1, k2, λ1, λ2]` with `K1 > K2`.
#[derive(Debug, Clone)]
pub struct SuperTwistingSmc {
    gains: Vec<f64>,
    surface: SlidingSurface,
    alpha: f64,
    beta: f64,
    boundary_layer: f64,
    dt: f64,
    force_limit: f64,
    z: f64,
}

impl SuperTwistingSmc {
    pub fn new(gains: &[f64], boundary_layer: f64, dt: f64, force_limit: f64) -> ControlResult<Self> {
        check_gains(ControllerKind::SuperTwisting, gains)?;
        Ok(Self {
            gains: gains.to_vec(),
            alpha: gains[0],
            beta: gains[1],
            surface: SlidingSurface::new(gains[2], gains[3], gains[4], gains[5]),
            boundary_layer,
            dt,
            force_limit,
            z: 0.0,
        })
    }

    /// Integral term of the twisting law.
    pub fn integrator(&self) -> f64 {
        self.z
    }
}

impl Controller for SuperTwistingSmc {
    fn kind(&self) -> ControllerKind {
        ControllerKind::SuperTwisting
    }

    fn compute_control(&mut self, state: &SystemState) -> f64 {
        let s = self.surface.evaluate(state);
        let switch = sat(s / self.boundary_layer);
        let u = self.alpha * s.abs().sqrt() * switch + self.z;

        self.z = (self.z + self.beta * switch * self.dt).clamp(-self.force_limit, self.force_limit);

        u.clamp(-self.force_limit, self.force_limit)
    }

    fn reset(&mut self) {
        self.z = 0.0;
    }

    fn gains(&self) -> &[f64] {
        &self.gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrator_is_bounded_and_resettable() {
        let mut c = SuperTwistingSmc::new(&[50.0, 40.0, 10.0, 10.0, 5.0, 5.0], 0.02, 0.01, 20.0).unwrap();
        let state = SystemState::new(0.0, 0.3, 0.0, 0.0, 0.0, 0.0);
        for _ in 0..1_000 {
            let u = c.compute_control(&state);
            assert!(u.abs() <= 20.0);
        }
        assert_eq!(c.integrator(), 20.0);
        c.reset();
        assert_eq!(c.integrator(), 0.0);
    }

    #[test]
    fn rejects_k2_above_k1() {
        assert!(SuperTwistingSmc::new(&[5.0, 10.0, 1.0, 1.0, 1.0, 1.0], 0.02, 0.01, 20.0).is_err());
    }
}
