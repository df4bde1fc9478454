//! Classical sliding-mode control with a boundary layer.

use crate::gains::check_gains;
use crate::kind::ControllerKind;
use crate::surface::SlidingSurface;
use crate::{ControlResult, Controller};
use dip_core::{SystemState, sat};

/// `u = K·sat(s/ε) + kd·s`, saturated to `±force_limit`.
///
/// Gains: `[k1, k2, λ1, λ2, K, kd]`.
#[derive(Debug, Clone)]
pub struct ClassicalSmc {
    gains: Vec<f64>,
    surface: SlidingSurface,
    switching_gain: f64,
    derivative_gain: f64,
    boundary_layer: f64,
    force_limit: f64,
}

impl ClassicalSmc {
    pub fn new(gains: &[f64], boundary_layer: f64, force_limit: f64) -> ControlResult<Self> {
        check_gains(ControllerKind::Classical, gains)?;
        Ok(Self {
            gains: gains.to_vec(),
            surface: SlidingSurface::new(gains[0], gains[1], gains[2], gains[3]),
            switching_gain: gains[4],
            derivative_gain: gains[5],
            boundary_layer,
            force_limit,
        })
    }

    pub fn surface(&self) -> &SlidingSurface {
        &self.surface
    }
}

impl Controller for ClassicalSmc {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Classical
    }

    fn compute_control(&mut self, state: &SystemState) -> f64 {
        let s = self.surface.evaluate(state);
        let u = self.switching_gain * sat(s / self.boundary_layer) + self.derivative_gain * s;
        u.clamp(-self.force_limit, self.force_limit)
    }

    fn reset(&mut self) {}

    fn gains(&self) -> &[f64] {
        &self.gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ClassicalSmc {
        ClassicalSmc::new(&[10.0, 10.0, 5.0, 5.0, 15.0, 2.0], 0.02, 20.0).unwrap()
    }

    #[test]
    fn zero_state_gives_zero_force() {
        assert_eq!(controller().compute_control(&SystemState::zeros()), 0.0);
    }

    #[test]
    fn pushes_cart_toward_inner_link_lean() {
        let mut c = controller();
        let u = c.compute_control(&SystemState::new(0.0, 0.05, 0.0, 0.0, 0.0, 0.0));
        assert!(u > 0.0);
    }

    #[test]
    fn output_is_saturated() {
        let mut c = controller();
        let u = c.compute_control(&SystemState::new(0.0, 1.0, -1.0, 0.0, 10.0, -10.0));
        assert_eq!(u, 20.0);
    }

    #[test]
    fn inside_boundary_layer_is_continuous() {
        let mut c = controller();
        let tiny = SystemState::new(0.0, 1e-5, 0.0, 0.0, 0.0, 0.0);
        let s = c.surface().evaluate(&tiny);
        let u = c.compute_control(&tiny);
        assert!((u - (15.0 * s / 0.02 + 2.0 * s)).abs() < 1e-12);
    }
}
