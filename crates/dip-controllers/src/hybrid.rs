//! Super-twisting control with online adaptation of both gains.

use crate::factory::HybridSettings;
use crate::gains::check_gains;
use crate::kind::ControllerKind;
use crate::surface::SlidingSurface;
use crate::{ControlResult, Controller};
use dip_core::{SystemState, sat};

/// Gains: `[c1, λ1, c2, λ2]`, the surface weights only. The twisting gains
/// start from [`HybridSettings`] and grow with `|s|`:
///
/// ```text
/// u   = k1·√|s|·sat(s/ε) + z
/// z'  = k2·sat(s/ε)
/// k1' = γ1·|s|,  k2' = γ2·|s|,  both capped at max_gain
/// ```
#[derive(Debug, Clone)]
pub struct HybridAdaptiveSta {
    gains: Vec<f64>,
    surface: SlidingSurface,
    settings: HybridSettings,
    boundary_layer: f64,
    dt: f64,
    force_limit: f64,
    k1: f64,
    k2: f64,
    z: f64,
}

impl HybridAdaptiveSta {
    pub fn new(
        gains: &[f64],
        settings: HybridSettings,
        boundary_layer: f64,
        dt: f64,
        force_limit: f64,
    ) -> ControlResult<Self> {
        check_gains(ControllerKind::Hybrid, gains)?;
        Ok(Self {
            gains: gains.to_vec(),
            surface: SlidingSurface::new(gains[0], gains[2], gains[1], gains[3]),
            k1: settings.k1_init,
            k2: settings.k2_init,
            settings,
            boundary_layer,
            dt,
            force_limit,
            z: 0.0,
        })
    }

    /// Current `(k1, k2)` twisting gains.
    pub fn adapted_gains(&self) -> (f64, f64) {
        (self.k1, self.k2)
    }
}

impl Controller for HybridAdaptiveSta {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Hybrid
    }

    fn compute_control(&mut self, state: &SystemState) -> f64 {
        let s = self.surface.evaluate(state);
        let switch = sat(s / self.boundary_layer);
        let u = self.k1 * s.abs().sqrt() * switch + self.z;

        self.z = (self.z + self.k2 * switch * self.dt).clamp(-self.force_limit, self.force_limit);
        let max = self.settings.max_gain;
        self.k1 = (self.k1 + self.settings.gamma1 * s.abs() * self.dt).min(max);
        self.k2 = (self.k2 + self.settings.gamma2 * s.abs() * self.dt).min(max);

        u.clamp(-self.force_limit, self.force_limit)
    }

    fn reset(&mut self) {
        self.k1 = self.settings.k1_init;
        self.k2 = self.settings.k2_init;
        self.z = 0.0;
    }

    fn gains(&self) -> &[f64] {
        &self.gains
    }
}
