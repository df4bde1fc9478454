//! Adaptive sliding-mode control.

use crate::factory::AdaptiveSettings;
use crate::gains::check_gains;
use crate::kind::ControllerKind;
use crate::surface::SlidingSurface;
use crate::{ControlResult, Controller};
use dip_core::{SystemState, sat};

/// Switching gain `K̂` grows with `|s|` and leaks back toward its initial
/// value:
///
/// ```text
/// u    = K̂·sat(s/ε) + kp·s
/// K̂'   = γ·|s| − leak·(K̂ − K̂0),   K̂ ∈ [K_min, K_max]
/// ```
///
/// Gains: `[k1, k2, λ1, λ2, γ]`.
#[derive(Debug, Clone)]
pub struct AdaptiveSmc {
    gains: Vec<f64>,
    surface: SlidingSurface,
    gamma: f64,
    settings: AdaptiveSettings,
    boundary_layer: f64,
    dt: f64,
    force_limit: f64,
    k_hat: f64,
}

impl AdaptiveSmc {
    pub fn new(
        gains: &[f64],
        settings: AdaptiveSettings,
        boundary_layer: f64,
        dt: f64,
        force_limit: f64,
    ) -> ControlResult<Self> {
        check_gains(ControllerKind::Adaptive, gains)?;
        Ok(Self {
            gains: gains.to_vec(),
            surface: SlidingSurface::new(gains[0], gains[1], gains[2], gains[3]),
            gamma: gains[4],
            k_hat: settings.initial_gain,
            settings,
            boundary_layer,
            dt,
            force_limit,
        })
    }

    /// Current adapted switching gain.
    pub fn switching_gain(&self) -> f64 {
        self.k_hat
    }
}

impl Controller for AdaptiveSmc {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Adaptive
    }

    fn compute_control(&mut self, state: &SystemState) -> f64 {
        let s = self.surface.evaluate(state);
        let u = self.k_hat * sat(s / self.boundary_layer) + self.settings.proportional_gain * s;

        let rate = self.gamma * s.abs() - self.settings.leak_rate * (self.k_hat - self.settings.initial_gain);
        self.k_hat = (self.k_hat + rate * self.dt).clamp(self.settings.min_gain, self.settings.max_gain);

        u.clamp(-self.force_limit, self.force_limit)
    }

    fn reset(&mut self) {
        self.k_hat = self.settings.initial_gain;
    }

    fn gains(&self) -> &[f64] {
        &self.gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AdaptiveSmc {
        AdaptiveSmc::new(
            &[15.0, 36.0, 22.0, 11.6, 1.3],
            AdaptiveSettings::default(),
            0.02,
            0.01,
            20.0,
        )
        .unwrap()
    }

    #[test]
    fn gain_grows_off_the_surface_and_resets() {
        let mut c = controller();
        let start = c.switching_gain();
        let state = SystemState::new(0.0, 0.1, 0.0, 0.0, 0.5, 0.0);
        for _ in 0..10 {
            c.compute_control(&state);
        }
        assert!(c.switching_gain() > start);
        c.reset();
        assert_eq!(c.switching_gain(), start);
    }

    #[test]
    fn gain_stays_within_limits() {
        let mut c = controller();
        let state = SystemState::new(0.0, 1.0, -1.0, 0.0, 20.0, -20.0);
        for _ in 0..10_000 {
            c.compute_control(&state);
        }
        assert_eq!(c.switching_gain(), AdaptiveSettings::default().max_gain);
    }

    #[test]
    fn gain_leaks_back_on_the_surface() {
        let mut c = controller();
        let off = SystemState::new(0.0, 0.2, 0.0, 0.0, 0.0, 0.0);
        for _ in 0..50 {
            c.compute_control(&off);
        }
        let raised = c.switching_gain();
        for _ in 0..50 {
            c.compute_control(&SystemState::zeros());
        }
        assert!(c.switching_gain() < raised);
    }
}
