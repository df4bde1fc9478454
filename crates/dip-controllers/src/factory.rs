//! Controller construction from gain vectors.

use crate::adaptive::AdaptiveSmc;
use crate::classical::ClassicalSmc;
use crate::error::{ControlError, ControlResult};
use crate::hybrid::HybridAdaptiveSta;
use crate::kind::ControllerKind;
use crate::super_twisting::SuperTwistingSmc;
use crate::Controller;
use dip_plant::PlantConfiguration;
use serde::{Deserialize, Serialize};

/// Adaptation parameters for [`AdaptiveSmc`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveSettings {
    pub initial_gain: f64,
    pub min_gain: f64,
    pub max_gain: f64,
    /// Pull of `K̂` back toward `initial_gain`.
    pub leak_rate: f64,
    /// Linear surface feedback added to the switching term.
    pub proportional_gain: f64,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            initial_gain: 10.0,
            min_gain: 0.1,
            max_gain: 100.0,
            leak_rate: 0.01,
            proportional_gain: 0.5,
        }
    }
}

/// Adaptation parameters for [`HybridAdaptiveSta`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridSettings {
    pub k1_init: f64,
    pub k2_init: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub max_gain: f64,
}

impl Default for HybridSettings {
    fn default() -> Self {
        Self {
            k1_init: 4.0,
            k2_init: 0.4,
            gamma1: 2.0,
            gamma2: 0.5,
            max_gain: 50.0,
        }
    }
}

/// Parameters shared by every controller that are not tuned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Control period (seconds); drives the internal integrators.
    pub dt: f64,
    /// Width ε of the boundary layer around `s = 0`.
    pub boundary_layer: f64,
    pub adaptive: AdaptiveSettings,
    pub hybrid: HybridSettings,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            dt: 0.01,
            boundary_layer: 0.02,
            adaptive: AdaptiveSettings::default(),
            hybrid: HybridSettings::default(),
        }
    }
}

impl ControllerSettings {
    pub fn validate(&self) -> ControlResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.boundary_layer.is_finite() && self.boundary_layer > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "boundary_layer must be positive",
            });
        }
        let a = &self.adaptive;
        if !(0.0 < a.min_gain && a.min_gain <= a.initial_gain && a.initial_gain <= a.max_gain) {
            return Err(ControlError::InvalidArg {
                what: "adaptive gains must satisfy 0 < min <= initial <= max",
            });
        }
        if a.leak_rate < 0.0 || a.proportional_gain < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "adaptive leak_rate and proportional_gain must be non-negative",
            });
        }
        let h = &self.hybrid;
        if !(h.k1_init > 0.0 && h.k2_init > 0.0 && h.k1_init <= h.max_gain && h.k2_init <= h.max_gain) {
            return Err(ControlError::InvalidArg {
                what: "hybrid initial gains must be positive and at most max_gain",
            });
        }
        if h.gamma1 < 0.0 || h.gamma2 < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "hybrid adaptation rates must be non-negative",
            });
        }
        Ok(())
    }
}

/// Build a controller with default settings, saturating at the plant's
/// force limit.
pub fn create_controller_for_pso(
    kind: ControllerKind,
    gains: &[f64],
    config: &PlantConfiguration,
) -> ControlResult<Box<dyn Controller>> {
    create_controller_with_settings(kind, gains, config, &ControllerSettings::default())
}

pub fn create_controller_with_settings(
    kind: ControllerKind,
    gains: &[f64],
    config: &PlantConfiguration,
    settings: &ControllerSettings,
) -> ControlResult<Box<dyn Controller>> {
    settings.validate()?;
    let limit = config.force_limit();
    let eps = settings.boundary_layer;
    let dt = settings.dt;

    Ok(match kind {
        ControllerKind::Classical => Box::new(ClassicalSmc::new(gains, eps, limit)?),
        ControllerKind::Adaptive => {
            Box::new(AdaptiveSmc::new(gains, settings.adaptive, eps, dt, limit)?)
        }
        ControllerKind::SuperTwisting => Box::new(SuperTwistingSmc::new(gains, eps, dt, limit)?),
        ControllerKind::Hybrid => {
            Box::new(HybridAdaptiveSta::new(gains, settings.hybrid, eps, dt, limit)?)
        }
    })
}
