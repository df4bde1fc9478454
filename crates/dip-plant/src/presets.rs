//! Named parameter presets.

use crate::error::{ConfigResult, ConfigurationError};
use crate::params::PlantParams;

pub const PRESET_NAMES: [&str; 5] = [
    "default",
    "fast_prototype",
    "educational",
    "research",
    "small_angle",
];

pub fn preset_names() -> &'static [&'static str] {
    &PRESET_NAMES
}

/// Raw parameters for a preset name.
pub fn preset_params(name: &str) -> ConfigResult<PlantParams> {
    let base = PlantParams::default();
    let params = match name {
        "default" => base,
        // Linear and unchecked: cheapest possible right-hand side.
        "fast_prototype" => PlantParams {
            enable_linearization: true,
            enable_fast_math: true,
            ..base
        },
        // Heavier, slower plant with generous dissipation.
        "educational" => PlantParams {
            cart_mass: 1.5,
            pendulum1_mass: 0.2,
            pendulum2_mass: 0.15,
            pendulum1_length: 0.6,
            pendulum2_length: 0.4,
            friction_coefficient: 0.3,
            damping_coefficient: 0.05,
            force_limit: 30.0,
            ..base
        },
        "research" => PlantParams {
            friction_coefficient: 0.02,
            damping_coefficient: 0.002,
            integration_tolerance: 1e-9,
            max_condition_number: 1e8,
            ..base
        },
        "small_angle" => PlantParams {
            enable_small_angle_approximation: true,
            ..base
        },
        other => {
            return Err(ConfigurationError::UnknownPreset {
                name: other.to_string(),
            });
        }
    };
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DynamicsMode, MatrixCoupling, PlantConfiguration};

    #[test]
    fn every_preset_is_valid() {
        for name in preset_names() {
            assert!(
                PlantConfiguration::create_preset(name).is_ok(),
                "preset {name} should validate"
            );
        }
    }

    #[test]
    fn fast_prototype_selects_cheap_modes() {
        let cfg = PlantConfiguration::create_preset("fast_prototype").unwrap();
        assert_eq!(cfg.dynamics_mode(), DynamicsMode::Linearized);
        assert_eq!(cfg.matrix_coupling(), MatrixCoupling::Coupled);
        assert!(cfg.fast_math());
    }

    #[test]
    fn unknown_preset_fails() {
        let err = PlantConfiguration::create_preset("turbo").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownPreset { ref name } if name == "turbo"));
    }
}
