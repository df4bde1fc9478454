//! Validated, immutable plant configuration.

use crate::error::{ConfigResult, ConfigurationError, Violation};
use crate::mode::{DynamicsMode, MatrixCoupling};
use crate::params::PlantParams;
use crate::presets;
use serde_json::Value;
use std::collections::BTreeMap;

/// Plant configuration shared by every dynamics call of a run.
///
/// Built in two phases: the raw [`PlantParams`] are checked against the
/// physical invariants, then the derived constants are computed once. There
/// is no way to mutate a configuration after construction; build a new one
/// from [`PlantConfiguration::to_params`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantConfiguration {
    params: PlantParams,
    total_mass: f64,
    pendulum1_natural_frequency: f64,
    pendulum2_natural_frequency: f64,
    coupling_strength: f64,
    dynamics_mode: DynamicsMode,
    matrix_coupling: MatrixCoupling,
}

impl PlantConfiguration {
    /// Validate `params` and build the configuration.
    ///
    /// Every violated invariant is reported, not only the first.
    pub fn new(params: PlantParams) -> ConfigResult<Self> {
        let violations = validate(&params);
        if !violations.is_empty() {
            return Err(ConfigurationError::Invalid { violations });
        }

        let pendulum_mass = params.pendulum1_mass + params.pendulum2_mass;
        let total_mass = params.cart_mass + pendulum_mass;
        let pendulum1_natural_frequency = (params.gravity / params.pendulum1_length).sqrt();
        let pendulum2_natural_frequency = (params.gravity / params.pendulum2_length).sqrt();
        let outer_moment = params.pendulum2_mass * params.pendulum2_length;
        let coupling_strength =
            outer_moment / (pendulum_mass * params.pendulum1_length + outer_moment);

        let dynamics_mode = DynamicsMode::from_flags(
            params.enable_linearization,
            params.enable_small_angle_approximation,
        );
        let matrix_coupling = if params.enable_decoupled_dynamics {
            MatrixCoupling::Diagonal
        } else {
            MatrixCoupling::Coupled
        };

        Ok(Self {
            params,
            total_mass,
            pendulum1_natural_frequency,
            pendulum2_natural_frequency,
            coupling_strength,
            dynamics_mode,
            matrix_coupling,
        })
    }

    pub fn create_default() -> Self {
        Self::new(PlantParams::default()).expect("default plant parameters are valid")
    }

    pub fn from_params(params: PlantParams) -> ConfigResult<Self> {
        Self::new(params)
    }

    /// Build a named preset (see [`presets::PRESET_NAMES`]).
    pub fn create_preset(name: &str) -> ConfigResult<Self> {
        Self::new(presets::preset_params(name)?)
    }

    /// Build from a key/value map. Missing keys take defaults, unknown keys fail.
    pub fn from_dict(map: &BTreeMap<String, Value>) -> ConfigResult<Self> {
        let object: serde_json::Map<String, Value> =
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let params: PlantParams = serde_json::from_value(Value::Object(object))?;
        Self::new(params)
    }

    /// Every raw field as a key/value map; `from_dict` reproduces `self`.
    pub fn to_dict(&self) -> ConfigResult<BTreeMap<String, Value>> {
        match serde_json::to_value(&self.params)? {
            Value::Object(object) => Ok(object.into_iter().collect()),
            other => Err(ConfigurationError::Parse(format!(
                "expected an object, serialized to {other}"
            ))),
        }
    }

    pub fn params(&self) -> &PlantParams {
        &self.params
    }

    pub fn to_params(&self) -> PlantParams {
        self.params.clone()
    }

    /// Named diagnostic checks. Never fails; callers decide what is fatal.
    pub fn check_physical_consistency(&self) -> BTreeMap<&'static str, bool> {
        let p = &self.params;
        let pendulum_mass = p.pendulum1_mass + p.pendulum2_mass;
        let mass_ratio = pendulum_mass / p.cart_mass;
        let length_ratio = p.pendulum2_length / p.pendulum1_length;

        let mut checks = BTreeMap::new();
        checks.insert(
            "positive_masses",
            p.cart_mass > 0.0 && p.pendulum1_mass > 0.0 && p.pendulum2_mass > 0.0,
        );
        checks.insert(
            "positive_lengths",
            p.pendulum1_length > 0.0 && p.pendulum2_length > 0.0,
        );
        checks.insert("positive_gravity", p.gravity > 0.0);
        checks.insert(
            "non_negative_dissipation",
            p.friction_coefficient >= 0.0 && p.damping_coefficient >= 0.0,
        );
        checks.insert(
            "reasonable_mass_ratio",
            (0.01..=10.0).contains(&mass_ratio),
        );
        checks.insert(
            "reasonable_length_ratio",
            (0.1..=10.0).contains(&length_ratio),
        );
        checks.insert(
            "force_limit_sufficient",
            p.force_limit >= 0.1 * self.total_mass * p.gravity,
        );
        checks
    }

    pub fn cart_mass(&self) -> f64 {
        self.params.cart_mass
    }

    pub fn pendulum1_mass(&self) -> f64 {
        self.params.pendulum1_mass
    }

    pub fn pendulum2_mass(&self) -> f64 {
        self.params.pendulum2_mass
    }

    pub fn pendulum1_length(&self) -> f64 {
        self.params.pendulum1_length
    }

    pub fn pendulum2_length(&self) -> f64 {
        self.params.pendulum2_length
    }

    pub fn gravity(&self) -> f64 {
        self.params.gravity
    }

    pub fn friction_coefficient(&self) -> f64 {
        self.params.friction_coefficient
    }

    pub fn damping_coefficient(&self) -> f64 {
        self.params.damping_coefficient
    }

    pub fn force_limit(&self) -> f64 {
        self.params.force_limit
    }

    pub fn cart_position_limit(&self) -> f64 {
        self.params.cart_position_limit
    }

    pub fn cart_velocity_limit(&self) -> f64 {
        self.params.cart_velocity_limit
    }

    pub fn joint_velocity_limit(&self) -> f64 {
        self.params.joint_velocity_limit
    }

    pub fn integration_tolerance(&self) -> f64 {
        self.params.integration_tolerance
    }

    pub fn max_condition_number(&self) -> f64 {
        self.params.max_condition_number
    }

    pub fn fast_math(&self) -> bool {
        self.params.enable_fast_math
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    pub fn pendulum1_natural_frequency(&self) -> f64 {
        self.pendulum1_natural_frequency
    }

    pub fn pendulum2_natural_frequency(&self) -> f64 {
        self.pendulum2_natural_frequency
    }

    pub fn coupling_strength(&self) -> f64 {
        self.coupling_strength
    }

    pub fn dynamics_mode(&self) -> DynamicsMode {
        self.dynamics_mode
    }

    pub fn matrix_coupling(&self) -> MatrixCoupling {
        self.matrix_coupling
    }
}

impl Default for PlantConfiguration {
    fn default() -> Self {
        Self::create_default()
    }
}

fn validate(p: &PlantParams) -> Vec<Violation> {
    let mut violations = Vec::new();

    let strictly_positive = [
        ("cart_mass", p.cart_mass),
        ("pendulum1_mass", p.pendulum1_mass),
        ("pendulum2_mass", p.pendulum2_mass),
        ("pendulum1_length", p.pendulum1_length),
        ("pendulum2_length", p.pendulum2_length),
        ("gravity", p.gravity),
        ("force_limit", p.force_limit),
        ("cart_position_limit", p.cart_position_limit),
        ("cart_velocity_limit", p.cart_velocity_limit),
        ("joint_velocity_limit", p.joint_velocity_limit),
        ("integration_tolerance", p.integration_tolerance),
    ];
    for (field, value) in strictly_positive {
        if !value.is_finite() {
            violations.push(Violation {
                field,
                value,
                reason: "must be finite",
            });
        } else if value <= 0.0 {
            violations.push(Violation {
                field,
                value,
                reason: "must be positive",
            });
        }
    }

    for (field, value) in [
        ("friction_coefficient", p.friction_coefficient),
        ("damping_coefficient", p.damping_coefficient),
    ] {
        if !value.is_finite() {
            violations.push(Violation {
                field,
                value,
                reason: "must be finite",
            });
        } else if value < 0.0 {
            violations.push(Violation {
                field,
                value,
                reason: "must be non-negative",
            });
        }
    }

    if !p.max_condition_number.is_finite() {
        violations.push(Violation {
            field: "max_condition_number",
            value: p.max_condition_number,
            reason: "must be finite",
        });
    } else if p.max_condition_number <= 1.0 {
        violations.push(Violation {
            field: "max_condition_number",
            value: p.max_condition_number,
            reason: "must be greater than 1",
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_derived_constants() {
        let cfg = PlantConfiguration::create_default();
        assert!((cfg.total_mass() - 1.2).abs() < 1e-12);
        let w = (9.81_f64 / 0.5).sqrt();
        assert!((cfg.pendulum1_natural_frequency() - w).abs() < 1e-12);
        assert!((cfg.pendulum2_natural_frequency() - w).abs() < 1e-12);
        // m2·L2 / ((m1+m2)·L1 + m2·L2) = 0.05 / (0.1 + 0.05)
        assert!((cfg.coupling_strength() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(cfg.dynamics_mode(), DynamicsMode::FullNonlinear);
        assert_eq!(cfg.matrix_coupling(), MatrixCoupling::Coupled);
    }

    #[test]
    fn every_violation_is_reported() {
        let params = PlantParams {
            cart_mass: 0.0,
            pendulum2_length: -1.0,
            gravity: f64::NAN,
            friction_coefficient: -0.5,
            ..PlantParams::default()
        };
        let err = PlantConfiguration::new(params).unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec!["cart_mass", "pendulum2_length", "gravity", "friction_coefficient"]
        );
        let msg = err.to_string();
        assert!(msg.contains("cart_mass"));
        assert!(msg.contains("friction_coefficient"));
    }

    #[test]
    fn zero_friction_is_allowed() {
        let params = PlantParams {
            friction_coefficient: 0.0,
            damping_coefficient: 0.0,
            ..PlantParams::default()
        };
        assert!(PlantConfiguration::new(params).is_ok());
    }

    #[test]
    fn consistency_checks_flag_extreme_ratios() {
        let params = PlantParams {
            cart_mass: 0.01,
            pendulum1_mass: 1.0,
            pendulum2_mass: 1.0,
            ..PlantParams::default()
        };
        let cfg = PlantConfiguration::new(params).unwrap();
        let checks = cfg.check_physical_consistency();
        assert_eq!(checks["positive_masses"], true);
        assert_eq!(checks["reasonable_mass_ratio"], false);
        assert_eq!(checks["reasonable_length_ratio"], true);
    }

    #[test]
    fn dict_round_trip_preserves_derived_constants() {
        let cfg = PlantConfiguration::create_preset("educational").unwrap();
        let map = cfg.to_dict().unwrap();
        let back = PlantConfiguration::from_dict(&map).unwrap();
        assert_eq!(cfg, back);
        assert!((cfg.total_mass() - back.total_mass()).abs() < 1e-12);
        assert!(
            (cfg.pendulum1_natural_frequency() - back.pendulum1_natural_frequency()).abs() < 1e-12
        );
    }

    #[test]
    fn from_dict_rejects_unknown_keys() {
        let mut map = PlantConfiguration::create_default().to_dict().unwrap();
        map.insert("cart_mas".to_string(), Value::from(2.0));
        assert!(matches!(
            PlantConfiguration::from_dict(&map),
            Err(ConfigurationError::Parse(_))
        ));
    }

    #[test]
    fn from_dict_fills_missing_keys_with_defaults() {
        let mut map = BTreeMap::new();
        map.insert("cart_mass".to_string(), Value::from(2.5));
        let cfg = PlantConfiguration::from_dict(&map).unwrap();
        assert_eq!(cfg.cart_mass(), 2.5);
        assert_eq!(cfg.force_limit(), PlantParams::default().force_limit);
    }
}
